#![allow(non_snake_case)]

mod common;
use common::{interior_box_qp, upper_bound_active_qp, DiagonalBoxEngine};
use rangedqp::solver::*;

#[test]
fn test_interior_minimizer() {
    let mut qp = interior_box_qp();
    let mut solver =
        DenseQpSolver::new(qp.dims, DiagonalBoxEngine, DefaultSettings::default()).unwrap();
    let mut sol = DenseQpSolution::new(qp.dims);

    let status = solver.solve(&mut qp, &mut sol).unwrap();

    // bounds strictly contain the unconstrained minimizer, so the
    // solution is the unconstrained one and every multiplier is zero
    assert_eq!(status, SolverStatus::Solved);
    assert_eq!(sol.x, vec![1.0, 1.0]);
    assert_eq!(sol.lam_lower, vec![0.0, 0.0]);
    assert_eq!(sol.lam_upper, vec![0.0, 0.0]);
    assert!(sol.iterations >= 1);
}

#[test]
fn test_upper_bound_active() {
    // minimize (x - 5)^2 subject to 0 <= x <= 3
    let mut qp = upper_bound_active_qp();
    let mut solver =
        DenseQpSolver::new(qp.dims, DiagonalBoxEngine, DefaultSettings::default()).unwrap();
    let mut sol = DenseQpSolution::new(qp.dims);

    let status = solver.solve(&mut qp, &mut sol).unwrap();

    assert_eq!(status, SolverStatus::Solved);
    assert_eq!(sol.x, vec![3.0]);
    assert!(sol.lam_upper[0] > 0.0);
    assert_eq!(sol.lam_lower[0], 0.0);
    // gradient balance: multiplier equals minus the cost gradient at x = 3
    assert_eq!(sol.lam_upper[0], 4.0);
}

#[test]
fn test_unbounded_variables_are_disabled_not_constrained() {
    // only variable 0 is bounded; variable 1 must still reach its
    // unconstrained minimizer
    let dims = QpDims {
        nv: 2,
        nb: 1,
        ng: 0,
        ne: 0,
        ns: 0,
    };
    let mut qp = DenseQp::zeros(dims);
    qp.hess[(0, 0)] = 2.0;
    qp.hess[(1, 1)] = 2.0;
    qp.grad = vec![-10.0, -12.0];
    qp.idxb = vec![0];
    qp.lb = vec![0.0];
    qp.ub = vec![3.0];

    let mut solver =
        DenseQpSolver::new(dims, DiagonalBoxEngine, DefaultSettings::default()).unwrap();
    let mut sol = DenseQpSolution::new(dims);
    let status = solver.solve(&mut qp, &mut sol).unwrap();

    assert_eq!(status, SolverStatus::Solved);
    assert_eq!(sol.x, vec![3.0, 6.0]);
    assert_eq!(sol.lam_upper, vec![4.0]);
    assert_eq!(sol.lam_lower, vec![0.0]);
}

#[test]
fn test_telemetry_after_solve() {
    let mut qp = interior_box_qp();
    let mut solver =
        DenseQpSolver::new(qp.dims, DiagonalBoxEngine, DefaultSettings::default()).unwrap();
    let mut sol = DenseQpSolution::new(qp.dims);
    solver.solve(&mut qp, &mut sol).unwrap();

    assert_eq!(
        solver.info.telemetry("iter"),
        Ok(TelemetryValue::Int(sol.iterations))
    );
    assert!(matches!(
        solver.info.telemetry("time_qp_solver_call"),
        Ok(TelemetryValue::Float(t)) if t >= 0.0
    ));
    assert!(solver.info.total_time >= solver.info.solve_time);
}

#[test]
fn test_eval_sensitivity_is_unimplemented() {
    let qp = interior_box_qp();
    let mut solver =
        DenseQpSolver::new(qp.dims, DiagonalBoxEngine, DefaultSettings::default()).unwrap();
    let mut sol = DenseQpSolution::new(qp.dims);
    assert_eq!(
        solver.eval_sensitivity(&qp, &mut sol),
        Err(SolverError::Unimplemented("sensitivity evaluation"))
    );
}
