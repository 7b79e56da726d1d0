#![allow(non_snake_case)]

mod common;
use common::ScriptedEngine;
use rangedqp::solver::*;
use std::cell::Cell;
use std::rc::Rc;

fn solve_with_status(status: EngineStatus) -> SolverStatus {
    let dims = QpDims {
        nv: 1,
        nb: 0,
        ng: 0,
        ne: 0,
        ns: 0,
    };
    let mut qp = DenseQp::zeros(dims);
    qp.hess[(0, 0)] = 1.0;

    let mut solver =
        DenseQpSolver::new(dims, ScriptedEngine { status }, DefaultSettings::default()).unwrap();
    let mut sol = DenseQpSolution::new(dims);
    let out = solver.solve(&mut qp, &mut sol).unwrap();
    assert_eq!(sol.status, out);
    out
}

#[test]
fn test_optimal_exits_narrow_to_success() {
    assert_eq!(solve_with_status(EngineStatus::Optimal), SolverStatus::Solved);
    assert_eq!(
        solve_with_status(EngineStatus::SoftOptimal),
        SolverStatus::Solved
    );
}

#[test]
fn test_iteration_limit_narrows_to_max_iterations() {
    assert_eq!(
        solve_with_status(EngineStatus::IterationLimit),
        SolverStatus::MaxIterations
    );
}

#[test]
fn test_failure_exits_pass_through_verbatim() {
    for status in [
        EngineStatus::Infeasible,
        EngineStatus::Cycling,
        EngineStatus::Unbounded,
        EngineStatus::NonConvex,
        EngineStatus::Overdetermined,
    ] {
        let mapped = solve_with_status(status);
        assert_eq!(mapped, SolverStatus::Failed(status));
        assert!(!mapped.is_solved());
    }
}

/// Engine probing the settings forwarded by the orchestrator.
struct ProbeEngine {
    seen: Rc<Cell<(f64, u32)>>,
}

impl ActiveSetEngine<f64> for ProbeEngine {
    fn deactivate_constraints(&mut self, _work: &mut WorkspaceViews<'_, f64>) {}
    fn refresh(
        &mut self,
        _work: &mut WorkspaceViews<'_, f64>,
        _flags: UpdateFlags,
        _settings: &EngineSettings<f64>,
    ) {
    }
    fn activate_constraints(&mut self, _work: &mut WorkspaceViews<'_, f64>) {}
    fn solve(
        &mut self,
        _work: &mut WorkspaceViews<'_, f64>,
        settings: &EngineSettings<f64>,
    ) -> EngineStatus {
        self.seen.set((settings.primal_tol, settings.iter_limit));
        EngineStatus::Optimal
    }
    fn finalize(&mut self, _work: &mut WorkspaceViews<'_, f64>, _settings: &EngineSettings<f64>) {}
}

#[test]
fn test_tolerance_and_iteration_cap_are_forwarded() {
    let dims = QpDims {
        nv: 1,
        nb: 0,
        ng: 0,
        ne: 0,
        ns: 0,
    };
    let mut qp = DenseQp::zeros(dims);
    qp.hess[(0, 0)] = 1.0;

    let seen = Rc::new(Cell::new((0.0, 0)));
    let engine = ProbeEngine { seen: seen.clone() };

    let settings = DefaultSettingsBuilder::default()
        .tol_ineq(1e-9)
        .iter_max(123)
        .build()
        .unwrap();

    let mut solver = DenseQpSolver::new(dims, engine, settings).unwrap();
    let mut sol = DenseQpSolution::new(dims);
    solver.solve(&mut qp, &mut sol).unwrap();

    assert_eq!(seen.get(), (1e-9, 123));
}
