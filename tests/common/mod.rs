#![allow(dead_code)]

use rangedqp::solver::*;
use std::cell::RefCell;
use std::rc::Rc;

/// Exact direct engine for diagonal-Hessian box QPs.
///
/// Solves the unified form by clamping each variable at its bound and
/// reporting multipliers in the signed convention (non-negative means
/// the upper side is active).  General and equality rows are not
/// supported; tests using this engine keep `ng = ne = 0`.
pub struct DiagonalBoxEngine;

impl ActiveSetEngine<f64> for DiagonalBoxEngine {
    fn deactivate_constraints(&mut self, work: &mut WorkspaceViews<'_, f64>) {
        for slot in 0..work.dims.m() {
            if !work.problem.sense[slot].contains(SenseFlags::IMMUTABLE) {
                work.problem.sense[slot].remove(SenseFlags::ACTIVE);
            }
        }
        work.state.n_active = 0;
    }

    fn refresh(
        &mut self,
        work: &mut WorkspaceViews<'_, f64>,
        flags: UpdateFlags,
        _settings: &EngineSettings<f64>,
    ) {
        let n = work.dims.n();
        if flags.contains(UpdateFlags::FACTOR) {
            for i in 0..n {
                work.engine.ldl_diag[i] = work.problem.hess[i * n + i];
            }
        }
        if flags.contains(UpdateFlags::SHIFT) {
            work.engine.shift.copy_from_slice(&work.problem.grad[..]);
        }
        if flags.contains(UpdateFlags::BOUNDS) {
            work.engine.dlower.copy_from_slice(&work.problem.blower[..]);
            work.engine.dupper.copy_from_slice(&work.problem.bupper[..]);
        }
    }

    fn activate_constraints(&mut self, work: &mut WorkspaceViews<'_, f64>) {
        let mut k = 0;
        for slot in 0..work.dims.m() {
            if work.problem.sense[slot].contains(SenseFlags::ACTIVE) {
                work.engine.active_set[k] = slot;
                k += 1;
            }
        }
        work.state.n_active = k;
    }

    fn solve(
        &mut self,
        work: &mut WorkspaceViews<'_, f64>,
        _settings: &EngineSettings<f64>,
    ) -> EngineStatus {
        let n = work.dims.n();
        let mut n_active = 0;
        let mut fval = 0.0;
        for i in 0..n {
            let h = work.problem.hess[i * n + i];
            let f = work.engine.shift[i];
            let x = (-f / h).clamp(work.engine.dlower[i], work.engine.dupper[i]);
            work.engine.primal[i] = x;
            fval += 0.5 * h * x * x + f * x;

            // multiplier is minus the gradient component on an active bound
            let g = h * x + f;
            let immutable = work.problem.sense[i].contains(SenseFlags::IMMUTABLE);
            let at_upper = x == work.engine.dupper[i] && g < 0.0;
            let at_lower = x == work.engine.dlower[i] && g > 0.0;
            if !immutable && (at_upper || at_lower) {
                work.engine.active_set[n_active] = i;
                work.engine.lam_star[n_active] = -g;
                work.problem.sense[i].insert(SenseFlags::ACTIVE);
                n_active += 1;
            } else {
                work.problem.sense[i].remove(SenseFlags::ACTIVE);
            }
        }
        work.state.n_active = n_active;
        work.state.fval = fval;
        work.state.iterations = work.state.iterations.saturating_add(1);
        EngineStatus::Optimal
    }

    fn finalize(&mut self, _work: &mut WorkspaceViews<'_, f64>, _settings: &EngineSettings<f64>) {}
}

/// Engine that does nothing and exits with a fixed status.
pub struct ScriptedEngine {
    pub status: EngineStatus,
}

impl ActiveSetEngine<f64> for ScriptedEngine {
    fn deactivate_constraints(&mut self, work: &mut WorkspaceViews<'_, f64>) {
        work.state.n_active = 0;
    }

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
        _settings: &EngineSettings<f64>,
    ) -> EngineStatus {
        self.status
    }

    fn finalize(&mut self, _work: &mut WorkspaceViews<'_, f64>, _settings: &EngineSettings<f64>) {}
}

/// Engine that records the order of protocol calls and the refresh mask.
pub struct SequenceEngine {
    pub calls: Rc<RefCell<Vec<String>>>,
}

impl SequenceEngine {
    pub fn new() -> (Self, Rc<RefCell<Vec<String>>>) {
        let calls = Rc::new(RefCell::new(Vec::new()));
        (
            Self {
                calls: calls.clone(),
            },
            calls,
        )
    }
}

impl ActiveSetEngine<f64> for SequenceEngine {
    fn deactivate_constraints(&mut self, _work: &mut WorkspaceViews<'_, f64>) {
        self.calls.borrow_mut().push("deactivate".to_string());
    }

    fn refresh(
        &mut self,
        _work: &mut WorkspaceViews<'_, f64>,
        flags: UpdateFlags,
        _settings: &EngineSettings<f64>,
    ) {
        let mut tag = String::from("refresh:");
        for (flag, name) in [
            (UpdateFlags::FACTOR, "R"),
            (UpdateFlags::PROJECTION, "M"),
            (UpdateFlags::SHIFT, "v"),
            (UpdateFlags::BOUNDS, "d"),
        ] {
            if flags.contains(flag) {
                tag.push_str(name);
            }
        }
        self.calls.borrow_mut().push(tag);
    }

    fn activate_constraints(&mut self, _work: &mut WorkspaceViews<'_, f64>) {
        self.calls.borrow_mut().push("activate".to_string());
    }

    fn solve(
        &mut self,
        _work: &mut WorkspaceViews<'_, f64>,
        _settings: &EngineSettings<f64>,
    ) -> EngineStatus {
        self.calls.borrow_mut().push("solve".to_string());
        EngineStatus::Optimal
    }

    fn finalize(&mut self, _work: &mut WorkspaceViews<'_, f64>, _settings: &EngineSettings<f64>) {
        self.calls.borrow_mut().push("finalize".to_string());
    }
}

/// A feasible box-constrained QP: diagonal Hessian, every variable
/// bounded, bounds wide enough to contain the unconstrained minimizer.
pub fn interior_box_qp() -> DenseQp<f64> {
    let dims = QpDims {
        nv: 2,
        nb: 2,
        ng: 0,
        ne: 0,
        ns: 0,
    };
    let mut qp = DenseQp::zeros(dims);
    qp.hess[(0, 0)] = 2.0;
    qp.hess[(1, 1)] = 4.0;
    qp.grad = vec![-2.0, -4.0]; // unconstrained minimizer (1, 1)
    qp.idxb = vec![0, 1];
    qp.lb = vec![-10.0, -10.0];
    qp.ub = vec![10.0, 10.0];
    qp
}

/// minimize (x - 5)^2 subject to 0 <= x <= 3: optimum at the upper bound.
pub fn upper_bound_active_qp() -> DenseQp<f64> {
    let dims = QpDims {
        nv: 1,
        nb: 1,
        ng: 0,
        ne: 0,
        ns: 0,
    };
    let mut qp = DenseQp::zeros(dims);
    qp.hess[(0, 0)] = 2.0;
    qp.grad = vec![-10.0];
    qp.idxb = vec![0];
    qp.lb = vec![0.0];
    qp.ub = vec![3.0];
    qp
}
