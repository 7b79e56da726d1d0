use crate::algebra::*;
use crate::solver::core::types::{ConstraintKind, SenseFlags};
use crate::solver::core::workspace::WorkspaceViews;
use crate::solver::implementations::default::solution::DenseQpSolution;

/// Unmarshal the engine's active-set output into the canonical layout.
///
/// Sign convention on bound and inequality slots: a non-negative
/// multiplier means the upper side is active and lands (as is) in
/// `lam_upper`; a negative multiplier means the lower side and lands
/// negated in `lam_lower`.  Equality multipliers pass through unsigned.
/// Soft slacks are recovered as `rho_soft * multiplier` and then the
/// marshalling bound shift is undone exactly, for every soft constraint
/// whether or not it is active.
pub(crate) fn extract<T: FloatT>(work: &WorkspaceViews<'_, T>, sol: &mut DenseQpSolution<T>) {
    let dims = work.dims;
    let (nb, ns) = (dims.nb, dims.ns);

    sol.x.copy_from(&*work.engine.primal);
    sol.lam_lower.set(T::zero());
    sol.lam_upper.set(T::zero());
    sol.pi.set(T::zero());
    sol.slack_lower.set(T::zero());
    sol.slack_upper.set(T::zero());

    let rho = work.state.rho_soft;
    for i in 0..work.state.n_active {
        let slot = work.engine.active_set[i];
        let lam = work.engine.lam_star[i];

        match dims.kind(slot) {
            ConstraintKind::Bound(v) => {
                let b = work.adapter.idxv_to_idxb[v];
                if lam >= T::zero() {
                    sol.lam_upper[b] = lam;
                } else {
                    sol.lam_lower[b] = -lam;
                }
            }
            ConstraintKind::General(g) => {
                if lam >= T::zero() {
                    sol.lam_upper[nb + g] = lam;
                } else {
                    sol.lam_lower[nb + g] = -lam;
                }
            }
            ConstraintKind::Equality(e) => {
                sol.pi[e] = lam;
            }
        }

        if work.problem.sense[slot].contains(SenseFlags::SOFT) {
            let s = work.adapter.idx_unified_to_soft[slot];
            let slack = rho * lam;
            if lam >= T::zero() {
                sol.slack_upper[s] = slack;
            } else {
                sol.slack_lower[s] = -slack;
            }
        }
    }

    // undo the marshalling bound shift on every soft slack
    for s in 0..ns {
        sol.slack_lower[s] =
            sol.slack_lower[s] - work.adapter.lin_lower[s] / work.adapter.wt_lower[s];
        sol.slack_upper[s] =
            sol.slack_upper[s] - work.adapter.lin_upper[s] / work.adapter.wt_upper[s];
    }
}
