use crate::algebra::*;
use crate::solver::core::types::SenseFlags;
use crate::solver::core::workspace::{StructureFingerprint, WorkspaceViews};
use crate::solver::get_infinity;
use crate::solver::implementations::default::problemdata::DenseQp;
use crate::solver::implementations::default::solver::SolverError;
use itertools::izip;

/// Marshal a canonical dense QP into the unified ranged-constraint form.
///
/// Runs once per solve, before the engine is invoked.  Destructive on the
/// canonical Hessian: the strict upper triangle is overwritten in place
/// with the transpose of the lower triangle, since the engine expects a
/// full dense matrix.
///
/// Flag hygiene across repeated loads: ACTIVE bits are left untouched so a
/// warm-started working set survives, IMMUTABLE is rewritten from the
/// bound list, and SOFT is cleared everywhere before the soft slots are
/// re-marked.
pub(crate) fn load<T: FloatT>(
    qp: &mut DenseQp<T>,
    work: &mut WorkspaceViews<'_, T>,
) -> Result<(), SolverError> {
    qp.validate()?;
    if qp.dims != work.dims {
        return Err(SolverError::DimensionMismatch);
    }

    let dims = work.dims;
    let (nv, nb, ng, ne, ns) = (dims.nv, dims.nb, dims.ng, dims.ne, dims.ns);
    let m = dims.m();

    // the canonical Hessian stores the lower triangle; the unified form
    // wants the full matrix
    qp.hess.symmetrize_from_lower();

    // bulk copies into the unified layout, row-major: general rows first,
    // then equality rows
    work.problem.hess.copy_from(qp.hess.data());
    work.problem.grad.copy_from(&qp.grad);
    work.problem.rows[..ng * nv].copy_from(qp.a_ineq.data());
    work.problem.rows[ng * nv..].copy_from(qp.a_eq.data());
    work.problem.blower[nv..nv + ng].copy_from(&qp.cl);
    work.problem.bupper[nv..nv + ng].copy_from(&qp.cu);
    // equalities are degenerate ranged constraints with lower == upper
    work.problem.blower[nv + ng..m].copy_from(&qp.b_eq);
    work.problem.bupper[nv + ng..m].copy_from(&qp.b_eq);

    work.adapter.idxb.copy_from_slice(&qp.idxb);
    work.adapter.lb_stage.copy_from(&qp.lb);
    work.adapter.ub_stage.copy_from(&qp.ub);
    work.adapter.idxs.copy_from_slice(&qp.idxs);
    work.adapter.wt_lower.copy_from(&qp.soft_wt_lower);
    work.adapter.wt_upper.copy_from(&qp.soft_wt_upper);
    work.adapter.lin_lower.copy_from(&qp.soft_lin_lower);
    work.adapter.lin_upper.copy_from(&qp.soft_lin_upper);
    work.adapter.slack_lb.copy_from(&qp.slack_lb);
    work.adapter.slack_ub.copy_from(&qp.slack_ub);

    // the engine carries a single elastic penalty weight, so all soft
    // weights must agree with the first upper weight
    if ns > 0 {
        let w0 = work.adapter.wt_upper[0];
        let unequal = izip!(&*work.adapter.wt_lower, &*work.adapter.wt_upper)
            .any(|(&wl, &wu)| wl != w0 || wu != w0);
        if unequal {
            return Err(SolverError::UnequalSoftWeights);
        }
        work.state.rho_soft = w0.recip();
    } else {
        work.state.rho_soft = T::zero();
    }

    // every variable slot starts disabled; referencing it from the bound
    // list re-enables it with real bounds
    let inf: T = get_infinity().as_T();
    for v in 0..nv {
        work.problem.blower[v] = -inf;
        work.problem.bupper[v] = inf;
        work.problem.sense[v].insert(SenseFlags::IMMUTABLE);
    }
    for (b, (&v, &lo, &hi)) in izip!(
        &*work.adapter.idxb,
        &*work.adapter.lb_stage,
        &*work.adapter.ub_stage
    )
    .enumerate()
    {
        work.problem.blower[v] = lo;
        work.problem.bupper[v] = hi;
        work.problem.sense[v].remove(SenseFlags::IMMUTABLE);
        work.adapter.idxv_to_idxb[v] = b;
    }

    // equalities never leave the working set
    for e in 0..ne {
        work.problem.sense[nv + ng + e].insert(SenseFlags::ACTIVE | SenseFlags::IMMUTABLE);
    }

    for slot in 0..m {
        work.problem.sense[slot].remove(SenseFlags::SOFT);
    }
    for s in 0..ns {
        let pos = work.adapter.idxs[s];
        let slot = if pos < nb {
            work.adapter.idxb[pos]
        } else {
            nv + (pos - nb)
        };
        work.adapter.idx_unified_to_soft[slot] = s;
        work.problem.sense[slot].insert(SenseFlags::SOFT);

        // fold the linear elastic cost into a box shift; undone exactly
        // during extraction
        work.problem.blower[slot] =
            work.problem.blower[slot] + work.adapter.lin_lower[s] / work.adapter.wt_lower[s];
        work.problem.bupper[slot] =
            work.problem.bupper[slot] - work.adapter.lin_upper[s] / work.adapter.wt_upper[s];
    }

    work.state.loaded = Some(StructureFingerprint::new(
        &dims,
        &*work.adapter.idxb,
        &*work.adapter.idxs,
    ));

    Ok(())
}
