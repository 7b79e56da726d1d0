use crate::algebra::*;
use crate::solver::core::arena::{plan_size, ArenaCursor, ArenaError, ARENA_ALIGN};
use crate::solver::core::types::{QpDims, SenseFlags};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Hash of the structural part of a problem: dimensions plus the
/// bound and soft index lists.
///
/// Warm-start state (working set, factorization) carried in a workspace
/// is valid only while the structure is unchanged; the driving solver
/// compares fingerprints instead of trusting caller discipline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructureFingerprint(u64);

impl StructureFingerprint {
    pub fn new(dims: &QpDims, idxb: &[usize], idxs: &[usize]) -> Self {
        let mut hasher = DefaultHasher::new();
        (dims.nv, dims.nb, dims.ng, dims.ne, dims.ns).hash(&mut hasher);
        idxb.hash(&mut hasher);
        idxs.hash(&mut hasher);
        StructureFingerprint(hasher.finish())
    }
}

/// Scalar workspace state.
///
/// Lives beside the arena rather than inside it; the engine reads and
/// writes it through [`WorkspaceViews`].
#[derive(Debug, Clone)]
pub struct WorkspaceState<T> {
    /// objective value reported by the engine; -1 sentinel before any solve
    pub fval: T,
    /// number of constraints in the working set
    pub n_active: usize,
    /// iterations consumed by the engine
    pub iterations: u32,
    /// index at which the factorization found a singularity, if any
    pub sing_ind: usize,
    /// soft-slack scalar carried by the engine
    pub soft_slack: T,
    /// reciprocal elastic penalty weight derived at marshalling time
    pub rho_soft: T,
    /// structure of the currently marshalled problem
    pub loaded: Option<StructureFingerprint>,
    /// structure at the last completed solve
    pub solved: Option<StructureFingerprint>,
}

impl<T: FloatT> WorkspaceState<T> {
    pub fn new() -> Self {
        Self {
            fval: -T::one(),
            n_active: 0,
            iterations: 0,
            sing_ind: 0,
            soft_slack: T::zero(),
            rho_soft: T::zero(),
            loaded: None,
            solved: None,
        }
    }
}

impl<T: FloatT> Default for WorkspaceState<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// The marshalled problem as the engine sees it: the unified
/// ranged-constraint form `blower <= A x <= bupper`, where the first
/// `ms` rows are implicit identity rows.
pub struct ProblemView<'a, T> {
    /// dense Hessian, row-major, `n x n`
    pub hess: &'a mut [T],
    /// linear cost, `n`
    pub grad: &'a mut [T],
    /// stored constraint rows, row-major `(m - ms) x n`: general
    /// inequality rows first, then equality rows
    pub rows: &'a mut [T],
    /// lower bounds, `m`
    pub blower: &'a mut [T],
    /// upper bounds, `m`
    pub bupper: &'a mut [T],
    /// per-slot constraint flags, `m`
    pub sense: &'a mut [SenseFlags],
}

/// Engine-internal buffers: factorization state, iterates and the
/// working-set list.  The adapter never interprets these beyond the
/// extraction contract (`primal`, `lam_star`, `active_set`).
pub struct EngineView<'a, T> {
    /// scaled copy of the stored constraint rows, `(m - ms) x n`
    pub rows_scaled: &'a mut [T],
    /// internal lower bound vector, `m`
    pub dlower: &'a mut [T],
    /// internal upper bound vector, `m`
    pub dupper: &'a mut [T],
    /// packed triangular factor of the Hessian, `n (n + 1) / 2`
    pub factor: &'a mut [T],
    /// cost shift vector, `n`
    pub shift: &'a mut [T],
    /// per-row scaling, `m`
    pub scaling: &'a mut [T],
    /// primal iterate, `n`
    pub primal: &'a mut [T],
    /// previous primal iterate, `n`
    pub primal_prev: &'a mut [T],
    /// multiplier iterate, `n + ns + 1`
    pub lam: &'a mut [T],
    /// converged multiplier copy read out after `finalize`, `n + ns + 1`
    pub lam_star: &'a mut [T],
    /// scratch vector, `n`
    pub work: &'a mut [T],
    /// LDL diagonal, `n + ns + 1`
    pub ldl_diag: &'a mut [T],
    /// LDL forward-solve work vector, `n + ns + 1`
    pub ldl_fwd: &'a mut [T],
    /// LDL backward-solve work vector, `n + ns + 1`
    pub ldl_bwd: &'a mut [T],
    /// packed LDL lower factor, `(n + ns + 2)(n + ns + 1) / 2`
    pub ldl_lower: &'a mut [T],
    /// working-set slot list; the first `n_active` entries are live
    pub active_set: &'a mut [usize],
}

/// Adapter-private staging buffers and index maps.
pub struct AdapterView<'a, T> {
    /// staged lower bound values, `nb`
    pub lb_stage: &'a mut [T],
    /// staged upper bound values, `nb`
    pub ub_stage: &'a mut [T],
    /// lower quadratic penalty weights, `ns`
    pub wt_lower: &'a mut [T],
    /// upper quadratic penalty weights, `ns`
    pub wt_upper: &'a mut [T],
    /// lower linear penalty terms, `ns`
    pub lin_lower: &'a mut [T],
    /// upper linear penalty terms, `ns`
    pub lin_upper: &'a mut [T],
    /// staged lower slack bounds, `ns`
    pub slack_lb: &'a mut [T],
    /// staged upper slack bounds, `ns`
    pub slack_ub: &'a mut [T],
    /// bounded-variable index list, `nb`
    pub idxb: &'a mut [usize],
    /// variable index -> bound list position; valid only for bounded
    /// variables, `nv`
    pub idxv_to_idxb: &'a mut [usize],
    /// soft constraint -> position in the bound+inequality list, `ns`
    pub idxs: &'a mut [usize],
    /// unified slot -> soft constraint; valid only for SOFT slots, `m`
    pub idx_unified_to_soft: &'a mut [usize],
}

/// All typed views over one workspace arena, plus the scalar state.
/// Scoped to a single call; re-carved cheaply from the owning
/// [`Workspace`] on each use.
pub struct WorkspaceViews<'a, T: FloatT> {
    pub dims: QpDims,
    pub problem: ProblemView<'a, T>,
    pub engine: EngineView<'a, T>,
    pub adapter: AdapterView<'a, T>,
    pub state: &'a mut WorkspaceState<T>,
}

impl<'a, T: FloatT> WorkspaceViews<'a, T> {
    /// Carve a raw block into the workspace buffers.
    ///
    /// The block must start 8-byte aligned and hold at least
    /// [`plan_size::<T>(dims)`](plan_size) bytes.  Carving is
    /// non-destructive: buffer contents persist across repeated carves
    /// of the same block, which is what lets warm-start state survive
    /// between solves.  The cursor is checked to land exactly on the
    /// planned size.
    pub fn assign(
        dims: QpDims,
        block: &'a mut [u8],
        state: &'a mut WorkspaceState<T>,
    ) -> Result<Self, ArenaError> {
        let planned = plan_size::<T>(&dims);
        if block.len() < planned {
            return Err(ArenaError::OutOfSpace {
                needed: planned,
                available: block.len(),
            });
        }

        let n = dims.n();
        let m = dims.m();
        let ms = dims.ms();
        let na = dims.n_active_max();
        let (nb, ns) = (dims.nb, dims.ns);

        let mut cursor = ArenaCursor::new(&mut block[..planned])?;

        // floats
        let hess = cursor.take(n * n)?;
        let grad = cursor.take(n)?;
        let rows = cursor.take(n * (m - ms))?;
        let bupper = cursor.take(m)?;
        let blower = cursor.take(m)?;
        let rows_scaled = cursor.take(n * (m - ms))?;
        let dupper = cursor.take(m)?;
        let dlower = cursor.take(m)?;
        let factor = cursor.take((n + 1) * n / 2)?;
        let shift = cursor.take(n)?;
        let scaling = cursor.take(m)?;
        let primal = cursor.take(n)?;
        let primal_prev = cursor.take(n)?;
        let lam = cursor.take(na)?;
        let lam_star = cursor.take(na)?;
        let work = cursor.take(n)?;
        let ldl_diag = cursor.take(na)?;
        let ldl_fwd = cursor.take(na)?;
        let ldl_bwd = cursor.take(na)?;
        let ldl_lower = cursor.take((n + ns + 2) * (n + ns + 1) / 2)?;
        let lb_stage = cursor.take(nb)?;
        let ub_stage = cursor.take(nb)?;
        let wt_lower = cursor.take(ns)?;
        let wt_upper = cursor.take(ns)?;
        let lin_lower = cursor.take(ns)?;
        let lin_upper = cursor.take(ns)?;
        let slack_lb = cursor.take(ns)?;
        let slack_ub = cursor.take(ns)?;
        cursor.pad()?;

        // pointer-width indices
        let active_set = cursor.take(na)?;
        let idxb = cursor.take(nb)?;
        let idxv_to_idxb = cursor.take(n)?;
        let idxs = cursor.take(ns)?;
        let idx_unified_to_soft = cursor.take(m)?;

        // flags
        let sense = cursor.take(m)?;
        cursor.pad()?;

        cursor.finish(planned)?;

        Ok(Self {
            dims,
            problem: ProblemView {
                hess,
                grad,
                rows,
                blower,
                bupper,
                sense,
            },
            engine: EngineView {
                rows_scaled,
                dlower,
                dupper,
                factor,
                shift,
                scaling,
                primal,
                primal_prev,
                lam,
                lam_star,
                work,
                ldl_diag,
                ldl_fwd,
                ldl_bwd,
                ldl_lower,
                active_set,
            },
            adapter: AdapterView {
                lb_stage,
                ub_stage,
                wt_lower,
                wt_upper,
                lin_lower,
                lin_upper,
                slack_lb,
                slack_ub,
                idxb,
                idxv_to_idxb,
                idxs,
                idx_unified_to_soft,
            },
            state,
        })
    }
}

/// Owner of one workspace arena and its scalar state.
///
/// Allocated once per problem dimension set and reused across repeated
/// solves; warm-start state persists in the arena between calls.  The
/// backing store is zeroed exactly once here, so counters, flags and
/// iterates all start clean.
pub struct Workspace<T: FloatT> {
    dims: QpDims,
    block: Vec<u64>,
    state: WorkspaceState<T>,
}

impl<T: FloatT> Workspace<T> {
    /// Allocate and verify a workspace for the given dimensions.
    ///
    /// The backing store is held as 64-bit words so the arena alignment
    /// precondition holds by construction.  A first carve runs
    /// immediately to surface any planner/assigner inconsistency at
    /// setup time rather than on the solve path.
    pub fn new(dims: QpDims) -> Result<Self, ArenaError> {
        let bytes = plan_size::<T>(&dims);
        let block = vec![0u64; bytes / ARENA_ALIGN];
        let mut workspace = Self {
            dims,
            block,
            state: WorkspaceState::new(),
        };
        workspace.views()?;
        Ok(workspace)
    }

    pub fn dims(&self) -> QpDims {
        self.dims
    }

    pub fn state(&self) -> &WorkspaceState<T> {
        &self.state
    }

    /// Carve the typed views for one call.
    pub fn views(&mut self) -> Result<WorkspaceViews<'_, T>, ArenaError> {
        let bytes: &mut [u8] = bytemuck::cast_slice_mut(&mut self.block);
        WorkspaceViews::assign(self.dims, bytes, &mut self.state)
    }
}
