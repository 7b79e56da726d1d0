use crate::algebra::*;
use crate::solver::core::workspace::WorkspaceViews;

/// Selection mask for [`ActiveSetEngine::refresh`]: which internal
/// quantities the engine must recompute before the next solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateFlags(u32);

impl UpdateFlags {
    /// triangular factorization of the Hessian
    pub const FACTOR: UpdateFlags = UpdateFlags(0b0001);
    /// projected (scaled) constraint rows
    pub const PROJECTION: UpdateFlags = UpdateFlags(0b0010);
    /// cost shift vector
    pub const SHIFT: UpdateFlags = UpdateFlags(0b0100);
    /// internal bound vectors
    pub const BOUNDS: UpdateFlags = UpdateFlags(0b1000);

    pub fn empty() -> Self {
        UpdateFlags(0)
    }

    /// Everything: the cold-start refresh.
    pub fn all() -> Self {
        Self::FACTOR | Self::PROJECTION | Self::SHIFT | Self::BOUNDS
    }

    pub fn contains(&self, other: UpdateFlags) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for UpdateFlags {
    type Output = UpdateFlags;
    fn bitor(self, rhs: UpdateFlags) -> UpdateFlags {
        UpdateFlags(self.0 | rhs.0)
    }
}

/// Exit status reported by an active-set engine.
#[derive(PartialEq, Eq, Clone, Debug, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EngineStatus {
    /// Optimum found with all hard constraints satisfied.
    Optimal,
    /// Optimum found with some soft constraints violated at a cost.
    SoftOptimal,
    /// Iteration limit reached.
    IterationLimit,
    /// Problem proved infeasible.
    Infeasible,
    /// Working-set cycling detected.
    Cycling,
    /// Problem is unbounded below.
    Unbounded,
    /// Hessian found indefinite during factorization.
    NonConvex,
    /// Initial working set is over-determined.
    Overdetermined,
}

impl std::fmt::Display for EngineStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Settings forwarded to the engine on every call.
#[derive(Debug, Clone)]
pub struct EngineSettings<T> {
    /// primal feasibility tolerance
    pub primal_tol: T,
    /// iteration cap
    pub iter_limit: u32,
    /// reciprocal elastic penalty weight; zero when no soft constraints exist
    pub rho_soft: T,
}

/// The external active-set solver boundary.
///
/// Implementations operate on the unified ranged-constraint problem held in
/// a [`WorkspaceViews`], iterating a working set of constraint slots until
/// optimality or a terminal failure.  The driving solver guarantees that
/// the workspace was marshalled for the current problem before any of
/// these entry points run, and that `finalize` runs after `solve` and
/// before output extraction.
///
/// Engines must honor the `SenseFlags` conventions: IMMUTABLE slots are
/// never activated or deactivated by the search, ACTIVE reflects working
/// set membership at all times, and the working-set list together with
/// `WorkspaceState::n_active` mirrors the ACTIVE flags on exit.
pub trait ActiveSetEngine<T: FloatT> {
    /// Drop every non-immutable constraint from the working set.
    fn deactivate_constraints(&mut self, work: &mut WorkspaceViews<'_, T>);

    /// Recompute the internal quantities selected by `flags` from the
    /// marshalled problem data.
    fn refresh(
        &mut self,
        work: &mut WorkspaceViews<'_, T>,
        flags: UpdateFlags,
        settings: &EngineSettings<T>,
    );

    /// Re-enter the constraints of the carried-over working set, seeding
    /// the search with the previous solve's active set.
    fn activate_constraints(&mut self, work: &mut WorkspaceViews<'_, T>);

    /// Run the active-set iteration to termination.
    fn solve(
        &mut self,
        work: &mut WorkspaceViews<'_, T>,
        settings: &EngineSettings<T>,
    ) -> EngineStatus;

    /// Reconcile the internal multiplier representation into the signed
    /// reportable convention: a non-negative multiplier on a bound or
    /// inequality slot means the upper side is active, negative the lower.
    fn finalize(&mut self, work: &mut WorkspaceViews<'_, T>, settings: &EngineSettings<T>);
}
