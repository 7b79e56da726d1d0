use crate::algebra::*;
use crate::solver::core::arena::ArenaError;
use crate::solver::core::engine::{ActiveSetEngine, EngineSettings, EngineStatus, UpdateFlags};
use crate::solver::core::types::{DataError, QpDims, SolverStatus};
use crate::solver::core::workspace::Workspace;
use crate::solver::implementations::default::extract::extract;
use crate::solver::implementations::default::info::SolveInfo;
use crate::solver::implementations::default::marshal::load;
use crate::solver::implementations::default::problemdata::DenseQp;
use crate::solver::implementations::default::settings::{
    DefaultSettings, SettingsError, WarmStart,
};
use crate::solver::implementations::default::solution::DenseQpSolution;
use crate::timers::{timeit, Timers};
use thiserror::Error;

/// Error type returned on the setup and solve paths.
///
/// Engine exit codes are not errors: they are narrowed into the returned
/// [`SolverStatus`] and never retried internally.  Retry and fallback
/// policy (e.g. re-solving cold after a rejected warm start) belongs to
/// the caller.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SolverError {
    /// Workspace arena planning or carving failure
    #[error(transparent)]
    Arena(#[from] ArenaError),
    /// Invalid settings
    #[error(transparent)]
    Settings(#[from] SettingsError),
    /// Invalid canonical problem data
    #[error(transparent)]
    Data(#[from] DataError),
    /// Soft constraints with differing penalty weights; the unified form
    /// carries a single elastic weight
    #[error("soft constraint penalty weights must all be equal")]
    UnequalSoftWeights,
    /// A warm start was requested but the problem structure changed
    /// since the last completed solve
    #[error("warm start requested but the problem structure changed since the last solve")]
    StaleWarmStart,
    /// Problem or solution dimensions disagree with the workspace
    #[error("problem dimensions do not match the solver workspace")]
    DimensionMismatch,
    /// An operation that is not implemented, by design
    #[error("{0} is not implemented")]
    Unimplemented(&'static str),
}

/// Dense canonical-QP solver front end driving an external active-set
/// engine.
///
/// Owns the workspace arena for one problem dimension set.  The arena is
/// allocated at construction and reused across every subsequent solve;
/// no allocation happens on the solve path.  A solver instance must not
/// be shared across concurrent solves; callers wanting concurrency
/// create one solver per in-flight problem.
pub struct DenseQpSolver<E, T = f64>
where
    T: FloatT,
    E: ActiveSetEngine<T>,
{
    pub settings: DefaultSettings<T>,
    pub info: SolveInfo,
    workspace: Workspace<T>,
    engine: E,
}

impl<E, T> DenseQpSolver<E, T>
where
    T: FloatT,
    E: ActiveSetEngine<T>,
{
    /// Create a solver for problems of the given dimensions.
    pub fn new(
        dims: QpDims,
        engine: E,
        settings: DefaultSettings<T>,
    ) -> Result<Self, SolverError> {
        settings.validate()?;
        dims.validate()?;
        let workspace = Workspace::new(dims)?;

        if settings.verbose {
            println!(
                "rangedqp v{}: workspace ready, nv = {}, m = {}",
                crate::VERSION,
                dims.nv,
                dims.m()
            );
        }

        Ok(Self {
            settings,
            info: SolveInfo::default(),
            workspace,
            engine,
        })
    }

    pub fn dims(&self) -> QpDims {
        self.workspace.dims()
    }

    /// Solve one canonical QP instance.
    ///
    /// Marshals `qp` into the workspace (destructively symmetrizing its
    /// Hessian), drives the engine under the configured warm-start mode
    /// and extracts the result into `sol`.  The returned status is also
    /// recorded in `sol.status` and [`SolveInfo`]; on an `Err` return no
    /// output fields are meaningful.
    pub fn solve(
        &mut self,
        qp: &mut DenseQp<T>,
        sol: &mut DenseQpSolution<T>,
    ) -> Result<SolverStatus, SolverError> {
        let dims = self.workspace.dims();
        if qp.dims != dims {
            return Err(SolverError::DimensionMismatch);
        }
        if sol.x.len() != dims.nv
            || sol.lam_lower.len() != dims.nb + dims.ng
            || sol.lam_upper.len() != dims.nb + dims.ng
            || sol.pi.len() != dims.ne
            || sol.slack_lower.len() != dims.ns
            || sol.slack_upper.len() != dims.ns
        {
            return Err(SolverError::DimensionMismatch);
        }

        let warm_start = self.settings.warm_start;
        let mut timers = Timers::default();
        timers.start("total");

        timers.start("interface");
        let mut views = self.workspace.views()?;
        load(qp, &mut views)?;
        timers.stop("interface");

        // warm-start state is only valid against an unchanged structure
        if warm_start != WarmStart::Cold {
            if let (Some(solved), Some(loaded)) = (views.state.solved, views.state.loaded) {
                if solved != loaded {
                    return Err(SolverError::StaleWarmStart);
                }
            }
        }

        let engine_settings = EngineSettings {
            primal_tol: self.settings.tol_ineq,
            iter_limit: self.settings.iter_max,
            rho_soft: views.state.rho_soft,
        };

        let engine_status;
        timeit! {timers => "solve"; {
            if warm_start == WarmStart::Cold {
                self.engine.deactivate_constraints(&mut views);
            }

            let flags = match warm_start {
                WarmStart::Numeric => UpdateFlags::SHIFT | UpdateFlags::BOUNDS,
                _ => UpdateFlags::all(),
            };
            self.engine.refresh(&mut views, flags, &engine_settings);

            if warm_start == WarmStart::ActiveSet {
                self.engine.activate_constraints(&mut views);
            }

            engine_status = self.engine.solve(&mut views, &engine_settings);
            self.engine.finalize(&mut views, &engine_settings);
        }}

        timers.start("interface");
        extract(&views, sol);
        timers.stop("interface");

        views.state.solved = views.state.loaded;
        let iterations = views.state.iterations;
        drop(views);
        timers.stop("total");

        let status = match engine_status {
            EngineStatus::Optimal | EngineStatus::SoftOptimal => SolverStatus::Solved,
            EngineStatus::IterationLimit => SolverStatus::MaxIterations,
            other => SolverStatus::Failed(other),
        };

        self.info = SolveInfo {
            solve_time: timers.elapsed("solve"),
            interface_time: timers.elapsed("interface"),
            total_time: timers.elapsed("total"),
            iterations,
            status,
        };
        sol.status = status;
        sol.iterations = iterations;
        sol.solve_time = self.info.solve_time;

        if self.settings.verbose {
            println!(
                "rangedqp: status = {}, iterations = {}, solve time = {:.3e}s",
                status, iterations, self.info.solve_time
            );
        }

        Ok(status)
    }

    /// Sensitivity (derivative) evaluation.  Always fails: the
    /// ranged-constraint engine exposes no derivative information.
    pub fn eval_sensitivity(
        &mut self,
        _qp: &DenseQp<T>,
        _sol: &mut DenseQpSolution<T>,
    ) -> Result<(), SolverError> {
        Err(SolverError::Unimplemented("sensitivity evaluation"))
    }
}
