//! Core solver types: problem dimensions and constraint classification,
//! the workspace arena, and the active-set engine boundary.

pub mod arena;
pub mod engine;
pub mod types;
pub mod workspace;

// partially flatten the most commonly used pieces

pub use arena::{plan_size, ArenaError, ARENA_ALIGN};
pub use engine::{ActiveSetEngine, EngineSettings, EngineStatus, UpdateFlags};
pub use types::{ConstraintKind, DataError, QpDims, SenseFlags, SolverStatus};
pub use workspace::{StructureFingerprint, Workspace, WorkspaceState, WorkspaceViews};
