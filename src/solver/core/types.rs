use crate::solver::core::engine::EngineStatus;
use thiserror::Error;

/// Error type returned by canonical problem validation.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DataError {
    /// A problem field's length disagrees with the problem dimensions
    #[error("field {0} has a length incompatible with the problem dimensions")]
    IncompatibleDimension(&'static str),
    /// A bounded-variable index is out of range
    #[error("bound index out of range")]
    BoundIndexOutOfRange,
    /// A soft-constraint index is out of range
    #[error("soft constraint index out of range")]
    SoftIndexOutOfRange,
    /// A soft-constraint penalty weight is zero or negative
    #[error("soft constraint penalty weights must be strictly positive")]
    NonPositiveSoftWeight,
    /// The dimension set itself is inconsistent
    #[error("inconsistent problem dimensions: {0}")]
    BadDimensions(&'static str),
}

/// Dimensions of a canonical dense QP.
///
/// The unified ranged-constraint space has `m = nv + ng + ne` slots:
/// one per decision variable (whether bounded or not), then one per
/// general inequality row, then one per equality row.  The first
/// `ms = nv` slots carry implicit identity rows and need no matrix
/// storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QpDims {
    /// number of decision variables
    pub nv: usize,
    /// number of bounded variables
    pub nb: usize,
    /// number of general inequality rows
    pub ng: usize,
    /// number of equality rows
    pub ne: usize,
    /// number of soft (elastic) constraints
    pub ns: usize,
}

impl QpDims {
    /// Decision-variable count as seen by the engine.
    pub fn n(&self) -> usize {
        self.nv
    }

    /// Total unified-constraint count.
    pub fn m(&self) -> usize {
        self.nv + self.ng + self.ne
    }

    /// First slot that needs a stored constraint row.
    pub fn ms(&self) -> usize {
        self.nv
    }

    /// Capacity of the working-set list.  Each soft constraint may hold
    /// an extra factorization slot of its own.
    pub fn n_active_max(&self) -> usize {
        self.n() + self.ns + 1
    }

    /// Classify a unified slot by index range.
    pub fn kind(&self, slot: usize) -> ConstraintKind {
        if slot < self.nv {
            ConstraintKind::Bound(slot)
        } else if slot < self.nv + self.ng {
            ConstraintKind::General(slot - self.nv)
        } else {
            ConstraintKind::Equality(slot - self.nv - self.ng)
        }
    }

    pub fn validate(&self) -> Result<(), DataError> {
        if self.nb > self.nv {
            return Err(DataError::BadDimensions("nb exceeds nv"));
        }
        if self.ns > self.nb + self.ng {
            return Err(DataError::BadDimensions("ns exceeds nb + ng"));
        }
        Ok(())
    }
}

/// The kind of a unified constraint slot, with its index within
/// the kind's own numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    /// variable bound slot, carrying the variable index
    Bound(usize),
    /// general inequality slot, carrying the row index
    General(usize),
    /// equality slot, carrying the row index
    Equality(usize),
}

/// Per-slot constraint state flags in the unified representation.
///
/// ACTIVE marks membership of the working set.  IMMUTABLE marks a slot
/// the active-set search must not toggle: a disabled bound, or an
/// equality that never deactivates.  SOFT marks an elastic slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(transparent)]
pub struct SenseFlags(u32);

impl SenseFlags {
    pub const ACTIVE: SenseFlags = SenseFlags(0b001);
    pub const IMMUTABLE: SenseFlags = SenseFlags(0b010);
    pub const SOFT: SenseFlags = SenseFlags(0b100);

    pub fn empty() -> Self {
        SenseFlags(0)
    }

    pub fn contains(&self, other: SenseFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: SenseFlags) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: SenseFlags) {
        self.0 &= !other.0;
    }
}

impl std::ops::BitOr for SenseFlags {
    type Output = SenseFlags;
    fn bitor(self, rhs: SenseFlags) -> SenseFlags {
        SenseFlags(self.0 | rhs.0)
    }
}

/// Status of the solver at termination.
///
/// Engine exits reporting optimality (hard or soft) narrow to `Solved`
/// and iteration-capped exits to `MaxIterations`; every other engine
/// exit is carried through verbatim in `Failed`.
#[derive(PartialEq, Eq, Clone, Debug, Copy, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SolverStatus {
    /// Problem is not solved (solver hasn't run).
    #[default]
    Unsolved,
    /// Solver terminated with a solution.
    Solved,
    /// Iteration limit reached before a solution was found.
    MaxIterations,
    /// Engine terminated with the wrapped failure exit.
    Failed(EngineStatus),
}

impl SolverStatus {
    pub fn is_solved(&self) -> bool {
        matches!(*self, SolverStatus::Solved)
    }
}

impl std::fmt::Display for SolverStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        let dims = QpDims {
            nv: 3,
            nb: 2,
            ng: 2,
            ne: 1,
            ns: 0,
        };
        assert_eq!(dims.m(), 6);
        assert_eq!(dims.kind(0), ConstraintKind::Bound(0));
        assert_eq!(dims.kind(2), ConstraintKind::Bound(2));
        assert_eq!(dims.kind(3), ConstraintKind::General(0));
        assert_eq!(dims.kind(4), ConstraintKind::General(1));
        assert_eq!(dims.kind(5), ConstraintKind::Equality(0));
    }

    #[test]
    fn test_dims_validation() {
        let dims = QpDims {
            nv: 1,
            nb: 2,
            ng: 0,
            ne: 0,
            ns: 0,
        };
        assert!(dims.validate().is_err());
    }

    #[test]
    fn test_sense_flags() {
        let mut flags = SenseFlags::empty();
        flags.insert(SenseFlags::ACTIVE | SenseFlags::IMMUTABLE);
        assert!(flags.contains(SenseFlags::ACTIVE));
        assert!(flags.contains(SenseFlags::IMMUTABLE));
        assert!(!flags.contains(SenseFlags::SOFT));
        flags.remove(SenseFlags::IMMUTABLE);
        assert!(!flags.contains(SenseFlags::IMMUTABLE));
        assert!(flags.contains(SenseFlags::ACTIVE));
    }
}
