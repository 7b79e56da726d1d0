use crate::algebra::*;
use crate::solver::core::types::{QpDims, SolverStatus};

/// Solution of a canonical dense QP.
///
/// Multiplier vectors cover the combined `[bounds; inequalities]` list:
/// entry `k < nb` belongs to bound `k`, entry `nb + j` to inequality row
/// `j`.  A constraint active at its upper side reports through
/// `lam_upper`, lower side through `lam_lower`; both are non-negative.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DenseQpSolution<T = f64> {
    /// primal solution, `nv`
    pub x: Vec<T>,
    /// lower-side multipliers over bounds then inequalities, `nb + ng`
    pub lam_lower: Vec<T>,
    /// upper-side multipliers over bounds then inequalities, `nb + ng`
    pub lam_upper: Vec<T>,
    /// equality multipliers, `ne`.  Signs are reported exactly as the
    /// engine produced them after `finalize`; no side classification
    /// applies to an equality.
    pub pi: Vec<T>,
    /// lower slack values of the soft constraints, `ns`
    pub slack_lower: Vec<T>,
    /// upper slack values of the soft constraints, `ns`
    pub slack_upper: Vec<T>,
    /// final solver status
    pub status: SolverStatus,
    /// engine solve time of the last call, seconds
    pub solve_time: f64,
    /// engine iterations of the last call
    pub iterations: u32,
}

impl<T> DenseQpSolution<T>
where
    T: FloatT,
{
    /// Create a new zeroed `DenseQpSolution` for the given dimensions.
    pub fn new(dims: QpDims) -> Self {
        let QpDims { nv, nb, ng, ne, ns } = dims;
        Self {
            x: vec![T::zero(); nv],
            lam_lower: vec![T::zero(); nb + ng],
            lam_upper: vec![T::zero(); nb + ng],
            pi: vec![T::zero(); ne],
            slack_lower: vec![T::zero(); ns],
            slack_upper: vec![T::zero(); ns],
            status: SolverStatus::Unsolved,
            solve_time: 0f64,
            iterations: 0,
        }
    }
}
