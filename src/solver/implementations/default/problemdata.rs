use crate::algebra::*;
use crate::solver::core::types::{DataError, QpDims};

/// A canonical dense QP instance.
///
/// ```text
/// minimize    0.5 x'Hx + f'x  (+ elastic penalties)
/// subject to  lb <= x[idxb] <= ub
///             cl <= C x <= cu
///             E x  = b
/// ```
///
/// The Hessian is symmetric with the lower triangle authoritative; the
/// strict upper triangle may hold anything until
/// [`symmetrize_from_lower`](crate::algebra::Matrix::symmetrize_from_lower)
/// runs during marshalling, which overwrites it in place.  Callers must
/// therefore treat an instance as consumed by a solve and re-fill the
/// Hessian before reusing it elsewhere as lower-triangular data.
///
/// Soft constraints elasticize individual entries of the combined
/// `[bounds; inequalities]` list: `idxs[k] < nb` softens bound `idxs[k]`,
/// larger values soften inequality row `idxs[k] - nb`.  Violations are
/// penalized quadratically through the weights and linearly through the
/// linear terms.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DenseQp<T = f64> {
    pub dims: QpDims,
    /// symmetric Hessian, `nv x nv`, lower triangle authoritative
    pub hess: Matrix<T>,
    /// linear cost, `nv`
    pub grad: Vec<T>,
    /// indices of bounded variables, `nb`
    pub idxb: Vec<usize>,
    /// lower bounds on the bounded variables, `nb`
    pub lb: Vec<T>,
    /// upper bounds on the bounded variables, `nb`
    pub ub: Vec<T>,
    /// general inequality rows, `ng x nv`
    pub a_ineq: Matrix<T>,
    /// inequality lower bounds, `ng`
    pub cl: Vec<T>,
    /// inequality upper bounds, `ng`
    pub cu: Vec<T>,
    /// equality rows, `ne x nv`
    pub a_eq: Matrix<T>,
    /// equality right-hand sides, `ne`
    pub b_eq: Vec<T>,
    /// soft-constraint positions in the `[bounds; inequalities]` list, `ns`
    pub idxs: Vec<usize>,
    /// lower quadratic penalty weights, `ns`
    pub soft_wt_lower: Vec<T>,
    /// upper quadratic penalty weights, `ns`
    pub soft_wt_upper: Vec<T>,
    /// lower linear penalty terms, `ns`
    pub soft_lin_lower: Vec<T>,
    /// upper linear penalty terms, `ns`
    pub soft_lin_upper: Vec<T>,
    /// lower bounds on the lower slacks, `ns`
    pub slack_lb: Vec<T>,
    /// lower bounds on the upper slacks, `ns`
    pub slack_ub: Vec<T>,
}

impl<T: FloatT> DenseQp<T> {
    /// An all-zeros instance of the given dimensions, for the caller
    /// to fill field by field.
    pub fn zeros(dims: QpDims) -> Self {
        let QpDims { nv, nb, ng, ne, ns } = dims;
        Self {
            dims,
            hess: Matrix::zeros(nv, nv),
            grad: vec![T::zero(); nv],
            idxb: vec![0; nb],
            lb: vec![T::zero(); nb],
            ub: vec![T::zero(); nb],
            a_ineq: Matrix::zeros(ng, nv),
            cl: vec![T::zero(); ng],
            cu: vec![T::zero(); ng],
            a_eq: Matrix::zeros(ne, nv),
            b_eq: vec![T::zero(); ne],
            idxs: vec![0; ns],
            soft_wt_lower: vec![T::one(); ns],
            soft_wt_upper: vec![T::one(); ns],
            soft_lin_lower: vec![T::zero(); ns],
            soft_lin_upper: vec![T::zero(); ns],
            slack_lb: vec![T::zero(); ns],
            slack_ub: vec![T::zero(); ns],
        }
    }

    /// Check field lengths and index ranges against the dimensions.
    pub fn validate(&self) -> Result<(), DataError> {
        let QpDims { nv, nb, ng, ne, ns } = self.dims;
        self.dims.validate()?;

        if self.hess.nrows() != nv || self.hess.ncols() != nv {
            return Err(DataError::IncompatibleDimension("hess"));
        }
        if self.grad.len() != nv {
            return Err(DataError::IncompatibleDimension("grad"));
        }
        if self.idxb.len() != nb || self.lb.len() != nb || self.ub.len() != nb {
            return Err(DataError::IncompatibleDimension("bounds"));
        }
        if self.a_ineq.nrows() != ng || self.a_ineq.ncols() != nv {
            return Err(DataError::IncompatibleDimension("a_ineq"));
        }
        if self.cl.len() != ng || self.cu.len() != ng {
            return Err(DataError::IncompatibleDimension("inequality bounds"));
        }
        if self.a_eq.nrows() != ne || self.a_eq.ncols() != nv {
            return Err(DataError::IncompatibleDimension("a_eq"));
        }
        if self.b_eq.len() != ne {
            return Err(DataError::IncompatibleDimension("b_eq"));
        }
        if self.idxs.len() != ns
            || self.soft_wt_lower.len() != ns
            || self.soft_wt_upper.len() != ns
            || self.soft_lin_lower.len() != ns
            || self.soft_lin_upper.len() != ns
            || self.slack_lb.len() != ns
            || self.slack_ub.len() != ns
        {
            return Err(DataError::IncompatibleDimension("soft constraints"));
        }

        if self.idxb.iter().any(|&v| v >= nv) {
            return Err(DataError::BoundIndexOutOfRange);
        }
        if self.idxs.iter().any(|&s| s >= nb + ng) {
            return Err(DataError::SoftIndexOutOfRange);
        }
        if self
            .soft_wt_lower
            .iter()
            .chain(self.soft_wt_upper.iter())
            .any(|&w| w <= T::zero())
        {
            return Err(DataError::NonPositiveSoftWeight);
        }

        Ok(())
    }
}
