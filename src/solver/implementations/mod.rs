//! Implementations of the solver front end for specific problem formats.
//!
//! Only the dense canonical-QP format is implemented, as the
//! [`default`] module.

pub mod default;
