//! Scalar traits and dense vector/matrix utilities.

mod floats;
mod matrix;
mod vecmath;

pub use floats::*;
pub use matrix::*;
pub use vecmath::*;
