#![allow(non_snake_case)]
use num_traits::{Float, FloatConst, FromPrimitive, NumAssign};
use std::fmt::{Debug, Display, LowerExp};

/// Core traits for internal floating point values.
///
/// This trait defines a subset of bounds for `FloatT`, which is preferred
/// throughout for use in the solver.
pub trait CoreFloatT:
    'static
    + Send
    + Float
    + FloatConst
    + NumAssign
    + Default
    + FromPrimitive
    + Display
    + LowerExp
    + Debug
    + Sized
{
}

impl<T> CoreFloatT for T where
    T: 'static
        + Send
        + Float
        + FloatConst
        + NumAssign
        + Default
        + FromPrimitive
        + Display
        + LowerExp
        + Debug
        + Sized
{
}

// workspace buffers live in a single byte arena, so solver scalars must
// additionally be plain-old-data to allow typed carving of that arena

cfg_if::cfg_if! {
    if #[cfg(feature="serde")] {
        /// Main trait for floating point types used in the solver.
        ///
        /// All floating point calculations are represented internally on values
        /// implementing the `FloatT` trait.  Implementations are provided for the
        /// native f32 and f64 types; any other type satisfying the constituent
        /// bounds will also work.  `FloatT` relies on [`num_traits`](num_traits)
        /// for most of its constituent trait bounds, plus
        /// [`bytemuck::Pod`](bytemuck::Pod) so that values can live in the
        /// solver's workspace arena.
        pub trait FloatT: CoreFloatT + bytemuck::Pod + serde::Serialize + serde::de::DeserializeOwned {}
        impl<T> FloatT for T where T: CoreFloatT + bytemuck::Pod + serde::Serialize + serde::de::DeserializeOwned {}
    } else {
        /// Main trait for floating point types used in the solver.
        ///
        /// All floating point calculations are represented internally on values
        /// implementing the `FloatT` trait.  Implementations are provided for the
        /// native f32 and f64 types; any other type satisfying the constituent
        /// bounds will also work.  `FloatT` relies on [`num_traits`](num_traits)
        /// for most of its constituent trait bounds, plus
        /// [`bytemuck::Pod`](bytemuck::Pod) so that values can live in the
        /// solver's workspace arena.
        pub trait FloatT: CoreFloatT + bytemuck::Pod {}
        impl<T> FloatT for T where T: CoreFloatT + bytemuck::Pod {}
    }
}

/// Trait for converting Rust primitives to [`FloatT`](crate::algebra::FloatT)
///
/// This convenience trait is implemented on f32/64 and u32/64.  It is
/// required internally by the solver for converting constant primitives
/// to [`FloatT`](crate::algebra::FloatT), and is also used by the
/// [user settings](crate::solver::implementations::default::DefaultSettings)
/// for converting defaults of primitive type to [`FloatT`](crate::algebra::FloatT).

// NB: `AsFloatT` is a convenience trait for f32/64 and u32/64
// so that we can do things like (2.0).as_T() everywhere on
// constants, rather than the awful T::from_f32(2.0).unwrap()
pub trait AsFloatT<T>: 'static {
    fn as_T(&self) -> T;
}

macro_rules! impl_as_FloatT {
    ($ty:ty, $ident:ident) => {
        impl<T> AsFloatT<T> for $ty
        where
            T: std::ops::Mul<T, Output = T> + FromPrimitive + 'static,
        {
            #[inline]
            fn as_T(&self) -> T {
                T::$ident(*self).unwrap()
            }
        }
    };
}
impl_as_FloatT!(u32, from_u32);
impl_as_FloatT!(u64, from_u64);
impl_as_FloatT!(usize, from_usize);
impl_as_FloatT!(f32, from_f32);
impl_as_FloatT!(f64, from_f64);
