use crate::algebra::*;
use derive_builder::Builder;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Error type returned by settings manipulation and telemetry queries.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SettingsError {
    /// Unrecognized setting name
    #[error("unrecognized setting \"{0}\"")]
    UnknownSetting(String),
    /// A value of the wrong type was supplied for a named setting
    #[error("wrong value type for setting \"{0}\"")]
    WrongValueType(&'static str),
    /// Bad value on a named field
    #[error("bad value on field \"{0}\"")]
    BadFieldValue(&'static str),
    /// Unrecognized telemetry field name
    #[error("telemetry field \"{0}\" is not available")]
    UnknownField(String),
}

/// Warm-start mode for repeated solves on one workspace.
///
/// Each mode selects a different, mutually exclusive subset of engine
/// recomputation; the modes are branches, not a spectrum.
#[repr(u32)]
#[derive(PartialEq, Eq, Clone, Copy, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum WarmStart {
    /// Deactivate all constraints, then fully recompute factorization,
    /// projection, shift and bounds before solving.
    Cold = 0,
    /// Fully recompute numeric state, then re-activate the previous
    /// working set: the carried active set seeds the search without
    /// trusting stale numeric state.
    #[default]
    ActiveSet = 1,
    /// Trust the previous factorization and projection entirely;
    /// recompute only the shift and bound vectors.  Valid only when the
    /// problem structure is unchanged since the last solve.
    Numeric = 2,
}

impl TryFrom<u32> for WarmStart {
    type Error = SettingsError;
    fn try_from(v: u32) -> Result<Self, SettingsError> {
        match v {
            0 => Ok(WarmStart::Cold),
            1 => Ok(WarmStart::ActiveSet),
            2 => Ok(WarmStart::Numeric),
            _ => Err(SettingsError::BadFieldValue("warm_start")),
        }
    }
}

/// A value for the string-keyed settings surface.
#[derive(Debug, Clone, Copy)]
pub enum SettingsValue<T> {
    Float(T),
    Int(u32),
}

/// Solver settings for the dense canonical-QP front end.
#[derive(Builder, Debug, Clone)]
#[builder(build_fn(validate = "Self::validate"))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[cfg_attr(feature = "serde", serde(bound(serialize = "T: FloatT", deserialize = "T: FloatT")))]
pub struct DefaultSettings<T: FloatT> {
    /// inequality feasibility tolerance, forwarded to the engine
    #[builder(default = "(1e-6).as_T()")]
    pub tol_ineq: T,

    /// maximum number of engine iterations, forwarded to the engine
    #[builder(default = "1000")]
    pub iter_max: u32,

    /// warm-start mode
    #[builder(default = "WarmStart::ActiveSet")]
    pub warm_start: WarmStart,

    /// verbose printing
    #[builder(default = "false")]
    pub verbose: bool,

    /// stationarity tolerance; accepted but unused, since the engine
    /// always drives to a stationary point
    #[builder(default = "(1e-8).as_T()")]
    pub tol_stat: T,

    /// equality tolerance; accepted but unused, since equalities are
    /// held in the working set explicitly
    #[builder(default = "(1e-8).as_T()")]
    pub tol_eq: T,

    /// complementarity tolerance; accepted but unused, since
    /// complementary slackness is implicit in the working set
    #[builder(default = "(1e-8).as_T()")]
    pub tol_comp: T,
}

impl<T> Default for DefaultSettings<T>
where
    T: FloatT,
{
    fn default() -> DefaultSettings<T> {
        DefaultSettingsBuilder::<T>::default().build().unwrap()
    }
}

impl<T> DefaultSettings<T>
where
    T: FloatT,
{
    /// Checks that the settings are valid.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.tol_ineq <= T::zero() {
            return Err(SettingsError::BadFieldValue("tol_ineq"));
        }
        if self.iter_max == 0 {
            return Err(SettingsError::BadFieldValue("iter_max"));
        }
        Ok(())
    }

    /// Set a field through the string-keyed surface.
    ///
    /// `tol_ineq`, `iter_max` and `warm_start` take effect; `tol_stat`,
    /// `tol_eq` and `tol_comp` are accepted without effect on the engine.
    /// An unrecognized name is a recoverable
    /// [`SettingsError::UnknownSetting`].
    pub fn set_by_name(&mut self, field: &str, value: SettingsValue<T>) -> Result<(), SettingsError> {
        match field {
            "tol_ineq" => self.tol_ineq = Self::float_value("tol_ineq", value)?,
            "tol_stat" => self.tol_stat = Self::float_value("tol_stat", value)?,
            "tol_eq" => self.tol_eq = Self::float_value("tol_eq", value)?,
            "tol_comp" => self.tol_comp = Self::float_value("tol_comp", value)?,
            "iter_max" => self.iter_max = Self::int_value("iter_max", value)?,
            "warm_start" => {
                self.warm_start = WarmStart::try_from(Self::int_value("warm_start", value)?)?
            }
            _ => return Err(SettingsError::UnknownSetting(field.to_string())),
        }
        self.validate()
    }

    fn float_value(field: &'static str, value: SettingsValue<T>) -> Result<T, SettingsError> {
        match value {
            SettingsValue::Float(v) => Ok(v),
            SettingsValue::Int(_) => Err(SettingsError::WrongValueType(field)),
        }
    }

    fn int_value(field: &'static str, value: SettingsValue<T>) -> Result<u32, SettingsError> {
        match value {
            SettingsValue::Int(v) => Ok(v),
            SettingsValue::Float(_) => Err(SettingsError::WrongValueType(field)),
        }
    }
}

// pre build checker (for auto-validation when using the builder)

impl From<SettingsError> for DefaultSettingsBuilderError {
    fn from(e: SettingsError) -> Self {
        DefaultSettingsBuilderError::ValidationError(e.to_string())
    }
}

/// Automatic pre-build settings validation
impl<T> DefaultSettingsBuilder<T>
where
    T: FloatT,
{
    pub fn validate(&self) -> Result<(), SettingsError> {
        if let Some(tol_ineq) = self.tol_ineq {
            if tol_ineq <= T::zero() {
                return Err(SettingsError::BadFieldValue("tol_ineq"));
            }
        }
        if let Some(iter_max) = self.iter_max {
            if iter_max == 0 {
                return Err(SettingsError::BadFieldValue("iter_max"));
            }
        }
        Ok(())
    }
}
