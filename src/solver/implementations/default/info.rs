use crate::solver::core::types::SolverStatus;
use crate::solver::implementations::default::settings::SettingsError;

/// A value returned by a telemetry query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TelemetryValue {
    Float(f64),
    Int(u32),
}

/// Per-solve telemetry, refreshed on every call.
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolveInfo {
    /// wall-clock time inside the engine, seconds
    pub solve_time: f64,
    /// wall-clock time spent marshalling and extracting, seconds
    pub interface_time: f64,
    /// total wall-clock time of the call, seconds
    pub total_time: f64,
    /// engine iterations
    pub iterations: u32,
    /// status at termination
    pub status: SolverStatus,
}

impl SolveInfo {
    /// String-keyed telemetry query.
    ///
    /// `time_qp_solver_call` reports the engine solve time and `iter`
    /// the iteration count.  Unknown fields are a recoverable
    /// [`SettingsError::UnknownField`].
    pub fn telemetry(&self, field: &str) -> Result<TelemetryValue, SettingsError> {
        match field {
            "time_qp_solver_call" => Ok(TelemetryValue::Float(self.solve_time)),
            "iter" => Ok(TelemetryValue::Int(self.iterations)),
            _ => Err(SettingsError::UnknownField(field.to_string())),
        }
    }
}
