//! Error types for engine sizing.

use ps_core::CoreError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Invalid input: {what} = {value}")]
    InvalidInput { what: &'static str, value: f64 },

    #[error("No thermochemistry data for {fuel}/{oxidizer}")]
    UnknownPropellants { fuel: String, oxidizer: String },

    #[error("{what} {value} outside table range [{min}, {max}]")]
    OutOfTableRange {
        what: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Invalid nozzle geometry: {what}")]
    InvalidGeometry { what: String },

    #[error("Invalid thermochemistry table {source_name}: {message}")]
    ThermoTable {
        source_name: String,
        message: String,
    },

    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },

    #[error("Core error: {0}")]
    Core(#[from] CoreError),
}

pub type EngineResult<T> = Result<T, EngineError>;

pub(crate) fn positive(value: f64, what: &'static str) -> EngineResult<f64> {
    ps_core::ensure_positive(value, what).map_err(|_| EngineError::InvalidInput { what, value })
}
