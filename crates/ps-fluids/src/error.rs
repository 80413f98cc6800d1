//! Fluid property errors.

use ps_core::CoreError;
use thiserror::Error;

/// Result type for fluid operations.
pub type FluidResult<T> = Result<T, FluidError>;

/// Errors that can occur while loading or querying fluid properties.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FluidError {
    /// Lookup miss: the name is neither a canonical id nor an alias.
    #[error("Unknown fluid: {name}")]
    UnknownFluid { name: String },

    /// Non-physical values (negative density, temperature, etc.).
    #[error("Non-physical value for {what} of fluid {fluid}: {value}")]
    NonPhysical {
        fluid: String,
        what: &'static str,
        value: f64,
    },

    /// A table row could not be interpreted.
    #[error("Invalid record in {source_name}: {message}")]
    InvalidRecord {
        source_name: String,
        message: String,
    },

    /// Filesystem error while reading a property table.
    #[error("I/O error reading {path}: {message}")]
    Io { path: String, message: String },
}

impl From<FluidError> for CoreError {
    fn from(err: FluidError) -> Self {
        match err {
            FluidError::UnknownFluid { .. } => CoreError::InvalidArg {
                what: "unknown fluid",
            },
            FluidError::NonPhysical { what, .. } => CoreError::InvalidArg { what },
            FluidError::InvalidRecord { .. } | FluidError::Io { .. } => CoreError::InvalidArg {
                what: "fluid property table",
            },
        }
    }
}
