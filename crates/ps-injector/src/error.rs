//! Error types for injector sizing.

use ps_core::CoreError;
use ps_solver::SolverError;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Which element of an injector a result or violation belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StageRole {
    /// Monopropellant element
    Single,
    /// Inner (stage 1) element of a bipropellant injector
    Inner,
    /// Outer (stage 2) element of a bipropellant injector
    Outer,
}

impl fmt::Display for StageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single => write!(f, "single stage"),
            Self::Inner => write!(f, "inner stage"),
            Self::Outer => write!(f, "outer stage"),
        }
    }
}

/// A sized design that computes but breaks an empirical validity rule.
///
/// These are reported next to the geometry, never instead of it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DesignRuleViolation {
    /// Inlet passage flow is not in the turbulent smooth-pipe regime the
    /// friction correlation assumes.
    InletReynoldsTooLow {
        stage: StageRole,
        reynolds: f64,
        minimum: f64,
    },
}

impl fmt::Display for DesignRuleViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InletReynoldsTooLow {
                stage,
                reynolds,
                minimum,
            } => write!(
                f,
                "{stage}: inlet Reynolds number {reynolds:.1} is below {minimum:.0}"
            ),
        }
    }
}

/// Errors that can occur during injector sizing.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InjectorError {
    #[error("Invalid input: {what} = {value}")]
    InvalidInput { what: &'static str, value: f64 },

    #[error("No physical solution for spray half-angle {alpha_rad} rad: {reason}")]
    NoPhysicalSolution { alpha_rad: f64, reason: String },

    #[error("Inversion of {relation} failed for target {target}: {reason}")]
    InversionFailed {
        relation: &'static str,
        target: f64,
        reason: String,
    },

    #[error("{stage} did not converge after {iterations} iterations (last change {last_change})")]
    NonConvergence {
        stage: StageRole,
        iterations: usize,
        last_change: f64,
    },

    #[error("Design rule violated: {0}")]
    DesignRuleViolation(DesignRuleViolation),

    #[error("Chart lookup outside table: A = {a}, R_in/R_n = {ratio}")]
    ChartOutOfRange { a: f64, ratio: f64 },

    #[error("Invalid chart table {source_name}: {message}")]
    ChartTable {
        source_name: String,
        message: String,
    },

    #[error("Solver error: {0}")]
    Solver(#[from] SolverError),

    #[error("Core error: {0}")]
    Core(#[from] CoreError),
}

pub type InjectorResult<T> = Result<T, InjectorError>;

/// Finite and strictly positive, reported as `InvalidInput`.
pub(crate) fn positive(value: f64, what: &'static str) -> InjectorResult<f64> {
    ps_core::ensure_positive(value, what).map_err(|_| InjectorError::InvalidInput { what, value })
}

/// Finite and inside `(min, max)`, reported as `InvalidInput`.
pub(crate) fn open_interval(
    value: f64,
    min: f64,
    max: f64,
    what: &'static str,
) -> InjectorResult<f64> {
    ps_core::ensure_open_interval(value, min, max, what)
        .map_err(|_| InjectorError::InvalidInput { what, value })
}

impl From<InjectorError> for CoreError {
    fn from(e: InjectorError) -> Self {
        match e {
            InjectorError::InvalidInput { what, .. } => CoreError::InvalidArg { what },
            InjectorError::Core(inner) => inner,
            _ => CoreError::InvalidArg {
                what: "injector sizing failed",
            },
        }
    }
}
