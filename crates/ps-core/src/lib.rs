//! ps-core: stable foundation for propsize.
//!
//! Contains:
//! - units (uom SI types + constructors)
//! - numeric (Real + input guards)
//! - sweep (parameter sweep point generation)
//! - interp (axis bracketing and bilinear grids)
//! - error (shared error types)

pub mod error;
pub mod interp;
pub mod numeric;
pub mod sweep;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{CoreError, CoreResult};
pub use interp::{Grid2, bracket};
pub use numeric::*;
pub use sweep::{SweepDefinition, SweepType};
pub use units::*;
