//! ps-fluids: liquid propellant property lookup for propsize.
//!
//! Provides:
//! - `FluidProperties`, the handful of scalar properties the sizing scripts need
//!   (enthalpy of vaporization, saturation temperature, liquid density, specific heats)
//! - a built-in catalog of common propellants with aliases
//! - `FluidTable`, a name-keyed table that can be extended from CSV files
//!
//! # Example
//!
//! ```
//! use ps_fluids::FluidTable;
//!
//! let table = FluidTable::builtin();
//! let water = table.lookup("Water").unwrap();
//! assert!((water.liquid_density().value - 997.0).abs() < 1e-9);
//! assert!(table.lookup("unobtainium").is_err());
//! ```

pub mod catalog;
pub mod error;
pub mod properties;
pub mod table;

// Re-exports for ergonomics
pub use catalog::{FluidCatalogEntry, builtin_catalog, filter_builtin_catalog};
pub use error::{FluidError, FluidResult};
pub use properties::FluidProperties;
pub use table::FluidTable;
