//! ps-engine: rocket engine sizing.
//!
//! Chamber gas properties come from a [`ThermoOracle`]; the shipped
//! [`ThermoTable`] interpolates precomputed equilibrium-solver output. From
//! those properties [`EnginePerformance`] sizes the throat, exit and chamber,
//! [`NozzleContour`] lays out a conical wall, and [`sweep_engines`] runs the
//! whole chain over a grid of operating points.
//!
//! ```
//! use ps_core::units::{kgps, m, pa};
//! use ps_engine::{EnginePerformance, EngineSpec, ThermoTable};
//!
//! let csv = "fuel,oxidizer,pc_pa,mixture_ratio,t_k,gamma,mw_kg_kmol,c_mps,area_ratio
//! CH4,LOX,2e6,2.5,3300,1.20,20.0,2900,4.0
//! CH4,LOX,2e6,3.5,3500,1.16,23.0,2950,4.2
//! CH4,LOX,6e6,2.5,3400,1.18,20.5,3000,8.0
//! CH4,LOX,6e6,3.5,3600,1.14,23.5,3050,8.4
//! ";
//! let table = ThermoTable::from_csv_reader(csv.as_bytes(), "inline").unwrap();
//! let spec = EngineSpec {
//!     fuel: "CH4".into(),
//!     oxidizer: "LOX".into(),
//!     chamber_pressure: pa(4e6),
//!     mixture_ratio: 3.0,
//!     mass_flow: kgps(2.0),
//!     characteristic_length: m(1.0),
//!     chamber_diameter: m(0.1),
//!     efficiency: 1.0,
//! };
//! let perf = EnginePerformance::size(&spec, &table).unwrap();
//! assert!((perf.thrust.value - 2.0 * 2975.0).abs() < 1e-6);
//! ```

pub mod contour;
pub mod error;
pub mod heat;
pub mod performance;
pub mod sweep;
pub mod thermo;

pub use contour::{
    ContourPoint, ContourSegment, ContourSpec, NozzleContour, write_contour_csv,
    write_contour_csv_path,
};
pub use error::{EngineError, EngineResult};
pub use heat::{BartzInputs, bartz, hoop_stress};
pub use performance::{EnginePerformance, EngineSpec};
pub use sweep::{
    EngineSweep, EngineSweepOutcome, EngineSweepResult, EngineSweepRow, sweep_engines,
    write_sweep_csv,
};
pub use thermo::{ThermoOracle, ThermoProperties, ThermoQuery, ThermoRecord, ThermoTable};
