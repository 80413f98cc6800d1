//! ps-injector: swirl-injector sizing.
//!
//! Provides:
//! - The ideal swirl relations between spray half-angle, fullness, discharge
//!   coefficient and geometric characteristic (`geometry`)
//! - Closed-form radius, length and inlet-flow formulas (`sizing`)
//! - A hydraulic-loss correction loop that sizes a single element (`hydraulic`)
//! - Nested bipropellant elements (`bipropellant`)
//! - Chart-driven one-pass sizing with an injectable chart (`chart`)
//! - Parallel single-parameter sweeps and characteristic curves
//!
//! Every routine is a pure function of its inputs. Results carry a per-iteration
//! trace and any design-rule violations alongside the geometry.
//!
//! # Example
//!
//! ```
//! use ps_core::units::{deg, kg_per_m3, kgps, m2ps, pa};
//! use ps_injector::{InjectorStageSpec, LengthRatios, SizingConfig, size_stage};
//!
//! let spec = InjectorStageSpec {
//!     mass_flow: kgps(0.025),
//!     upstream_pressure: pa(2.4e6),
//!     chamber_pressure: pa(2.0e6),
//!     density: kg_per_m3(997.0),
//!     kinematic_viscosity: m2ps(1e-6),
//!     spray_half_angle: deg(60.0),
//!     inlet_passages: 3,
//!     length_ratios: LengthRatios::new(4.5, 1.0, 3.0),
//!     inlet_radius_ratio: None,
//! };
//!
//! let solution = size_stage(&spec, &SizingConfig::default()).unwrap();
//! assert!(solution.sized.nozzle_radius.value > 0.0);
//! assert!(solution.violations.is_empty());
//! ```

pub mod bipropellant;
pub mod chart;
pub mod config;
pub mod curves;
pub mod error;
pub mod geometry;
pub mod hydraulic;
pub mod sizing;
pub mod spec;
pub mod sweep;

pub use bipropellant::{
    BipropellantSolution, BipropellantSpec, OuterIterationSnapshot, OuterStageSolution,
    mixing_length, size_bipropellant,
};
pub use chart::{ChartLookup, EmpiricalSolution, EmpiricalStageSpec, TabulatedChart, size_empirical};
pub use config::{InletLossModel, SizingConfig};
pub use curves::{CharacteristicCurve, characteristic_curves};
pub use error::{DesignRuleViolation, InjectorError, InjectorResult, StageRole};
pub use geometry::{GeometricSolution, phi_from_a, phi_from_mu, solve_geometry};
pub use hydraulic::{
    ConvergenceState, IterationSnapshot, LoopPhase, LoopState, StageSolution, hydraulic_step,
    initial_state, size_stage,
};
pub use sizing::SizedGeometry;
pub use spec::{InjectorStageSpec, LengthRatios};
pub use sweep::{InjectorSweepParameter, InjectorSweepPoint, InjectorSweepResult, sweep_stage};
