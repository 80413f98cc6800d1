//! Stage input records.

use crate::config::SizingConfig;
use crate::error::{InjectorError, InjectorResult, open_interval, positive};
use ps_core::units::{Angle, Density, KinVisc, MassRate, Pressure};
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;

/// Dimensionless lengths, each relative to its basis radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LengthRatios {
    /// l_in / r_in (inlet passage length over inlet passage radius)
    pub inlet: f64,
    /// l_n / R_n (nozzle length over nozzle radius)
    pub nozzle: f64,
    /// l_s / R_in (vortex chamber length over inlet arm radius)
    pub chamber: f64,
}

impl LengthRatios {
    pub fn new(inlet: f64, nozzle: f64, chamber: f64) -> Self {
        Self {
            inlet,
            nozzle,
            chamber,
        }
    }

    pub(crate) fn validate(&self) -> InjectorResult<()> {
        positive(self.inlet, "inlet length ratio")?;
        positive(self.nozzle, "nozzle length ratio")?;
        positive(self.chamber, "chamber length ratio")?;
        Ok(())
    }
}

/// Inputs for one swirl element.
#[derive(Debug, Clone, PartialEq)]
pub struct InjectorStageSpec {
    pub mass_flow: MassRate,
    /// Feed pressure upstream of the tangential inlets
    pub upstream_pressure: Pressure,
    pub chamber_pressure: Pressure,
    pub density: Density,
    pub kinematic_viscosity: KinVisc,
    pub spray_half_angle: Angle,
    /// Number of tangential inlet passages
    pub inlet_passages: u32,
    pub length_ratios: LengthRatios,
    /// Overrides `SizingConfig::inlet_radius_ratio` for this stage
    pub inlet_radius_ratio: Option<f64>,
}

/// Validated stage inputs as SI scalars.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct StageInputs {
    pub mass_flow: f64,
    pub pressure_drop: f64,
    pub density: f64,
    pub viscosity: f64,
    pub alpha: f64,
    pub passages: f64,
    pub ratios: LengthRatios,
    pub inlet_radius_ratio: f64,
}

impl InjectorStageSpec {
    pub fn pressure_drop(&self) -> Pressure {
        self.upstream_pressure - self.chamber_pressure
    }

    /// Check every input before any solver call.
    pub fn validate(&self) -> InjectorResult<()> {
        self.inputs(SizingConfig::default().inlet_radius_ratio)
            .map(|_| ())
    }

    pub(crate) fn inputs(&self, default_inlet_radius_ratio: f64) -> InjectorResult<StageInputs> {
        let pressure_drop = positive(self.pressure_drop().value, "pressure drop")?;
        let mass_flow = positive(self.mass_flow.value, "mass flow")?;
        let density = positive(self.density.value, "density")?;
        let viscosity = positive(self.kinematic_viscosity.value, "kinematic viscosity")?;
        let alpha = open_interval(
            self.spray_half_angle.value,
            0.0,
            FRAC_PI_2,
            "spray half-angle",
        )?;
        if self.inlet_passages == 0 {
            return Err(InjectorError::InvalidInput {
                what: "inlet passage count",
                value: 0.0,
            });
        }
        self.length_ratios.validate()?;
        let inlet_radius_ratio = positive(
            self.inlet_radius_ratio.unwrap_or(default_inlet_radius_ratio),
            "inlet radius ratio",
        )?;

        Ok(StageInputs {
            mass_flow,
            pressure_drop,
            density,
            viscosity,
            alpha,
            passages: f64::from(self.inlet_passages),
            ratios: self.length_ratios,
            inlet_radius_ratio,
        })
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::water_stage;
    use super::*;
    use ps_core::units::{pa, rad};

    #[test]
    fn pressure_drop_is_upstream_minus_chamber() {
        assert!((water_stage().pressure_drop().value - 4e5).abs() < 1e-6);
    }

    #[test]
    fn zero_pressure_drop_is_invalid() {
        let spec = InjectorStageSpec {
            upstream_pressure: pa(2.0e6),
            ..water_stage()
        };
        assert_eq!(
            spec.validate(),
            Err(InjectorError::InvalidInput {
                what: "pressure drop",
                value: 0.0
            })
        );
    }

    #[test]
    fn right_angle_is_invalid() {
        let spec = InjectorStageSpec {
            spray_half_angle: rad(FRAC_PI_2),
            ..water_stage()
        };
        assert!(matches!(
            spec.validate(),
            Err(InjectorError::InvalidInput {
                what: "spray half-angle",
                ..
            })
        ));
    }

    #[test]
    fn zero_passages_is_invalid() {
        let spec = InjectorStageSpec {
            inlet_passages: 0,
            ..water_stage()
        };
        assert!(spec.validate().is_err());
    }

    #[test]
    fn stage_override_wins_over_default_ratio() {
        let spec = InjectorStageSpec {
            inlet_radius_ratio: Some(2.0),
            ..water_stage()
        };
        assert_eq!(spec.inputs(1.25).unwrap().inlet_radius_ratio, 2.0);
        assert_eq!(water_stage().inputs(1.25).unwrap().inlet_radius_ratio, 1.25);
    }
}
