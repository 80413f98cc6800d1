//! Sizing configuration.

use crate::error::{InjectorError, InjectorResult, positive};
use ps_solver::NewtonConfig;

/// How the tangential inlet loss coefficient ε_in is obtained.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InletLossModel {
    /// Linear fit to the published chart, keyed on the inlet entry angle
    /// `90° − atan(R_s / l_in)`: `ε_in = −0.015·(angle − 30) + 0.9`.
    ChartFit,
    /// A fixed coefficient (common hand values are 0.1–0.2).
    Fixed(f64),
}

impl InletLossModel {
    /// Inlet loss coefficient for the given vortex-chamber radius and inlet length.
    pub fn coefficient(&self, chamber_radius: f64, inlet_length: f64) -> f64 {
        match *self {
            Self::ChartFit => {
                let angle_deg = 90.0 - (chamber_radius / inlet_length).atan().to_degrees();
                -0.015 * (angle_deg - 30.0) + 0.9
            }
            Self::Fixed(eps) => eps,
        }
    }
}

/// Constants of the sizing procedure, all overridable.
#[derive(Debug, Clone, PartialEq)]
pub struct SizingConfig {
    /// Radial position of the inlet passages relative to the nozzle radius, R_in / R_n
    pub inlet_radius_ratio: f64,
    /// Spray half-angle change that ends the hydraulic-loss loop, rad
    pub angle_tolerance: f64,
    /// Iteration bound for every fixed-point loop
    pub max_iterations: usize,
    /// Outer-stage nozzle radius change that ends the coupling loop, m
    pub outer_radius_tolerance: f64,
    /// Smallest inlet Reynolds number for which the friction correlation holds
    pub min_reynolds: f64,
    pub inlet_loss: InletLossModel,
    /// Settings for every root solve
    pub newton: NewtonConfig,
}

impl Default for SizingConfig {
    fn default() -> Self {
        Self {
            inlet_radius_ratio: 1.25,
            angle_tolerance: 1e-3,
            max_iterations: 100,
            outer_radius_tolerance: 1e-4,
            min_reynolds: 1e4,
            inlet_loss: InletLossModel::ChartFit,
            newton: NewtonConfig::default(),
        }
    }
}

impl SizingConfig {
    pub fn validate(&self) -> InjectorResult<()> {
        positive(self.inlet_radius_ratio, "inlet radius ratio")?;
        positive(self.angle_tolerance, "angle tolerance")?;
        positive(self.outer_radius_tolerance, "outer radius tolerance")?;
        if !self.min_reynolds.is_finite() || self.min_reynolds < 0.0 {
            return Err(InjectorError::InvalidInput {
                what: "minimum Reynolds number",
                value: self.min_reynolds,
            });
        }
        if self.max_iterations == 0 {
            return Err(InjectorError::InvalidInput {
                what: "max iterations",
                value: 0.0,
            });
        }
        if let InletLossModel::Fixed(eps) = self.inlet_loss {
            if !eps.is_finite() || eps < 0.0 {
                return Err(InjectorError::InvalidInput {
                    what: "inlet loss coefficient",
                    value: eps,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = SizingConfig::default();
        cfg.validate().unwrap();
        assert_eq!(cfg.inlet_radius_ratio, 1.25);
        assert_eq!(cfg.inlet_loss, InletLossModel::ChartFit);
    }

    #[test]
    fn chart_fit_at_thirty_degrees_is_point_nine() {
        // atan(R_s / l_in) = 60° gives an entry angle of 30°
        let l_in = 1.0;
        let r_s = 60f64.to_radians().tan();
        let eps = InletLossModel::ChartFit.coefficient(r_s, l_in);
        assert!((eps - 0.9).abs() < 1e-12);
    }

    #[test]
    fn fixed_model_ignores_geometry() {
        assert_eq!(InletLossModel::Fixed(0.2).coefficient(1.0, 2.0), 0.2);
    }

    #[test]
    fn rejects_zero_iterations() {
        let cfg = SizingConfig {
            max_iterations: 0,
            ..SizingConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_negative_fixed_loss() {
        let cfg = SizingConfig {
            inlet_loss: InletLossModel::Fixed(-0.1),
            ..SizingConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(InjectorError::InvalidInput { .. })
        ));
    }
}
