//! Closed-form radius, length and inlet-flow formulas.

use crate::error::{InjectorResult, positive};
use crate::spec::LengthRatios;
use ps_core::units::{Length, m};
use serde::Serialize;

/// Nozzle radius `R_n = 0.475·√(ṁ / (μ·√(ρ·Δp)))`.
pub fn nozzle_radius(
    mass_flow: f64,
    discharge_coefficient: f64,
    density: f64,
    pressure_drop: f64,
) -> InjectorResult<f64> {
    let pressure_drop = positive(pressure_drop, "pressure drop")?;
    let mass_flow = positive(mass_flow, "mass flow")?;
    let density = positive(density, "density")?;
    let mu = positive(discharge_coefficient, "discharge coefficient")?;
    Ok(0.475 * (mass_flow / (mu * (density * pressure_drop).sqrt())).sqrt())
}

/// Inlet passage radius `r_in = √(R_in·R_n / (n·A))`.
pub fn inlet_passage_radius(
    inlet_arm_radius: f64,
    nozzle_radius: f64,
    passages: f64,
    a: f64,
) -> f64 {
    (inlet_arm_radius * nozzle_radius / (passages * a)).sqrt()
}

/// Geometric characteristic of a built nozzle, `A = R_in·R_n / (n·r_in²)`.
pub fn geometric_characteristic(
    inlet_arm_radius: f64,
    nozzle_radius: f64,
    passages: f64,
    inlet_passage_radius: f64,
) -> f64 {
    inlet_arm_radius * nozzle_radius / (passages * inlet_passage_radius.powi(2))
}

/// Reynolds number in the inlet passages, `Re = 0.637·ṁ / (√n·r_in·ρ·ν)`.
pub fn inlet_reynolds(
    mass_flow: f64,
    passages: f64,
    inlet_passage_radius: f64,
    density: f64,
    viscosity: f64,
) -> f64 {
    0.637 * mass_flow / (passages.sqrt() * inlet_passage_radius * density * viscosity)
}

/// Blasius smooth-pipe friction factor `λ = 0.3164 / Re^0.25`.
///
/// Only meaningful in the turbulent regime; the sizing routines check the
/// Reynolds number against `SizingConfig::min_reynolds` and report a
/// violation rather than refusing to compute.
pub fn friction_factor(reynolds: f64) -> f64 {
    0.3164 / reynolds.powf(0.25)
}

/// Loss-adjusted characteristic
/// `A_eq = R_in·R_n / (n·r_in² + λ/2·R_in·(R_in − R_n))`.
pub fn equivalent_characteristic(
    inlet_arm_radius: f64,
    nozzle_radius: f64,
    passages: f64,
    inlet_passage_radius: f64,
    friction: f64,
) -> f64 {
    inlet_arm_radius * nozzle_radius
        / (passages * inlet_passage_radius.powi(2)
            + friction / 2.0 * inlet_arm_radius * (inlet_arm_radius - nozzle_radius))
}

/// Physical dimensions of one swirl element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SizedGeometry {
    /// R_n
    pub nozzle_radius: Length,
    /// R_in, radial position of the inlet passage axes
    pub inlet_arm_radius: Length,
    /// r_in
    pub inlet_passage_radius: Length,
    /// R_s = R_in + r_in
    pub vortex_chamber_radius: Length,
    /// l_in
    pub inlet_passage_length: Length,
    /// l_n
    pub nozzle_length: Length,
    /// l_s
    pub vortex_chamber_length: Length,
}

impl SizedGeometry {
    /// Lay out lengths from the three basis radii.
    pub fn from_radii(
        nozzle_radius: f64,
        inlet_arm_radius: f64,
        inlet_passage_radius: f64,
        ratios: &LengthRatios,
    ) -> Self {
        Self {
            nozzle_radius: m(nozzle_radius),
            inlet_arm_radius: m(inlet_arm_radius),
            inlet_passage_radius: m(inlet_passage_radius),
            vortex_chamber_radius: m(inlet_arm_radius + inlet_passage_radius),
            inlet_passage_length: m(ratios.inlet * inlet_passage_radius),
            nozzle_length: m(ratios.nozzle * nozzle_radius),
            vortex_chamber_length: m(ratios.chamber * inlet_arm_radius),
        }
    }

    /// Size an element from its nozzle radius and geometric characteristic.
    pub fn from_nozzle(
        nozzle_radius: f64,
        a: f64,
        passages: f64,
        inlet_radius_ratio: f64,
        ratios: &LengthRatios,
    ) -> Self {
        let arm = inlet_radius_ratio * nozzle_radius;
        let passage = inlet_passage_radius(arm, nozzle_radius, passages, a);
        Self::from_radii(nozzle_radius, arm, passage, ratios)
    }

    /// Length ratios recovered by dividing each length by its basis radius.
    pub fn length_ratios(&self) -> LengthRatios {
        LengthRatios {
            inlet: (self.inlet_passage_length / self.inlet_passage_radius).value,
            nozzle: (self.nozzle_length / self.nozzle_radius).value,
            chamber: (self.vortex_chamber_length / self.inlet_arm_radius).value,
        }
    }

    pub(crate) fn is_physical(&self) -> bool {
        [
            self.nozzle_radius,
            self.inlet_arm_radius,
            self.inlet_passage_radius,
            self.inlet_passage_length,
            self.nozzle_length,
            self.vortex_chamber_length,
        ]
        .iter()
        .all(|l| l.value.is_finite() && l.value > 0.0)
    }
}
