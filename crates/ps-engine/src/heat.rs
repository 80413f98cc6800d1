//! Wall stress and gas-side heat transfer estimates.

use crate::error::{EngineResult, positive};
use crate::performance::EnginePerformance;
use ps_core::units::{Length, Pressure, Temperature, pa};

/// Thin-wall hoop stress `σ = p·d / (2·t)`.
pub fn hoop_stress(
    internal_pressure: Pressure,
    inside_diameter: Length,
    wall_thickness: Length,
) -> EngineResult<Pressure> {
    let p = positive(internal_pressure.value, "internal pressure")?;
    let d = positive(inside_diameter.value, "inside diameter")?;
    let t = positive(wall_thickness.value, "wall thickness")?;
    Ok(pa(p * d / (2.0 * t)))
}

/// Inputs to the simplified Bartz correlation, SI throughout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BartzInputs {
    pub throat_diameter: f64,
    pub chamber_pressure: f64,
    pub characteristic_velocity: f64,
    /// Diameter of the station being evaluated
    pub local_diameter: f64,
    /// Gas specific heat, J/(kg·K)
    pub specific_heat: f64,
    /// Gas dynamic viscosity, Pa·s
    pub viscosity: f64,
    pub gas_temperature: f64,
    pub wall_temperature: f64,
}

impl BartzInputs {
    /// Throat, pressure, c* and gas temperature from a sized engine.
    pub fn from_performance(
        perf: &EnginePerformance,
        chamber_pressure: Pressure,
        local_diameter: Length,
        specific_heat: f64,
        viscosity: f64,
        wall_temperature: Temperature,
    ) -> Self {
        Self {
            throat_diameter: perf.throat_diameter.value,
            chamber_pressure: chamber_pressure.value,
            characteristic_velocity: perf.characteristic_velocity.value,
            local_diameter: local_diameter.value,
            specific_heat,
            viscosity,
            gas_temperature: perf.properties.chamber_temperature.value,
            wall_temperature: wall_temperature.value,
        }
    }
}

/// Gas-side film coefficient, W/(m²·K).
///
/// `h = 0.026/d_t^0.2 · (p_c/c*)^0.8 · (d_t/d)^1.8 · c_p · μ^0.2 · (T_g/T_bl)^0.68`
/// with the boundary-layer temperature taken as the mean of gas and wall.
pub fn bartz(inputs: &BartzInputs) -> EngineResult<f64> {
    let dt = positive(inputs.throat_diameter, "throat diameter")?;
    let pc = positive(inputs.chamber_pressure, "chamber pressure")?;
    let c_star = positive(inputs.characteristic_velocity, "characteristic velocity")?;
    let d = positive(inputs.local_diameter, "local diameter")?;
    let cp = positive(inputs.specific_heat, "specific heat")?;
    let visc = positive(inputs.viscosity, "viscosity")?;
    let t_gas = positive(inputs.gas_temperature, "gas temperature")?;
    let t_wall = positive(inputs.wall_temperature, "wall temperature")?;

    let t_boundary = 0.5 * (t_gas + t_wall);
    Ok(0.026 / dt.powf(0.2)
        * (pc / c_star).powf(0.8)
        * (dt / d).powf(1.8)
        * cp
        * visc.powf(0.2)
        * (t_gas / t_boundary).powf(0.8 - 0.2 * 0.6))
}
