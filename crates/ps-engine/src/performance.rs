//! Ideal-rocket performance and chamber sizing.

use crate::error::{EngineError, EngineResult, positive};
use crate::thermo::{ThermoOracle, ThermoProperties, ThermoQuery};
use ps_core::units::constants::{G0_MPS2, R_UNIVERSAL};
use ps_core::units::{Area, Force, Length, MassRate, Pressure, Time, Velocity, Volume, m, mps, s};
use serde::Serialize;
use std::f64::consts::PI;
use tracing::info;

/// Operating point and chamber geometry of one engine.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSpec {
    pub fuel: String,
    pub oxidizer: String,
    pub chamber_pressure: Pressure,
    /// Oxidizer-to-fuel mass ratio
    pub mixture_ratio: f64,
    pub mass_flow: MassRate,
    /// L*, chamber volume per unit throat area
    pub characteristic_length: Length,
    pub chamber_diameter: Length,
    /// Combustion efficiency in (0, 1]
    pub efficiency: f64,
}

impl EngineSpec {
    pub fn query(&self) -> ThermoQuery {
        ThermoQuery {
            fuel: self.fuel.clone(),
            oxidizer: self.oxidizer.clone(),
            chamber_pressure: self.chamber_pressure,
            mixture_ratio: self.mixture_ratio,
        }
    }

    pub fn validate(&self) -> EngineResult<()> {
        positive(self.chamber_pressure.value, "chamber pressure")?;
        positive(self.mixture_ratio, "mixture ratio")?;
        positive(self.mass_flow.value, "mass flow")?;
        positive(self.characteristic_length.value, "characteristic length")?;
        positive(self.chamber_diameter.value, "chamber diameter")?;
        if !(self.efficiency > 0.0 && self.efficiency <= 1.0) {
            return Err(EngineError::InvalidInput {
                what: "efficiency",
                value: self.efficiency,
            });
        }
        Ok(())
    }
}

fn area(v: f64) -> Area {
    use uom::si::area::square_meter;
    Area::new::<square_meter>(v)
}

fn volume(v: f64) -> Volume {
    use uom::si::volume::cubic_meter;
    Volume::new::<cubic_meter>(v)
}

fn newtons(v: f64) -> Force {
    use uom::si::force::newton;
    Force::new::<newton>(v)
}

fn diameter_of(area: f64) -> f64 {
    2.0 * (area / PI).sqrt()
}

/// Sized engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnginePerformance {
    pub properties: ThermoProperties,
    /// Specific gas constant, J/(kg·K)
    pub gas_constant: f64,
    pub throat_area: Area,
    pub exit_area: Area,
    pub throat_diameter: Length,
    pub exit_diameter: Length,
    pub thrust: Force,
    pub specific_impulse: Time,
    pub characteristic_velocity: Velocity,
    pub chamber_volume: Volume,
    pub chamber_diameter: Length,
    /// Cylindrical length holding the chamber volume
    pub chamber_length: Length,
    pub contraction_ratio: f64,
}

impl EnginePerformance {
    /// Query the oracle and size the engine.
    pub fn size(spec: &EngineSpec, oracle: &dyn ThermoOracle) -> EngineResult<Self> {
        spec.validate()?;
        let props = oracle.properties(&spec.query())?;
        Self::from_properties(spec, props)
    }

    /// Size the engine from already known gas properties.
    pub fn from_properties(spec: &EngineSpec, props: ThermoProperties) -> EngineResult<Self> {
        spec.validate()?;
        props.validate()?;

        let pc = spec.chamber_pressure.value;
        let mdot = spec.mass_flow.value;
        let gamma = props.gamma;
        let gas_constant = R_UNIVERSAL / props.molecular_weight;

        let exponent = (gamma + 1.0) / (2.0 * (gamma - 1.0));
        let throat_area = mdot / pc
            * (props.chamber_temperature.value * gas_constant / gamma).sqrt()
            * (1.0 + (gamma - 1.0) / 2.0).powf(exponent);
        let exit_area = throat_area * props.area_ratio;

        let c = props.exhaust_velocity.value;
        let thrust = spec.efficiency * mdot * c;
        let isp = spec.efficiency * c / G0_MPS2;
        let c_star = pc * throat_area / mdot;

        let chamber_volume = spec.characteristic_length.value * throat_area;
        let chamber_area = PI * (spec.chamber_diameter.value / 2.0).powi(2);
        let chamber_length = chamber_volume / chamber_area;

        info!(
            fuel = %spec.fuel,
            oxidizer = %spec.oxidizer,
            thrust_n = thrust,
            isp_s = isp,
            throat_area_m2 = throat_area,
            "engine sized"
        );

        Ok(Self {
            properties: props,
            gas_constant,
            throat_area: area(throat_area),
            exit_area: area(exit_area),
            throat_diameter: m(diameter_of(throat_area)),
            exit_diameter: m(diameter_of(exit_area)),
            thrust: newtons(thrust),
            specific_impulse: s(isp),
            characteristic_velocity: mps(c_star),
            chamber_volume: volume(chamber_volume),
            chamber_diameter: spec.chamber_diameter,
            chamber_length: m(chamber_length),
            contraction_ratio: chamber_area / throat_area,
        })
    }

    pub fn throat_radius(&self) -> f64 {
        self.throat_diameter.value / 2.0
    }

    pub fn exit_radius(&self) -> f64 {
        self.exit_diameter.value / 2.0
    }

    pub fn chamber_radius(&self) -> f64 {
        self.chamber_diameter.value / 2.0
    }
}
