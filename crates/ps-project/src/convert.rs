//! Conversion from design-file sections to domain specs.

use crate::schema::{
    BipropellantDef, ContourDef, DesignFile, EmpiricalDef, EngineDef, EngineSweepDef,
    InjectorSweepDef, InletLossDef, SizingDef, StageDef, SweepSpacingDef,
};
use crate::{ProjectResult, ValidationError};
use ps_core::units::{deg, kg_per_m3, kgps, m, m2ps, pa, s};
use ps_core::{SweepDefinition, SweepType};
use ps_engine::{ContourSpec, EngineSpec, EngineSweep};
use ps_fluids::FluidTable;
use ps_injector::{
    BipropellantSpec, EmpiricalStageSpec, InjectorStageSpec, InjectorSweepParameter,
    InletLossModel, LengthRatios, SizingConfig,
};
use std::path::Path;
use tracing::debug;

fn missing(section: &str) -> ValidationError {
    ValidationError::MissingSection {
        section: section.to_string(),
    }
}

fn resolve_density(
    density: Option<f64>,
    fluid: Option<&str>,
    fluids: &FluidTable,
) -> ProjectResult<f64> {
    match (density, fluid) {
        (Some(rho), _) => Ok(rho),
        (None, Some(name)) => {
            let props = fluids.lookup(name)?;
            debug!(
                fluid = name,
                density = props.rho_liquid_kg_m3,
                "density from fluid table"
            );
            Ok(props.liquid_density().value)
        }
        (None, None) => Err(ValidationError::InvalidValue {
            field: "density_kg_m3".to_string(),
            value: "none".to_string(),
            reason: "one of density_kg_m3 or fluid is required".to_string(),
        }
        .into()),
    }
}

impl SizingDef {
    pub fn to_config(&self) -> SizingConfig {
        let defaults = SizingConfig::default();
        SizingConfig {
            inlet_radius_ratio: self.inlet_radius_ratio.unwrap_or(defaults.inlet_radius_ratio),
            angle_tolerance: self.angle_tolerance_rad.unwrap_or(defaults.angle_tolerance),
            max_iterations: self.max_iterations.unwrap_or(defaults.max_iterations),
            outer_radius_tolerance: self
                .outer_radius_tolerance_m
                .unwrap_or(defaults.outer_radius_tolerance),
            min_reynolds: self.min_reynolds.unwrap_or(defaults.min_reynolds),
            inlet_loss: match self.inlet_loss {
                Some(InletLossDef::Fixed { coefficient }) => InletLossModel::Fixed(coefficient),
                Some(InletLossDef::ChartFit) => InletLossModel::ChartFit,
                None => defaults.inlet_loss,
            },
            newton: defaults.newton,
        }
    }
}

impl StageDef {
    pub fn to_spec(&self, fluids: &FluidTable) -> ProjectResult<InjectorStageSpec> {
        let density = resolve_density(self.density_kg_m3, self.fluid.as_deref(), fluids)?;
        Ok(InjectorStageSpec {
            mass_flow: kgps(self.mass_flow_kg_s),
            upstream_pressure: pa(self.upstream_pressure_pa),
            chamber_pressure: pa(self.chamber_pressure_pa),
            density: kg_per_m3(density),
            kinematic_viscosity: m2ps(self.kinematic_viscosity_m2_s),
            spray_half_angle: deg(self.spray_half_angle_deg),
            inlet_passages: self.inlet_passages,
            length_ratios: LengthRatios::new(
                self.inlet_length_ratio,
                self.nozzle_length_ratio,
                self.chamber_length_ratio,
            ),
            inlet_radius_ratio: self.inlet_radius_ratio,
        })
    }
}

impl BipropellantDef {
    pub fn to_spec(&self, fluids: &FluidTable) -> ProjectResult<BipropellantSpec> {
        Ok(BipropellantSpec {
            inner: self.inner.to_spec(fluids)?,
            outer: self.outer.to_spec(fluids)?,
            wall_thickness: m(self.wall_thickness_m),
            radial_gap: m(self.radial_gap_m),
            residence_time: s(self.residence_time_s),
        })
    }
}

impl EmpiricalDef {
    pub fn to_spec(&self, fluids: &FluidTable) -> ProjectResult<EmpiricalStageSpec> {
        let density = resolve_density(self.density_kg_m3, self.fluid.as_deref(), fluids)?;
        Ok(EmpiricalStageSpec {
            mass_flow: kgps(self.mass_flow_kg_s),
            upstream_pressure: pa(self.upstream_pressure_pa),
            chamber_pressure: pa(self.chamber_pressure_pa),
            density: kg_per_m3(density),
            kinematic_viscosity: m2ps(self.kinematic_viscosity_m2_s),
            spray_half_angle: deg(self.spray_half_angle_deg),
            nozzle_length_to_diameter: self.nozzle_length_to_diameter,
            geometric_parameter: self.geometric_parameter,
            discharge_coefficient: self.discharge_coefficient,
            inlet_passages: self.inlet_passages,
            inlet_radius_ratio: self.inlet_radius_ratio,
            inlet_length_ratio: self.inlet_length_ratio,
            chamber_length_ratio: self.chamber_length_ratio,
        })
    }
}

impl ContourDef {
    pub fn to_spec(&self) -> ContourSpec {
        ContourSpec {
            chamber_fillet_radius: m(self.chamber_fillet_radius_m),
            upstream_throat_radius: m(self.upstream_throat_radius_m),
            downstream_throat_radius: m(self.downstream_throat_radius_m),
            convergence_angle: deg(self.convergence_angle_deg),
            divergence_angle: deg(self.divergence_angle_deg),
        }
    }
}

impl EngineDef {
    pub fn to_spec(&self) -> EngineSpec {
        EngineSpec {
            fuel: self.fuel.clone(),
            oxidizer: self.oxidizer.clone(),
            chamber_pressure: pa(self.chamber_pressure_pa),
            mixture_ratio: self.mixture_ratio,
            mass_flow: kgps(self.mass_flow_kg_s),
            characteristic_length: m(self.characteristic_length_m),
            chamber_diameter: m(self.chamber_diameter_m),
            efficiency: self.efficiency,
        }
    }
}

impl EngineSweepDef {
    pub fn to_sweep(&self) -> EngineSweep {
        EngineSweep {
            fuels: self.fuels.to_vec(),
            oxidizers: self.oxidizers.to_vec(),
            mixture_ratios: self.mixture_ratios.to_vec(),
            chamber_pressures: self.chamber_pressures_pa.to_vec(),
            mass_flows: self.mass_flows_kg_s.to_vec(),
            efficiencies: self.efficiencies.to_vec(),
            characteristic_length: m(self.characteristic_length_m),
            chamber_diameter: m(self.chamber_diameter_m),
            contour: self.contour.as_ref().map(ContourDef::to_spec),
        }
    }
}

impl InjectorSweepDef {
    /// Sweep points in SI (radians or pascals).
    pub fn to_sweep(&self) -> ProjectResult<(InjectorSweepParameter, SweepDefinition)> {
        let (start, end) = match self.parameter {
            InjectorSweepParameter::SprayHalfAngle => (deg(self.start).value, deg(self.end).value),
            InjectorSweepParameter::PressureDrop => (self.start, self.end),
        };
        let spacing = match self.spacing {
            SweepSpacingDef::Linear => SweepType::Linear,
            SweepSpacingDef::Logarithmic => SweepType::Logarithmic,
        };
        let sweep = SweepDefinition::new(start, end, self.num_points, spacing)?;
        Ok((self.parameter, sweep))
    }
}

impl DesignFile {
    pub fn sizing_config(&self) -> SizingConfig {
        self.sizing
            .as_ref()
            .map(SizingDef::to_config)
            .unwrap_or_default()
    }

    /// Built-in fluids plus any tables in `fluids_dir`, resolved against `base_dir`.
    pub fn fluid_table(&self, base_dir: &Path) -> ProjectResult<FluidTable> {
        match &self.fluids_dir {
            Some(dir) => Ok(FluidTable::from_csv_dir(&base_dir.join(dir))?),
            None => Ok(FluidTable::builtin()),
        }
    }

    pub fn injector_spec(&self, fluids: &FluidTable) -> ProjectResult<InjectorStageSpec> {
        self.injector
            .as_ref()
            .ok_or_else(|| missing("injector"))?
            .to_spec(fluids)
    }

    pub fn bipropellant_spec(&self, fluids: &FluidTable) -> ProjectResult<BipropellantSpec> {
        self.bipropellant
            .as_ref()
            .ok_or_else(|| missing("bipropellant"))?
            .to_spec(fluids)
    }

    pub fn empirical_spec(&self, fluids: &FluidTable) -> ProjectResult<EmpiricalStageSpec> {
        self.empirical
            .as_ref()
            .ok_or_else(|| missing("empirical"))?
            .to_spec(fluids)
    }

    pub fn engine_def(&self) -> ProjectResult<&EngineDef> {
        Ok(self.engine.as_ref().ok_or_else(|| missing("engine"))?)
    }

    pub fn engine_sweep(&self) -> ProjectResult<EngineSweep> {
        Ok(self
            .engine_sweep
            .as_ref()
            .ok_or_else(|| missing("engine_sweep"))?
            .to_sweep())
    }

    pub fn injector_sweep(&self) -> ProjectResult<(InjectorSweepParameter, SweepDefinition)> {
        self.injector_sweep
            .as_ref()
            .ok_or_else(|| missing("injector_sweep"))?
            .to_sweep()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ProjectError;
    use crate::validate::fixtures::{injector_design, water_stage_def};
    use ps_fluids::FluidError;

    #[test]
    fn stage_converts_to_si() {
        let spec = water_stage_def().to_spec(&FluidTable::builtin()).unwrap();
        assert!((spec.pressure_drop().value - 4e5).abs() < 1e-6);
        assert!((spec.spray_half_angle.value - 59.5f64.to_radians()).abs() < 1e-12);
        assert_eq!(spec.length_ratios, LengthRatios::new(4.5, 1.0, 3.0));
    }

    #[test]
    fn fluid_name_resolves_density() {
        let stage = StageDef {
            density_kg_m3: None,
            fluid: Some("H2O".into()),
            ..water_stage_def()
        };
        let spec = stage.to_spec(&FluidTable::builtin()).unwrap();
        assert!((spec.density.value - 997.0).abs() < 1e-9);
    }

    #[test]
    fn unknown_fluid_is_reported() {
        let stage = StageDef {
            density_kg_m3: None,
            fluid: Some("unobtainium".into()),
            ..water_stage_def()
        };
        let err = stage.to_spec(&FluidTable::builtin()).unwrap_err();
        assert!(matches!(
            err,
            ProjectError::Fluid(FluidError::UnknownFluid { .. })
        ));
    }

    #[test]
    fn partial_sizing_keeps_defaults() {
        let sizing = SizingDef {
            inlet_loss: Some(InletLossDef::Fixed { coefficient: 0.1 }),
            ..SizingDef::default()
        };
        let cfg = sizing.to_config();
        assert_eq!(cfg.inlet_loss, InletLossModel::Fixed(0.1));
        assert_eq!(cfg.inlet_radius_ratio, 1.25);
        assert_eq!(cfg.max_iterations, 100);
        assert_eq!(injector_design().sizing_config(), SizingConfig::default());
    }

    #[test]
    fn angle_sweep_is_converted_to_radians() {
        let def = InjectorSweepDef {
            parameter: InjectorSweepParameter::SprayHalfAngle,
            start: 40.0,
            end: 70.0,
            num_points: 4,
            spacing: SweepSpacingDef::Linear,
        };
        let (param, sweep) = def.to_sweep().unwrap();
        assert_eq!(param, InjectorSweepParameter::SprayHalfAngle);
        let points = sweep.generate_points();
        assert!((points[0] - 40f64.to_radians()).abs() < 1e-12);
        assert!((points[3] - 70f64.to_radians()).abs() < 1e-12);
    }

    #[test]
    fn missing_section_is_reported() {
        let err = injector_design()
            .bipropellant_spec(&FluidTable::builtin())
            .unwrap_err();
        assert!(matches!(
            err,
            ProjectError::Validation(ValidationError::MissingSection { .. })
        ));
    }
}
