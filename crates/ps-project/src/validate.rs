//! Design file validation.

use crate::schema::{
    BipropellantDef, ContourDef, DesignFile, EmpiricalDef, EngineDef, EngineSweepDef,
    InjectorSweepDef, InletLossDef, LATEST_VERSION, SizingDef, StageDef,
};
use ps_core::{ensure_open_interval, ensure_positive};
use ps_injector::InjectorSweepParameter;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing section: {section}")]
    MissingSection { section: String },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

type Checked = Result<(), ValidationError>;

fn invalid(field: &str, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn positive(field: &str, value: f64) -> Checked {
    ensure_positive(value, "design value")
        .map(|_| ())
        .map_err(|_| invalid(field, value, "must be positive and finite"))
}

fn angle_deg(field: &str, value: f64) -> Checked {
    ensure_open_interval(value, 0.0, 90.0, "angle")
        .map(|_| ())
        .map_err(|_| invalid(field, value, "must lie strictly between 0 and 90 degrees"))
}

fn fraction(field: &str, value: f64) -> Checked {
    ensure_open_interval(value, 0.0, 1.0, "fraction")
        .map(|_| ())
        .map_err(|_| invalid(field, value, "must lie strictly between 0 and 1"))
}

fn density_source(ctx: &str, density: Option<f64>, fluid: Option<&str>) -> Checked {
    match (density, fluid) {
        (Some(rho), None) => positive(&format!("{ctx}.density_kg_m3"), rho),
        (None, Some(name)) if !name.trim().is_empty() => Ok(()),
        (None, Some(name)) => Err(invalid(&format!("{ctx}.fluid"), name, "must not be empty")),
        (Some(rho), Some(_)) => Err(invalid(
            &format!("{ctx}.density_kg_m3"),
            rho,
            "give either density_kg_m3 or fluid, not both",
        )),
        (None, None) => Err(invalid(
            &format!("{ctx}.density_kg_m3"),
            "none",
            "one of density_kg_m3 or fluid is required",
        )),
    }
}

fn pressures(ctx: &str, upstream: f64, chamber: f64) -> Checked {
    positive(&format!("{ctx}.upstream_pressure_pa"), upstream)?;
    positive(&format!("{ctx}.chamber_pressure_pa"), chamber)?;
    if upstream <= chamber {
        return Err(invalid(
            &format!("{ctx}.upstream_pressure_pa"),
            upstream,
            "must exceed chamber_pressure_pa",
        ));
    }
    Ok(())
}

fn passages(ctx: &str, n: u32) -> Checked {
    if n == 0 {
        return Err(invalid(&format!("{ctx}.inlet_passages"), n, "must be at least 1"));
    }
    Ok(())
}

pub fn validate_design(design: &DesignFile) -> Checked {
    if design.version == 0 || design.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: design.version,
        });
    }
    if design.name.trim().is_empty() {
        return Err(invalid("name", "\"\"", "must not be empty"));
    }

    let has_section = design.injector.is_some()
        || design.bipropellant.is_some()
        || design.empirical.is_some()
        || design.engine.is_some()
        || design.engine_sweep.is_some();
    if !has_section {
        return Err(ValidationError::MissingSection {
            section: "injector, bipropellant, empirical, engine or engine_sweep".to_string(),
        });
    }

    if let Some(sizing) = &design.sizing {
        validate_sizing(sizing)?;
    }
    if let Some(stage) = &design.injector {
        validate_stage("injector", stage)?;
    }
    if let Some(biprop) = &design.bipropellant {
        validate_bipropellant(biprop)?;
    }
    if let Some(emp) = &design.empirical {
        validate_empirical(emp)?;
    }
    if let Some(engine) = &design.engine {
        validate_engine(engine)?;
    }
    if let Some(sweep) = &design.engine_sweep {
        validate_engine_sweep(sweep)?;
    }
    if let Some(sweep) = &design.injector_sweep {
        if design.injector.is_none() {
            return Err(ValidationError::MissingSection {
                section: "injector".to_string(),
            });
        }
        validate_injector_sweep(sweep)?;
    }
    Ok(())
}

fn validate_sizing(sizing: &SizingDef) -> Checked {
    if let Some(v) = sizing.inlet_radius_ratio {
        positive("sizing.inlet_radius_ratio", v)?;
    }
    if let Some(v) = sizing.angle_tolerance_rad {
        positive("sizing.angle_tolerance_rad", v)?;
    }
    if let Some(v) = sizing.outer_radius_tolerance_m {
        positive("sizing.outer_radius_tolerance_m", v)?;
    }
    if sizing.max_iterations == Some(0) {
        return Err(invalid("sizing.max_iterations", 0, "must be at least 1"));
    }
    if let Some(v) = sizing.min_reynolds
        && !(v.is_finite() && v >= 0.0)
    {
        return Err(invalid("sizing.min_reynolds", v, "must be non-negative and finite"));
    }
    if let Some(InletLossDef::Fixed { coefficient }) = sizing.inlet_loss
        && !(coefficient.is_finite() && coefficient >= 0.0)
    {
        return Err(invalid(
            "sizing.inlet_loss.coefficient",
            coefficient,
            "must be non-negative and finite",
        ));
    }
    Ok(())
}

pub(crate) fn validate_stage(ctx: &str, stage: &StageDef) -> Checked {
    positive(&format!("{ctx}.mass_flow_kg_s"), stage.mass_flow_kg_s)?;
    pressures(ctx, stage.upstream_pressure_pa, stage.chamber_pressure_pa)?;
    density_source(ctx, stage.density_kg_m3, stage.fluid.as_deref())?;
    positive(
        &format!("{ctx}.kinematic_viscosity_m2_s"),
        stage.kinematic_viscosity_m2_s,
    )?;
    angle_deg(&format!("{ctx}.spray_half_angle_deg"), stage.spray_half_angle_deg)?;
    passages(ctx, stage.inlet_passages)?;
    positive(&format!("{ctx}.inlet_length_ratio"), stage.inlet_length_ratio)?;
    positive(&format!("{ctx}.nozzle_length_ratio"), stage.nozzle_length_ratio)?;
    positive(&format!("{ctx}.chamber_length_ratio"), stage.chamber_length_ratio)?;
    if let Some(r) = stage.inlet_radius_ratio {
        positive(&format!("{ctx}.inlet_radius_ratio"), r)?;
    }
    Ok(())
}

fn validate_bipropellant(biprop: &BipropellantDef) -> Checked {
    validate_stage("bipropellant.inner", &biprop.inner)?;
    validate_stage("bipropellant.outer", &biprop.outer)?;
    if !(biprop.wall_thickness_m.is_finite() && biprop.wall_thickness_m >= 0.0) {
        return Err(invalid(
            "bipropellant.wall_thickness_m",
            biprop.wall_thickness_m,
            "must be non-negative and finite",
        ));
    }
    if !(biprop.radial_gap_m.is_finite() && biprop.radial_gap_m >= 0.0) {
        return Err(invalid(
            "bipropellant.radial_gap_m",
            biprop.radial_gap_m,
            "must be non-negative and finite",
        ));
    }
    positive("bipropellant.residence_time_s", biprop.residence_time_s)
}

fn validate_empirical(emp: &EmpiricalDef) -> Checked {
    let ctx = "empirical";
    positive("empirical.mass_flow_kg_s", emp.mass_flow_kg_s)?;
    pressures(ctx, emp.upstream_pressure_pa, emp.chamber_pressure_pa)?;
    density_source(ctx, emp.density_kg_m3, emp.fluid.as_deref())?;
    positive(
        "empirical.kinematic_viscosity_m2_s",
        emp.kinematic_viscosity_m2_s,
    )?;
    angle_deg("empirical.spray_half_angle_deg", emp.spray_half_angle_deg)?;
    positive(
        "empirical.nozzle_length_to_diameter",
        emp.nozzle_length_to_diameter,
    )?;
    positive("empirical.geometric_parameter", emp.geometric_parameter)?;
    fraction("empirical.discharge_coefficient", emp.discharge_coefficient)?;
    passages(ctx, emp.inlet_passages)?;
    positive("empirical.inlet_radius_ratio", emp.inlet_radius_ratio)?;
    positive("empirical.inlet_length_ratio", emp.inlet_length_ratio)?;
    positive("empirical.chamber_length_ratio", emp.chamber_length_ratio)
}

fn validate_contour(ctx: &str, contour: &ContourDef) -> Checked {
    positive(&format!("{ctx}.chamber_fillet_radius_m"), contour.chamber_fillet_radius_m)?;
    positive(&format!("{ctx}.upstream_throat_radius_m"), contour.upstream_throat_radius_m)?;
    positive(
        &format!("{ctx}.downstream_throat_radius_m"),
        contour.downstream_throat_radius_m,
    )?;
    angle_deg(&format!("{ctx}.convergence_angle_deg"), contour.convergence_angle_deg)?;
    angle_deg(&format!("{ctx}.divergence_angle_deg"), contour.divergence_angle_deg)?;
    positive(&format!("{ctx}.step_m"), contour.step_m)
}

fn efficiency(field: &str, eta: f64) -> Checked {
    if eta > 0.0 && eta <= 1.0 {
        Ok(())
    } else {
        Err(invalid(field, eta, "must lie in (0, 1]"))
    }
}

fn validate_engine(engine: &EngineDef) -> Checked {
    if engine.fuel.trim().is_empty() {
        return Err(invalid("engine.fuel", "\"\"", "must not be empty"));
    }
    if engine.oxidizer.trim().is_empty() {
        return Err(invalid("engine.oxidizer", "\"\"", "must not be empty"));
    }
    positive("engine.chamber_pressure_pa", engine.chamber_pressure_pa)?;
    positive("engine.mixture_ratio", engine.mixture_ratio)?;
    positive("engine.mass_flow_kg_s", engine.mass_flow_kg_s)?;
    positive(
        "engine.characteristic_length_m",
        engine.characteristic_length_m,
    )?;
    positive("engine.chamber_diameter_m", engine.chamber_diameter_m)?;
    efficiency("engine.efficiency", engine.efficiency)?;
    if let Some(t) = engine.wall_thickness_m {
        positive("engine.wall_thickness_m", t)?;
    }
    if let Some(contour) = &engine.contour {
        validate_contour("engine.contour", contour)?;
    }
    Ok(())
}

fn validate_engine_sweep(sweep: &EngineSweepDef) -> Checked {
    let lists = [
        ("engine_sweep.fuels", sweep.fuels.len()),
        ("engine_sweep.oxidizers", sweep.oxidizers.len()),
        ("engine_sweep.mixture_ratios", sweep.mixture_ratios.len()),
        ("engine_sweep.chamber_pressures_pa", sweep.chamber_pressures_pa.len()),
        ("engine_sweep.mass_flows_kg_s", sweep.mass_flows_kg_s.len()),
        ("engine_sweep.efficiencies", sweep.efficiencies.len()),
    ];
    for (field, len) in lists {
        if len == 0 {
            return Err(invalid(field, "[]", "must list at least one value"));
        }
    }
    for &v in sweep.mixture_ratios.iter() {
        positive("engine_sweep.mixture_ratios", v)?;
    }
    for &v in sweep.chamber_pressures_pa.iter() {
        positive("engine_sweep.chamber_pressures_pa", v)?;
    }
    for &v in sweep.mass_flows_kg_s.iter() {
        positive("engine_sweep.mass_flows_kg_s", v)?;
    }
    for &v in sweep.efficiencies.iter() {
        efficiency("engine_sweep.efficiencies", v)?;
    }
    positive(
        "engine_sweep.characteristic_length_m",
        sweep.characteristic_length_m,
    )?;
    positive("engine_sweep.chamber_diameter_m", sweep.chamber_diameter_m)?;
    if let Some(contour) = &sweep.contour {
        validate_contour("engine_sweep.contour", contour)?;
    }
    Ok(())
}

fn validate_injector_sweep(sweep: &InjectorSweepDef) -> Checked {
    if sweep.num_points < 2 {
        return Err(invalid(
            "injector_sweep.num_points",
            sweep.num_points,
            "must be at least 2",
        ));
    }
    match sweep.parameter {
        InjectorSweepParameter::SprayHalfAngle => {
            angle_deg("injector_sweep.start", sweep.start)?;
            angle_deg("injector_sweep.end", sweep.end)?;
        }
        InjectorSweepParameter::PressureDrop => {
            positive("injector_sweep.start", sweep.start)?;
            positive("injector_sweep.end", sweep.end)?;
        }
    }
    if sweep.start == sweep.end {
        return Err(invalid("injector_sweep.end", sweep.end, "must differ from start"));
    }
    Ok(())
}
