//! Design file schema.
//!
//! Fields are plain `f64` values whose names carry their unit. Angles are
//! written in degrees; everything else is SI.

use serde::{Deserialize, Serialize};

pub const LATEST_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DesignFile {
    pub version: u32,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sizing: Option<SizingDef>,
    /// Directory (relative to the design file) of extra fluid CSV tables
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fluids_dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub injector: Option<StageDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bipropellant: Option<BipropellantDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub empirical: Option<EmpiricalDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine: Option<EngineDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine_sweep: Option<EngineSweepDef>,
    /// Sweeps the `injector` stage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub injector_sweep: Option<InjectorSweepDef>,
}

impl DesignFile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            version: LATEST_VERSION,
            name: name.into(),
            sizing: None,
            fluids_dir: None,
            injector: None,
            bipropellant: None,
            empirical: None,
            engine: None,
            engine_sweep: None,
            injector_sweep: None,
        }
    }
}

/// Overrides for the sizing constants; omitted fields keep their defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SizingDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inlet_radius_ratio: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub angle_tolerance_rad: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_iterations: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outer_radius_tolerance_m: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_reynolds: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inlet_loss: Option<InletLossDef>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InletLossDef {
    ChartFit,
    Fixed { coefficient: f64 },
}

/// One swirl stage. Exactly one of `density_kg_m3` and `fluid` is given.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StageDef {
    pub mass_flow_kg_s: f64,
    pub upstream_pressure_pa: f64,
    pub chamber_pressure_pa: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub density_kg_m3: Option<f64>,
    /// Fluid name or alias; density comes from the fluid table
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fluid: Option<String>,
    pub kinematic_viscosity_m2_s: f64,
    pub spray_half_angle_deg: f64,
    pub inlet_passages: u32,
    pub inlet_length_ratio: f64,
    pub nozzle_length_ratio: f64,
    pub chamber_length_ratio: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inlet_radius_ratio: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BipropellantDef {
    pub inner: StageDef,
    pub outer: StageDef,
    pub wall_thickness_m: f64,
    pub radial_gap_m: f64,
    pub residence_time_s: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmpiricalDef {
    pub mass_flow_kg_s: f64,
    pub upstream_pressure_pa: f64,
    pub chamber_pressure_pa: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub density_kg_m3: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fluid: Option<String>,
    pub kinematic_viscosity_m2_s: f64,
    pub spray_half_angle_deg: f64,
    pub nozzle_length_to_diameter: f64,
    pub geometric_parameter: f64,
    pub discharge_coefficient: f64,
    pub inlet_passages: u32,
    pub inlet_radius_ratio: f64,
    pub inlet_length_ratio: f64,
    pub chamber_length_ratio: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContourDef {
    pub chamber_fillet_radius_m: f64,
    pub upstream_throat_radius_m: f64,
    pub downstream_throat_radius_m: f64,
    #[serde(default = "default_convergence_angle")]
    pub convergence_angle_deg: f64,
    #[serde(default = "default_divergence_angle")]
    pub divergence_angle_deg: f64,
    /// Axial sampling step of the written contour
    #[serde(default = "default_contour_step")]
    pub step_m: f64,
}

fn default_convergence_angle() -> f64 {
    30.0
}

fn default_divergence_angle() -> f64 {
    15.0
}

fn default_contour_step() -> f64 {
    5e-3
}

fn default_efficiency() -> f64 {
    1.0
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngineDef {
    pub fuel: String,
    pub oxidizer: String,
    pub chamber_pressure_pa: f64,
    pub mixture_ratio: f64,
    pub mass_flow_kg_s: f64,
    pub characteristic_length_m: f64,
    pub chamber_diameter_m: f64,
    #[serde(default = "default_efficiency")]
    pub efficiency: f64,
    /// Chamber wall thickness for the hoop-stress estimate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wall_thickness_m: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contour: Option<ContourDef>,
}

/// A single value or a list of values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T: Clone> OneOrMany<T> {
    pub fn to_vec(&self) -> Vec<T> {
        match self {
            Self::One(v) => vec![v.clone()],
            Self::Many(vs) => vs.clone(),
        }
    }
}

impl<T> OneOrMany<T> {
    pub fn len(&self) -> usize {
        match self {
            Self::One(_) => 1,
            Self::Many(vs) => vs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        match self {
            Self::One(v) => std::slice::from_ref(v).iter(),
            Self::Many(vs) => vs.iter(),
        }
    }
}

fn default_efficiencies() -> OneOrMany<f64> {
    OneOrMany::One(1.0)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngineSweepDef {
    pub fuels: OneOrMany<String>,
    pub oxidizers: OneOrMany<String>,
    pub mixture_ratios: OneOrMany<f64>,
    pub chamber_pressures_pa: OneOrMany<f64>,
    pub mass_flows_kg_s: OneOrMany<f64>,
    #[serde(default = "default_efficiencies")]
    pub efficiencies: OneOrMany<f64>,
    pub characteristic_length_m: f64,
    pub chamber_diameter_m: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contour: Option<ContourDef>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SweepSpacingDef {
    Linear,
    Logarithmic,
}

fn default_spacing() -> SweepSpacingDef {
    SweepSpacingDef::Linear
}

/// Sweep of the `injector` stage.
///
/// `start` and `end` are degrees for `spray_half_angle` and pascals for
/// `pressure_drop`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InjectorSweepDef {
    pub parameter: ps_injector::InjectorSweepParameter,
    pub start: f64,
    pub end: f64,
    pub num_points: usize,
    #[serde(default = "default_spacing")]
    pub spacing: SweepSpacingDef,
}
