//! Two nested swirl elements: an inner stage sized with the hydraulic-loss
//! loop and an outer stage whose nozzle must clear the inner nozzle wall.

use crate::config::SizingConfig;
use crate::error::{DesignRuleViolation, InjectorError, InjectorResult, StageRole, positive};
use crate::geometry::{GeometricSolution, a_from_phi, phi_from_mu, solve_geometry};
use crate::hydraulic::{StageSolution, check_reynolds, size_stage_as};
use crate::sizing::{SizedGeometry, friction_factor, inlet_reynolds};
use crate::spec::InjectorStageSpec;
use ps_core::ensure_open_interval;
use ps_core::units::{Angle, Length, Time, deg, m, rad};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Empirical reduction applied to the outer stage's nominal spray half-angle.
const OUTER_ANGLE_REDUCTION_DEG: f64 = 17.5;

/// Inputs for a bipropellant element.
#[derive(Debug, Clone, PartialEq)]
pub struct BipropellantSpec {
    pub inner: InjectorStageSpec,
    pub outer: InjectorStageSpec,
    /// Wall thickness of the inner nozzle, δw
    pub wall_thickness: Length,
    /// Radial clearance between the inner nozzle wall and the outer gas core, Δr
    pub radial_gap: Length,
    /// Propellant residence time before mixing, τ
    pub residence_time: Time,
}

/// One pass of the outer-stage coupling loop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OuterIterationSnapshot {
    pub iteration: usize,
    pub nozzle_radius: f64,
    pub mu: f64,
    pub phi: f64,
    pub change: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OuterStageSolution {
    pub geometry: GeometricSolution,
    pub sized: SizedGeometry,
    pub reynolds: f64,
    pub friction_factor: f64,
    /// Gas-core radius at the outer nozzle exit, r_mn2 = √(1−φ2)·R_n2
    pub gas_core_radius: Length,
    /// Nominal half-angle reduced by the empirical 17.5°
    pub reduced_spray_half_angle: Angle,
    pub iterations: usize,
    pub trace: Vec<OuterIterationSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BipropellantSolution {
    pub inner: StageSolution,
    pub outer: OuterStageSolution,
    /// k_m = ṁ2 / ṁ1
    pub mass_ratio: f64,
    pub mixing_length: Length,
    /// Axial offset from the inner nozzle exit to where its spray meets the outer gas core
    pub nozzle_extension: Length,
    /// Outer nozzle length l_mix + Δl_n
    pub outer_nozzle_length: Length,
    /// Violations from both stages
    pub violations: Vec<DesignRuleViolation>,
}

impl BipropellantSolution {
    pub fn ensure_design_rules(&self) -> InjectorResult<()> {
        match self.violations.first() {
            Some(v) => Err(InjectorError::DesignRuleViolation(v.clone())),
            None => Ok(()),
        }
    }
}

/// Mixing length
/// `l_mix = √2·τ·(k_m·μ2/((k_m+1)·φ2)·√(Δp2/ρ2) + μ1/((k_m+1)·φ1)·√(Δp1/ρ1))`.
#[allow(clippy::too_many_arguments)]
pub fn mixing_length(
    mass_ratio: f64,
    inner: &GeometricSolution,
    outer: &GeometricSolution,
    inner_density: f64,
    outer_density: f64,
    inner_pressure_drop: f64,
    outer_pressure_drop: f64,
    residence_time: f64,
) -> f64 {
    let k = mass_ratio;
    std::f64::consts::SQRT_2
        * residence_time
        * (k * outer.mu / ((k + 1.0) * outer.phi) * (outer_pressure_drop / outer_density).sqrt()
            + inner.mu / ((k + 1.0) * inner.phi) * (inner_pressure_drop / inner_density).sqrt())
}

/// Size a bipropellant swirl element.
pub fn size_bipropellant(
    spec: &BipropellantSpec,
    config: &SizingConfig,
) -> InjectorResult<BipropellantSolution> {
    config.validate()?;
    let outer_in = spec.outer.inputs(config.inlet_radius_ratio)?;
    let inner_in = spec.inner.inputs(config.inlet_radius_ratio)?;
    let wall = positive(spec.wall_thickness.value, "wall thickness")?;
    let gap = positive(spec.radial_gap.value, "radial gap")?;
    let tau = positive(spec.residence_time.value, "residence time")?;

    let inner = size_stage_as(StageRole::Inner, &spec.inner, config)?;
    let r_n1 = inner.sized.nozzle_radius.value;

    // Outer nozzle radius from the inner wall clearance, with φ2 from the
    // discharge coefficient that radius implies.
    let mut phi = solve_geometry(outer_in.alpha, &config.newton)?.phi;
    let mut mu;
    let mut r_n2 = 0.0;
    let mut trace = Vec::new();
    loop {
        if trace.len() >= config.max_iterations {
            warn!(
                iterations = trace.len(),
                "outer stage coupling did not converge"
            );
            return Err(InjectorError::NonConvergence {
                stage: StageRole::Outer,
                iterations: trace.len(),
                last_change: trace
                    .last()
                    .map_or(f64::INFINITY, |s: &OuterIterationSnapshot| s.change),
            });
        }
        let previous = r_n2;
        r_n2 = (r_n1 + wall + gap) / (1.0 - phi).sqrt();
        mu = outer_in.mass_flow / r_n2.powi(2) / (outer_in.density * outer_in.pressure_drop).sqrt();
        if ensure_open_interval(mu, 0.0, 1.0, "discharge coefficient").is_err() {
            warn!(
                mu,
                nozzle_radius = r_n2,
                "outer stage discharge coefficient out of range"
            );
            return Err(InjectorError::NoPhysicalSolution {
                alpha_rad: outer_in.alpha,
                reason: format!(
                    "outer stage discharge coefficient {mu:.4} at nozzle radius {r_n2:.4e} m \
                     is not below 1"
                ),
            });
        }
        phi = phi_from_mu(mu, &config.newton)?;
        let change = (r_n2 - previous).abs();
        let snapshot = OuterIterationSnapshot {
            iteration: trace.len() + 1,
            nozzle_radius: r_n2,
            mu,
            phi,
            change,
        };
        debug!(
            iteration = snapshot.iteration,
            nozzle_radius = r_n2,
            mu,
            phi,
            change,
            "outer stage iteration"
        );
        trace.push(snapshot);
        if change < config.outer_radius_tolerance {
            break;
        }
    }

    let gas_core_radius = (1.0 - phi).sqrt() * r_n2;
    let outer_geometry = GeometricSolution {
        a: a_from_phi(phi),
        phi,
        mu,
    };
    let sized = SizedGeometry::from_nozzle(
        r_n2,
        outer_geometry.a,
        outer_in.passages,
        outer_in.inlet_radius_ratio,
        &outer_in.ratios,
    );
    let reynolds = inlet_reynolds(
        outer_in.mass_flow,
        outer_in.passages,
        sized.inlet_passage_radius.value,
        outer_in.density,
        outer_in.viscosity,
    );

    let mut violations = inner.violations.clone();
    check_reynolds(StageRole::Outer, reynolds, config, &mut violations);

    let mass_ratio = outer_in.mass_flow / inner_in.mass_flow;
    let l_mix = mixing_length(
        mass_ratio,
        &inner.geometry,
        &outer_geometry,
        inner_in.density,
        outer_in.density,
        inner_in.pressure_drop,
        outer_in.pressure_drop,
        tau,
    );
    let extension = (gas_core_radius - r_n1) / inner.spray_half_angle.value.tan();

    info!(
        outer_iterations = trace.len(),
        outer_nozzle_radius = r_n2,
        mixing_length = l_mix,
        "bipropellant element sized"
    );

    let outer = OuterStageSolution {
        geometry: outer_geometry,
        sized,
        reynolds,
        friction_factor: friction_factor(reynolds),
        gas_core_radius: m(gas_core_radius),
        reduced_spray_half_angle: rad(outer_in.alpha) - deg(OUTER_ANGLE_REDUCTION_DEG),
        iterations: trace.len(),
        trace,
    };

    Ok(BipropellantSolution {
        inner,
        outer,
        mass_ratio,
        mixing_length: m(l_mix),
        nozzle_extension: m(extension),
        outer_nozzle_length: m(l_mix + extension),
        violations,
    })
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::spec::LengthRatios;
    use ps_core::units::{deg, kg_per_m3, kgps, m2ps, pa, s};

    pub fn stage(mass_flow: f64, viscosity: f64) -> InjectorStageSpec {
        InjectorStageSpec {
            mass_flow: kgps(mass_flow),
            upstream_pressure: pa(2.4e6),
            chamber_pressure: pa(2.0e6),
            density: kg_per_m3(997.0),
            kinematic_viscosity: m2ps(viscosity),
            spray_half_angle: deg(60.0),
            inlet_passages: 6,
            length_ratios: LengthRatios::new(4.5, 1.0, 3.0),
            inlet_radius_ratio: None,
        }
    }

    pub fn water_pair(outer_viscosity: f64) -> BipropellantSpec {
        BipropellantSpec {
            inner: stage(0.025, 1e-6),
            outer: stage(0.7 / 12.0, outer_viscosity),
            wall_thickness: m(0.0008),
            radial_gap: m(0.0003),
            residence_time: s(0.2e-3),
        }
    }
}
