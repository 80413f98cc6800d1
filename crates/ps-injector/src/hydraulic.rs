//! Hydraulic-loss correction loop for a single swirl element.
//!
//! Starting from the ideal geometry for the requested spray half-angle, each
//! pass sizes the element, estimates friction and inlet losses, corrects the
//! discharge coefficient and re-derives the geometry. The loop stops once the
//! spray half-angle changes by less than `SizingConfig::angle_tolerance`.

use crate::config::SizingConfig;
use crate::error::{DesignRuleViolation, InjectorError, InjectorResult, StageRole};
use crate::geometry::{
    GeometricSolution, alpha_from_phi, mu_from_phi, phi_from_a, solve_geometry,
};
use crate::sizing::{
    SizedGeometry, equivalent_characteristic, friction_factor, geometric_characteristic,
    inlet_reynolds, nozzle_radius,
};
use crate::spec::{InjectorStageSpec, StageInputs};
use ps_core::units::{Angle, rad};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Where the loop is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LoopPhase {
    Initializing,
    Iterating,
    Converged,
    Failed,
}

/// Stopping-test bookkeeping, reported on the converged solution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConvergenceState {
    pub phase: LoopPhase,
    /// Current spray half-angle estimate, rad
    pub alpha: f64,
    pub previous_alpha: Option<f64>,
    pub iteration: usize,
}

impl ConvergenceState {
    fn new(alpha: f64) -> Self {
        Self {
            phase: LoopPhase::Initializing,
            alpha,
            previous_alpha: None,
            iteration: 0,
        }
    }

    fn advance(&mut self, alpha: f64) {
        self.previous_alpha = Some(self.alpha);
        self.alpha = alpha;
        self.iteration += 1;
    }

    /// |α − α_prev|, infinite before the first pass.
    pub fn change(&self) -> f64 {
        self.previous_alpha
            .map_or(f64::INFINITY, |prev| (self.alpha - prev).abs())
    }

    pub fn is_converged(&self) -> bool {
        self.phase == LoopPhase::Converged
    }

    /// Move to `Failed` and describe the failure.
    fn fail(&mut self, stage: StageRole) -> InjectorError {
        self.phase = LoopPhase::Failed;
        InjectorError::NonConvergence {
            stage,
            iterations: self.iteration,
            last_change: self.change(),
        }
    }
}

/// The quantities carried from one pass to the next.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LoopState {
    pub geometry: GeometricSolution,
    /// Spray half-angle, rad
    pub alpha: f64,
    /// Nozzle radius, m
    pub nozzle_radius: f64,
}

/// Everything computed during one pass, in SI units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IterationSnapshot {
    pub iteration: usize,
    /// Geometry the pass was evaluated on
    pub sized: SizedGeometry,
    pub reynolds: f64,
    pub friction_factor: f64,
    pub equivalent: GeometricSolution,
    pub equivalent_alpha: f64,
    pub inlet_loss_coefficient: f64,
    pub loss_coefficient: f64,
    /// Loss-corrected discharge coefficient
    pub corrected_mu: f64,
    /// State handed to the next pass
    pub next: LoopState,
    pub alpha_change: f64,
}

/// Converged single-element design.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageSolution {
    pub geometry: GeometricSolution,
    pub spray_half_angle: Angle,
    /// Total loss coefficient ε of the last pass
    pub loss_coefficient: f64,
    /// Inlet Reynolds number of the final geometry
    pub reynolds: f64,
    pub friction_factor: f64,
    pub sized: SizedGeometry,
    pub iterations: usize,
    /// Final state of the stopping test
    pub convergence: ConvergenceState,
    pub trace: Vec<IterationSnapshot>,
    pub violations: Vec<DesignRuleViolation>,
}

impl StageSolution {
    /// State from which another pass can be run.
    pub fn loop_state(&self) -> LoopState {
        LoopState {
            geometry: self.geometry,
            alpha: self.spray_half_angle.value,
            nozzle_radius: self.sized.nozzle_radius.value,
        }
    }

    /// Promote the first recorded violation to an error.
    pub fn ensure_design_rules(&self) -> InjectorResult<()> {
        match self.violations.first() {
            Some(v) => Err(InjectorError::DesignRuleViolation(v.clone())),
            None => Ok(()),
        }
    }
}

/// Initial state: ideal geometry for the nominal angle and its nozzle radius.
pub fn initial_state(spec: &InjectorStageSpec, config: &SizingConfig) -> InjectorResult<LoopState> {
    let inputs = spec.inputs(config.inlet_radius_ratio)?;
    initial_from_inputs(&inputs, config)
}

fn initial_from_inputs(inputs: &StageInputs, config: &SizingConfig) -> InjectorResult<LoopState> {
    let geometry = solve_geometry(inputs.alpha, &config.newton)?;
    let r_n = nozzle_radius(
        inputs.mass_flow,
        geometry.mu,
        inputs.density,
        inputs.pressure_drop,
    )?;
    Ok(LoopState {
        geometry,
        alpha: inputs.alpha,
        nozzle_radius: r_n,
    })
}

/// Run one correction pass from `state`.
pub fn hydraulic_step(
    spec: &InjectorStageSpec,
    state: &LoopState,
    config: &SizingConfig,
) -> InjectorResult<IterationSnapshot> {
    let inputs = spec.inputs(config.inlet_radius_ratio)?;
    step(&inputs, state, config, 0)
}

fn step(
    inputs: &StageInputs,
    state: &LoopState,
    config: &SizingConfig,
    iteration: usize,
) -> InjectorResult<IterationSnapshot> {
    let r_n = state.nozzle_radius;
    let a = state.geometry.a;
    let sized = SizedGeometry::from_nozzle(
        r_n,
        a,
        inputs.passages,
        inputs.inlet_radius_ratio,
        &inputs.ratios,
    );
    if !sized.is_physical() {
        return Err(InjectorError::NoPhysicalSolution {
            alpha_rad: state.alpha,
            reason: format!("non-physical geometry at iteration {iteration}"),
        });
    }
    let arm = sized.inlet_arm_radius.value;
    let r_in = sized.inlet_passage_radius.value;
    let l_in = sized.inlet_passage_length.value;

    let reynolds = inlet_reynolds(
        inputs.mass_flow,
        inputs.passages,
        r_in,
        inputs.density,
        inputs.viscosity,
    );
    let lambda = friction_factor(reynolds);

    let a_eq = equivalent_characteristic(arm, r_n, inputs.passages, r_in, lambda);
    let phi_eq = phi_from_a(a_eq, &config.newton)?;
    let mu_eq = mu_from_phi(phi_eq);
    let equivalent_alpha = alpha_from_phi(phi_eq);

    let eps_in = config
        .inlet_loss
        .coefficient(sized.vortex_chamber_radius.value, l_in);
    let eps = eps_in + lambda * l_in / (2.0 * r_in);
    let ratio = arm / r_n;
    let corrected_mu = mu_eq / (1.0 + eps * mu_eq.powi(2) * a.powi(2) / ratio.powi(2)).sqrt();

    let next_r_n = nozzle_radius(
        inputs.mass_flow,
        corrected_mu,
        inputs.density,
        inputs.pressure_drop,
    )?;
    let next_a = geometric_characteristic(arm, next_r_n, inputs.passages, r_in);
    let next_phi = phi_from_a(next_a, &config.newton)?;
    let next_alpha = alpha_from_phi(next_phi);
    let next = LoopState {
        geometry: GeometricSolution {
            a: next_a,
            phi: next_phi,
            mu: mu_from_phi(next_phi),
        },
        alpha: next_alpha,
        nozzle_radius: next_r_n,
    };

    Ok(IterationSnapshot {
        iteration,
        sized,
        reynolds,
        friction_factor: lambda,
        equivalent: GeometricSolution {
            a: a_eq,
            phi: phi_eq,
            mu: mu_eq,
        },
        equivalent_alpha,
        inlet_loss_coefficient: eps_in,
        loss_coefficient: eps,
        corrected_mu,
        next,
        alpha_change: (next_alpha - state.alpha).abs(),
    })
}

/// Record a violation when the inlet flow is not turbulent enough.
pub(crate) fn check_reynolds(
    stage: StageRole,
    reynolds: f64,
    config: &SizingConfig,
    violations: &mut Vec<DesignRuleViolation>,
) {
    if reynolds < config.min_reynolds {
        warn!(
            %stage,
            reynolds,
            minimum = config.min_reynolds,
            "inlet Reynolds number below turbulent limit"
        );
        violations.push(DesignRuleViolation::InletReynoldsTooLow {
            stage,
            reynolds,
            minimum: config.min_reynolds,
        });
    }
}

/// Size a single swirl element with hydraulic-loss correction.
pub fn size_stage(
    spec: &InjectorStageSpec,
    config: &SizingConfig,
) -> InjectorResult<StageSolution> {
    size_stage_as(StageRole::Single, spec, config)
}

pub(crate) fn size_stage_as(
    role: StageRole,
    spec: &InjectorStageSpec,
    config: &SizingConfig,
) -> InjectorResult<StageSolution> {
    config.validate()?;
    let inputs = spec.inputs(config.inlet_radius_ratio)?;

    let mut convergence = ConvergenceState::new(inputs.alpha);
    let mut state = initial_from_inputs(&inputs, config)?;
    debug!(
        %role,
        a = state.geometry.a,
        phi = state.geometry.phi,
        mu = state.geometry.mu,
        nozzle_radius = state.nozzle_radius,
        "initial geometry"
    );

    convergence.phase = LoopPhase::Iterating;
    let mut trace = Vec::new();
    while convergence.change() >= config.angle_tolerance {
        if convergence.iteration >= config.max_iterations {
            let err = convergence.fail(role);
            warn!(%role, ?convergence, "hydraulic loop did not converge");
            return Err(err);
        }
        let snapshot = step(&inputs, &state, config, convergence.iteration + 1)?;
        state = snapshot.next;
        convergence.advance(state.alpha);
        debug!(
            %role,
            iteration = convergence.iteration,
            alpha = state.alpha,
            nozzle_radius = state.nozzle_radius,
            reynolds = snapshot.reynolds,
            eps = snapshot.loss_coefficient,
            change = snapshot.alpha_change,
            "hydraulic iteration"
        );
        trace.push(snapshot);
    }
    convergence.phase = LoopPhase::Converged;

    // Final layout from the converged nozzle radius and characteristic
    let sized = SizedGeometry::from_nozzle(
        state.nozzle_radius,
        state.geometry.a,
        inputs.passages,
        inputs.inlet_radius_ratio,
        &inputs.ratios,
    );
    let reynolds = inlet_reynolds(
        inputs.mass_flow,
        inputs.passages,
        sized.inlet_passage_radius.value,
        inputs.density,
        inputs.viscosity,
    );
    let mut violations = Vec::new();
    check_reynolds(role, reynolds, config, &mut violations);

    let loss_coefficient = trace.last().map_or(0.0, |s| s.loss_coefficient);
    info!(
        %role,
        iterations = convergence.iteration,
        alpha_deg = state.alpha.to_degrees(),
        nozzle_radius = state.nozzle_radius,
        "stage converged"
    );

    Ok(StageSolution {
        geometry: state.geometry,
        spray_half_angle: rad(state.alpha),
        loss_coefficient,
        reynolds,
        friction_factor: friction_factor(reynolds),
        sized,
        iterations: convergence.iteration,
        convergence,
        trace,
        violations,
    })
}
