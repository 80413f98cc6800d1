//! Parallel sweeps of a single stage over one input.

use crate::config::SizingConfig;
use crate::error::InjectorError;
use crate::hydraulic::{StageSolution, size_stage};
use crate::spec::InjectorStageSpec;
use ps_core::SweepDefinition;
use ps_core::units::{pa, rad};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Stage input varied by a sweep. Values are SI: radians or pascals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InjectorSweepParameter {
    SprayHalfAngle,
    /// Upstream pressure is moved; chamber pressure stays fixed
    PressureDrop,
}

impl InjectorSweepParameter {
    pub fn apply(&self, base: &InjectorStageSpec, value: f64) -> InjectorStageSpec {
        let mut spec = base.clone();
        match self {
            Self::SprayHalfAngle => spec.spray_half_angle = rad(value),
            Self::PressureDrop => spec.upstream_pressure = base.chamber_pressure + pa(value),
        }
        spec
    }
}

#[derive(Debug, Clone)]
pub struct InjectorSweepPoint {
    pub value: f64,
    pub outcome: Result<StageSolution, InjectorError>,
}

#[derive(Debug, Clone)]
pub struct InjectorSweepResult {
    pub parameter: InjectorSweepParameter,
    pub points: Vec<InjectorSweepPoint>,
}

impl InjectorSweepResult {
    pub fn num_successful(&self) -> usize {
        self.points.iter().filter(|p| p.outcome.is_ok()).count()
    }

    pub fn num_failed(&self) -> usize {
        self.points.len() - self.num_successful()
    }

    /// (value, solution) pairs for points that sized.
    pub fn successful(&self) -> impl Iterator<Item = (f64, &StageSolution)> {
        self.points
            .iter()
            .filter_map(|p| p.outcome.as_ref().ok().map(|s| (p.value, s)))
    }
}

/// Size `base` at every sweep point; a failing point is recorded, not fatal.
pub fn sweep_stage(
    base: &InjectorStageSpec,
    parameter: InjectorSweepParameter,
    sweep: &SweepDefinition,
    config: &SizingConfig,
) -> InjectorSweepResult {
    let points: Vec<InjectorSweepPoint> = sweep
        .generate_points()
        .into_par_iter()
        .map(|value| {
            let outcome = size_stage(&parameter.apply(base, value), config);
            if let Err(e) = &outcome {
                warn!(?parameter, value, error = %e, "sweep point failed");
            }
            InjectorSweepPoint { value, outcome }
        })
        .collect();

    let result = InjectorSweepResult { parameter, points };
    info!(
        ?parameter,
        successful = result.num_successful(),
        failed = result.num_failed(),
        "injector sweep finished"
    );
    result
}
