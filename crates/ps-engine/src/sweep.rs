//! Cartesian sweeps over engine operating points.

use crate::contour::{ContourSpec, NozzleContour};
use crate::error::{EngineError, EngineResult};
use crate::performance::{EnginePerformance, EngineSpec};
use crate::thermo::ThermoOracle;
use ps_core::units::{Length, kgps, pa};
use rayon::prelude::*;
use serde::Serialize;
use std::io::Write;
use tracing::{info, warn};

/// Lists of candidate inputs; every combination is sized.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSweep {
    pub fuels: Vec<String>,
    pub oxidizers: Vec<String>,
    pub mixture_ratios: Vec<f64>,
    /// Pa
    pub chamber_pressures: Vec<f64>,
    /// kg/s
    pub mass_flows: Vec<f64>,
    pub efficiencies: Vec<f64>,
    pub characteristic_length: Length,
    pub chamber_diameter: Length,
    /// Also build the nozzle contour of every sized row
    pub contour: Option<ContourSpec>,
}

impl EngineSweep {
    pub fn num_combinations(&self) -> usize {
        self.fuels.len()
            * self.oxidizers.len()
            * self.mixture_ratios.len()
            * self.chamber_pressures.len()
            * self.mass_flows.len()
            * self.efficiencies.len()
    }

    /// Every combination, fuel varying slowest.
    pub fn specs(&self) -> Vec<EngineSpec> {
        let mut specs = Vec::with_capacity(self.num_combinations());
        for fuel in &self.fuels {
            for oxidizer in &self.oxidizers {
                for &mixture_ratio in &self.mixture_ratios {
                    for &pc in &self.chamber_pressures {
                        for &mdot in &self.mass_flows {
                            for &efficiency in &self.efficiencies {
                                specs.push(EngineSpec {
                                    fuel: fuel.clone(),
                                    oxidizer: oxidizer.clone(),
                                    chamber_pressure: pa(pc),
                                    mixture_ratio,
                                    mass_flow: kgps(mdot),
                                    characteristic_length: self.characteristic_length,
                                    chamber_diameter: self.chamber_diameter,
                                    efficiency,
                                });
                            }
                        }
                    }
                }
            }
        }
        specs
    }
}

/// Sized engine plus its contour when one was requested.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSweepOutcome {
    pub performance: EnginePerformance,
    pub contour: Option<NozzleContour>,
}

#[derive(Debug, Clone)]
pub struct EngineSweepRow {
    pub spec: EngineSpec,
    pub outcome: Result<EngineSweepOutcome, EngineError>,
}

#[derive(Debug, Clone, Default)]
pub struct EngineSweepResult {
    pub rows: Vec<EngineSweepRow>,
}

impl EngineSweepResult {
    pub fn num_successful(&self) -> usize {
        self.rows.iter().filter(|r| r.outcome.is_ok()).count()
    }

    pub fn num_failed(&self) -> usize {
        self.rows.len() - self.num_successful()
    }
}

fn size_row(
    spec: &EngineSpec,
    oracle: &dyn ThermoOracle,
    contour: Option<&ContourSpec>,
) -> EngineResult<EngineSweepOutcome> {
    let performance = EnginePerformance::size(spec, oracle)?;
    let contour = contour
        .map(|c| NozzleContour::from_performance(&performance, c))
        .transpose()?;
    Ok(EngineSweepOutcome {
        performance,
        contour,
    })
}

/// Size every combination in parallel; failures are recorded per row.
pub fn sweep_engines(sweep: &EngineSweep, oracle: &dyn ThermoOracle) -> EngineSweepResult {
    let rows: Vec<EngineSweepRow> = sweep
        .specs()
        .into_par_iter()
        .map(|spec| {
            let outcome = size_row(&spec, oracle, sweep.contour.as_ref());
            if let Err(e) = &outcome {
                warn!(
                    fuel = %spec.fuel,
                    oxidizer = %spec.oxidizer,
                    mixture_ratio = spec.mixture_ratio,
                    chamber_pressure_pa = spec.chamber_pressure.value,
                    error = %e,
                    "engine sweep row failed"
                );
            }
            EngineSweepRow { spec, outcome }
        })
        .collect();

    let result = EngineSweepResult { rows };
    info!(
        rows = result.rows.len(),
        successful = result.num_successful(),
        failed = result.num_failed(),
        "engine sweep finished"
    );
    result
}

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    fuel: &'a str,
    oxidizer: &'a str,
    mixture_ratio: f64,
    chamber_pressure_pa: f64,
    mass_flow_kg_s: f64,
    efficiency: f64,
    thrust_n: Option<f64>,
    isp_s: Option<f64>,
    chamber_length_m: Option<f64>,
    chamber_diameter_m: Option<f64>,
    throat_diameter_m: Option<f64>,
    exit_diameter_m: Option<f64>,
    error: Option<String>,
}

/// One CSV line per row; failed rows keep their inputs and carry the error text.
pub fn write_sweep_csv<W: Write>(result: &EngineSweepResult, writer: W) -> EngineResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    let io_error = |e: &dyn std::fmt::Display| EngineError::Io {
        path: "sweep output".to_string(),
        message: e.to_string(),
    };
    for row in &result.rows {
        let perf = row.outcome.as_ref().ok().map(|o| &o.performance);
        wtr.serialize(CsvRow {
            fuel: &row.spec.fuel,
            oxidizer: &row.spec.oxidizer,
            mixture_ratio: row.spec.mixture_ratio,
            chamber_pressure_pa: row.spec.chamber_pressure.value,
            mass_flow_kg_s: row.spec.mass_flow.value,
            efficiency: row.spec.efficiency,
            thrust_n: perf.map(|p| p.thrust.value),
            isp_s: perf.map(|p| p.specific_impulse.value),
            chamber_length_m: perf.map(|p| p.chamber_length.value),
            chamber_diameter_m: perf.map(|p| p.chamber_diameter.value),
            throat_diameter_m: perf.map(|p| p.throat_diameter.value),
            exit_diameter_m: perf.map(|p| p.exit_diameter.value),
            error: row.outcome.as_ref().err().map(|e| e.to_string()),
        })
        .map_err(|e| io_error(&e))?;
    }
    wtr.flush().map_err(|e| io_error(&e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::thermo::fixtures::methalox;
    use ps_core::units::m;

    fn sweep() -> EngineSweep {
        EngineSweep {
            fuels: vec!["CH4".into(), "RP1".into()],
            oxidizers: vec!["LOX".into()],
            mixture_ratios: vec![2.5, 3.0, 3.5],
            chamber_pressures: vec![2e6, 4e6],
            mass_flows: vec![1.0],
            efficiencies: vec![1.0, 0.95],
            characteristic_length: m(1.0),
            chamber_diameter: m(0.08),
            contour: None,
        }
    }

    #[test]
    fn every_combination_gets_a_row_in_order() {
        let s = sweep();
        assert_eq!(s.num_combinations(), 24);
        let result = sweep_engines(&s, &methalox());
        assert_eq!(result.rows.len(), 24);
        assert_eq!(result.rows[0].spec.fuel, "CH4");
        assert_eq!(result.rows[23].spec.fuel, "RP1");
        assert_eq!(result.rows[1].spec.efficiency, 0.95);
    }

    #[test]
    fn unknown_pair_rows_fail_without_stopping_the_sweep() {
        let result = sweep_engines(&sweep(), &methalox());
        assert_eq!(result.num_successful(), 12);
        assert_eq!(result.num_failed(), 12);
        for row in &result.rows {
            match row.spec.fuel.as_str() {
                "RP1" => assert!(matches!(
                    row.outcome,
                    Err(EngineError::UnknownPropellants { .. })
                )),
                _ => assert!(row.outcome.is_ok()),
            }
        }
    }

    #[test]
    fn contour_is_built_per_row_when_requested() {
        let mut s = sweep();
        s.fuels = vec!["CH4".into()];
        s.contour = Some(ContourSpec::default());
        let result = sweep_engines(&s, &methalox());
        assert!(
            result
                .rows
                .iter()
                .all(|r| matches!(&r.outcome, Ok(o) if o.contour.is_some()))
        );
    }

    #[test]
    fn csv_keeps_failed_rows() {
        let result = sweep_engines(&sweep(), &methalox());
        let mut buf = Vec::new();
        write_sweep_csv(&result, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("fuel,oxidizer,mixture_ratio"));
        assert_eq!(lines.len(), 25);
        assert!(lines.iter().any(|l| l.starts_with("RP1") && l.contains("No thermochemistry")));
    }
}
