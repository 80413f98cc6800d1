//! Empirical (chart-driven) monopropellant sizing.
//!
//! The procedure takes A and μ read from published charts for the chosen
//! spray angle, sizes the element in one pass and reads the gas-vortex radius
//! ratio r̄_m = r_m / R_n off a second chart keyed on (A, R_in/R_n). That
//! second chart is injected through [`ChartLookup`].

use crate::config::SizingConfig;
use crate::error::{
    DesignRuleViolation, InjectorError, InjectorResult, StageRole, open_interval, positive,
};
use crate::hydraulic::check_reynolds;
use crate::sizing::{SizedGeometry, inlet_reynolds, nozzle_radius};
use crate::spec::{InjectorStageSpec, LengthRatios};
use ps_core::units::{Angle, Density, KinVisc, Length, MassRate, Pressure, m};
use ps_core::{Grid2, ensure_positive};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// Source of the gas-vortex radius ratio r̄_m for a nozzle.
pub trait ChartLookup {
    fn gas_vortex_ratio(&self, a: f64, inlet_radius_ratio: f64) -> InjectorResult<f64>;
}

/// Gridded chart interpolated bilinearly over (A, R_in/R_n).
#[derive(Debug, Clone, PartialEq)]
pub struct TabulatedChart {
    grid: Grid2,
}

#[derive(Debug, Deserialize)]
struct ChartRecord {
    #[serde(rename = "A", alias = "a")]
    a: f64,
    #[serde(rename = "R_in_ratio", alias = "rbar_in")]
    ratio: f64,
    rbar_m: f64,
}

fn table_error(source_name: &str, message: impl Into<String>) -> InjectorError {
    InjectorError::ChartTable {
        source_name: source_name.to_string(),
        message: message.into(),
    }
}

impl TabulatedChart {
    /// `values` is row-major over `a_axis`.
    pub fn new(a_axis: Vec<f64>, ratio_axis: Vec<f64>, values: Vec<f64>) -> InjectorResult<Self> {
        let grid = Grid2::new(a_axis, ratio_axis, values)
            .map_err(|e| table_error("chart", e.to_string()))?;
        Ok(Self { grid })
    }

    /// Read a long-format CSV with header `A,R_in_ratio,rbar_m` covering a full grid.
    pub fn from_csv_reader<R: Read>(reader: R, source_name: &str) -> InjectorResult<Self> {
        let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let mut cells: BTreeMap<(u64, u64), f64> = BTreeMap::new();
        let mut a_keys = BTreeMap::new();
        let mut r_keys = BTreeMap::new();
        for result in rdr.deserialize::<ChartRecord>() {
            let rec = result.map_err(|e| table_error(source_name, e.to_string()))?;
            if ensure_positive(rec.a, "A").is_err()
                || ensure_positive(rec.ratio, "R_in/R_n").is_err()
            {
                return Err(table_error(source_name, "axis values must be positive"));
            }
            // Positive finite floats order the same as their bit patterns
            let key = (rec.a.to_bits(), rec.ratio.to_bits());
            if cells.insert(key, rec.rbar_m).is_some() {
                return Err(table_error(
                    source_name,
                    format!("duplicate point A = {}, R_in/R_n = {}", rec.a, rec.ratio),
                ));
            }
            a_keys.insert(rec.a.to_bits(), rec.a);
            r_keys.insert(rec.ratio.to_bits(), rec.ratio);
        }

        let a_axis: Vec<f64> = a_keys.values().copied().collect();
        let ratio_axis: Vec<f64> = r_keys.values().copied().collect();
        let mut values = Vec::with_capacity(a_axis.len() * ratio_axis.len());
        for a in &a_axis {
            for r in &ratio_axis {
                let v = cells.get(&(a.to_bits(), r.to_bits())).ok_or_else(|| {
                    table_error(
                        source_name,
                        format!("missing grid point A = {a}, R_in/R_n = {r}"),
                    )
                })?;
                values.push(*v);
            }
        }
        debug!(
            source = source_name,
            a_points = a_axis.len(),
            ratio_points = ratio_axis.len(),
            "loaded gas-vortex chart"
        );
        let grid = Grid2::new(a_axis, ratio_axis, values)
            .map_err(|e| table_error(source_name, e.to_string()))?;
        Ok(Self { grid })
    }

    pub fn from_csv_path(path: &Path) -> InjectorResult<Self> {
        let name = path.display().to_string();
        let file = std::fs::File::open(path).map_err(|e| table_error(&name, e.to_string()))?;
        Self::from_csv_reader(file, &name)
    }

    pub fn interpolate(&self, a: f64, ratio: f64) -> Option<f64> {
        self.grid.interpolate(a, ratio)
    }
}

impl ChartLookup for TabulatedChart {
    fn gas_vortex_ratio(&self, a: f64, inlet_radius_ratio: f64) -> InjectorResult<f64> {
        self.interpolate(a, inlet_radius_ratio)
            .ok_or(InjectorError::ChartOutOfRange {
                a,
                ratio: inlet_radius_ratio,
            })
    }
}

/// Inputs for chart-driven sizing.
#[derive(Debug, Clone, PartialEq)]
pub struct EmpiricalStageSpec {
    pub mass_flow: MassRate,
    pub upstream_pressure: Pressure,
    pub chamber_pressure: Pressure,
    pub density: Density,
    pub kinematic_viscosity: KinVisc,
    pub spray_half_angle: Angle,
    /// Nozzle length over nozzle diameter, l_n / D_n
    pub nozzle_length_to_diameter: f64,
    /// Geometric characteristic A read from the chart
    pub geometric_parameter: f64,
    /// Discharge coefficient μ read from the chart
    pub discharge_coefficient: f64,
    pub inlet_passages: u32,
    /// R_in / R_n
    pub inlet_radius_ratio: f64,
    /// l_in / r_in
    pub inlet_length_ratio: f64,
    /// l_s / R_in
    pub chamber_length_ratio: f64,
}

impl EmpiricalStageSpec {
    /// Equivalent stage record; the nozzle ratio is `l_n / R_n = 2·(l_n / D_n)`.
    pub fn stage_spec(&self) -> InjectorStageSpec {
        InjectorStageSpec {
            mass_flow: self.mass_flow,
            upstream_pressure: self.upstream_pressure,
            chamber_pressure: self.chamber_pressure,
            density: self.density,
            kinematic_viscosity: self.kinematic_viscosity,
            spray_half_angle: self.spray_half_angle,
            inlet_passages: self.inlet_passages,
            length_ratios: LengthRatios::new(
                self.inlet_length_ratio,
                2.0 * self.nozzle_length_to_diameter,
                self.chamber_length_ratio,
            ),
            inlet_radius_ratio: Some(self.inlet_radius_ratio),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmpiricalSolution {
    pub spray_half_angle: Angle,
    pub geometric_parameter: f64,
    pub discharge_coefficient: f64,
    pub pressure_drop: Pressure,
    pub sized: SizedGeometry,
    pub reynolds: f64,
    /// r̄_m = r_m / R_n
    pub gas_vortex_ratio: f64,
    pub gas_vortex_radius: Length,
    pub violations: Vec<DesignRuleViolation>,
}

/// Size an element in one pass from chart-read A and μ.
pub fn size_empirical(
    spec: &EmpiricalStageSpec,
    chart: &dyn ChartLookup,
    config: &SizingConfig,
) -> InjectorResult<EmpiricalSolution> {
    config.validate()?;
    let stage = spec.stage_spec();
    let inputs = stage.inputs(config.inlet_radius_ratio)?;
    let a = positive(spec.geometric_parameter, "geometric parameter")?;
    let mu = open_interval(
        spec.discharge_coefficient,
        0.0,
        1.0,
        "discharge coefficient",
    )?;

    let r_n = nozzle_radius(inputs.mass_flow, mu, inputs.density, inputs.pressure_drop)?;
    let sized = SizedGeometry::from_nozzle(
        r_n,
        a,
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
    check_reynolds(StageRole::Single, reynolds, config, &mut violations);

    let rbar_m = open_interval(
        chart.gas_vortex_ratio(a, inputs.inlet_radius_ratio)?,
        0.0,
        1.0,
        "gas vortex radius ratio",
    )?;
    info!(
        nozzle_radius = r_n,
        reynolds,
        rbar_m,
        "empirical stage sized"
    );

    Ok(EmpiricalSolution {
        spray_half_angle: stage.spray_half_angle,
        geometric_parameter: a,
        discharge_coefficient: mu,
        pressure_drop: stage.pressure_drop(),
        sized,
        reynolds,
        gas_vortex_ratio: rbar_m,
        gas_vortex_radius: m(rbar_m * r_n),
        violations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ps_core::units::{deg, kg_per_m3, kgps, m2ps, pa};

    // r̄_m = 0.3 + 0.05·A + 0.1·R̄_in, which bilinear interpolation reproduces exactly
    fn plane_chart() -> TabulatedChart {
        let a_axis = vec![0.5, 1.0, 2.0, 4.0];
        let r_axis = vec![1.0, 2.0, 4.0];
        let mut values = Vec::new();
        for a in &a_axis {
            for r in &r_axis {
                values.push(0.3 + 0.05 * a + 0.1 * r);
            }
        }
        TabulatedChart::new(a_axis, r_axis, values).unwrap()
    }

    fn empirical_water() -> EmpiricalStageSpec {
        EmpiricalStageSpec {
            mass_flow: kgps(0.025),
            upstream_pressure: pa(2.4e6),
            chamber_pressure: pa(2.0e6),
            density: kg_per_m3(997.0),
            kinematic_viscosity: m2ps(1e-6),
            spray_half_angle: deg(60.0),
            nozzle_length_to_diameter: 0.5,
            geometric_parameter: 2.0,
            discharge_coefficient: 0.25,
            inlet_passages: 3,
            inlet_radius_ratio: 2.0,
            inlet_length_ratio: 4.5,
            chamber_length_ratio: 3.0,
        }
    }

    #[test]
    fn bilinear_reproduces_plane() {
        let chart = plane_chart();
        for (a, r) in [(0.7, 1.3), (3.1, 3.9), (0.5, 1.0), (4.0, 4.0), (1.0, 2.0)] {
            let v = chart.interpolate(a, r).unwrap();
            assert!((v - (0.3 + 0.05 * a + 0.1 * r)).abs() < 1e-12, "({a}, {r})");
        }
    }

    #[test]
    fn outside_grid_is_reported() {
        let chart = plane_chart();
        assert!(chart.interpolate(5.0, 2.0).is_none());
        assert!(matches!(
            chart.gas_vortex_ratio(1.0, 0.5),
            Err(InjectorError::ChartOutOfRange { .. })
        ));
    }

    #[test]
    fn unsorted_axis_is_rejected() {
        let err = TabulatedChart::new(vec![1.0, 0.5], vec![1.0, 2.0], vec![0.5; 4]).unwrap_err();
        assert!(matches!(err, InjectorError::ChartTable { .. }));
    }

    #[test]
    fn csv_grid_in_any_row_order() {
        let data = "A,R_in_ratio,rbar_m\n\
                    2.0,1.0,0.6\n\
                    1.0,1.0,0.5\n\
                    1.0,2.0,0.55\n\
                    2.0,2.0,0.7\n";
        let chart = TabulatedChart::from_csv_reader(data.as_bytes(), "inline").unwrap();
        assert!((chart.interpolate(1.5, 1.5).unwrap() - 0.5875).abs() < 1e-12);
    }

    #[test]
    fn csv_with_hole_is_rejected() {
        let data = "A,R_in_ratio,rbar_m\n1.0,1.0,0.5\n1.0,2.0,0.55\n2.0,1.0,0.6\n";
        let err = TabulatedChart::from_csv_reader(data.as_bytes(), "inline").unwrap_err();
        assert!(err.to_string().contains("missing grid point"));
    }

    #[test]
    fn empirical_sizing_one_pass() {
        let spec = empirical_water();
        let sol = size_empirical(&spec, &plane_chart(), &SizingConfig::default()).unwrap();
        let r_n = nozzle_radius(0.025, 0.25, 997.0, 4e5).unwrap();
        assert!((sol.sized.nozzle_radius.value - r_n).abs() < 1e-15);
        // l_n = 2·(l/D)·R_n
        assert!((sol.sized.nozzle_length.value - r_n).abs() < 1e-15);
        assert!((sol.sized.inlet_arm_radius.value - 2.0 * r_n).abs() < 1e-15);
        let expected_rbar = 0.3 + 0.05 * 2.0 + 0.1 * 2.0;
        assert!((sol.gas_vortex_ratio - expected_rbar).abs() < 1e-12);
        assert!((sol.gas_vortex_radius.value - expected_rbar * r_n).abs() < 1e-15);
    }

    #[test]
    fn empirical_rejects_discharge_coefficient_above_one() {
        let spec = EmpiricalStageSpec {
            discharge_coefficient: 1.2,
            ..empirical_water()
        };
        assert!(matches!(
            size_empirical(&spec, &plane_chart(), &SizingConfig::default()),
            Err(InjectorError::InvalidInput {
                what: "discharge coefficient",
                ..
            })
        ));
    }

    #[test]
    fn empirical_rejects_invalid_config() {
        let config = SizingConfig {
            max_iterations: 0,
            ..SizingConfig::default()
        };
        assert!(matches!(
            size_empirical(&empirical_water(), &plane_chart(), &config),
            Err(InjectorError::InvalidInput {
                what: "max iterations",
                ..
            })
        ));

        let config = SizingConfig {
            min_reynolds: f64::NAN,
            ..SizingConfig::default()
        };
        assert!(size_empirical(&empirical_water(), &plane_chart(), &config).is_err());
    }

    #[test]
    fn empirical_low_reynolds_is_a_violation() {
        let spec = EmpiricalStageSpec {
            kinematic_viscosity: m2ps(1e-4),
            ..empirical_water()
        };
        let sol = size_empirical(&spec, &plane_chart(), &SizingConfig::default()).unwrap();
        assert_eq!(sol.violations.len(), 1);
    }
}
