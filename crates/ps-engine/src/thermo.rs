//! Thermochemistry oracle.
//!
//! Chamber gas properties come from an external equilibrium solver. The
//! engine code only sees the [`ThermoOracle`] trait; the shipped
//! implementation interpolates a table of precomputed solver output.

use crate::error::{EngineError, EngineResult, positive};
use ps_core::units::{Pressure, Temperature, Velocity, k, mps};
use ps_core::{Grid2, ensure_positive};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Propellant pair and operating point.
#[derive(Debug, Clone, PartialEq)]
pub struct ThermoQuery {
    pub fuel: String,
    pub oxidizer: String,
    pub chamber_pressure: Pressure,
    /// Oxidizer-to-fuel mass ratio
    pub mixture_ratio: f64,
}

/// Chamber and nozzle gas properties.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThermoProperties {
    pub chamber_temperature: Temperature,
    /// Ratio of specific heats
    pub gamma: f64,
    /// Molecular weight, kg/kmol
    pub molecular_weight: f64,
    /// Specific impulse expressed as effective exhaust velocity
    pub exhaust_velocity: Velocity,
    /// Nozzle exit-to-throat area ratio
    pub area_ratio: f64,
}

impl ThermoProperties {
    pub fn validate(&self) -> EngineResult<()> {
        positive(self.chamber_temperature.value, "chamber temperature")?;
        positive(self.molecular_weight, "molecular weight")?;
        positive(self.exhaust_velocity.value, "exhaust velocity")?;
        if !(self.gamma.is_finite() && self.gamma > 1.0) {
            return Err(EngineError::InvalidInput {
                what: "gamma",
                value: self.gamma,
            });
        }
        if !(self.area_ratio.is_finite() && self.area_ratio >= 1.0) {
            return Err(EngineError::InvalidInput {
                what: "area ratio",
                value: self.area_ratio,
            });
        }
        Ok(())
    }
}

/// Opaque source of chamber gas properties.
pub trait ThermoOracle: Send + Sync {
    fn properties(&self, query: &ThermoQuery) -> EngineResult<ThermoProperties>;
}

/// One row of precomputed solver output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThermoRecord {
    pub fuel: String,
    pub oxidizer: String,
    pub pc_pa: f64,
    pub mixture_ratio: f64,
    pub t_k: f64,
    pub gamma: f64,
    pub mw_kg_kmol: f64,
    pub c_mps: f64,
    pub area_ratio: f64,
}

#[derive(Debug, Clone, PartialEq)]
struct PairTable {
    temperature: Grid2,
    gamma: Grid2,
    molecular_weight: Grid2,
    exhaust_velocity: Grid2,
    area_ratio: Grid2,
}

impl PairTable {
    fn axis_check(&self, axis: &[f64], value: f64, what: &'static str) -> EngineResult<()> {
        let (min, max) = (axis[0], axis[axis.len() - 1]);
        if value >= min && value <= max {
            Ok(())
        } else {
            Err(EngineError::OutOfTableRange {
                what,
                value,
                min,
                max,
            })
        }
    }

    fn lookup(&self, pc: f64, mr: f64) -> EngineResult<ThermoProperties> {
        self.axis_check(self.temperature.x_axis(), pc, "chamber pressure")?;
        self.axis_check(self.temperature.y_axis(), mr, "mixture ratio")?;
        let at = |grid: &Grid2| {
            grid.interpolate(pc, mr)
                .ok_or(EngineError::OutOfTableRange {
                    what: "chamber pressure",
                    value: pc,
                    min: grid.x_axis()[0],
                    max: grid.x_axis()[grid.x_axis().len() - 1],
                })
        };
        Ok(ThermoProperties {
            chamber_temperature: k(at(&self.temperature)?),
            gamma: at(&self.gamma)?,
            molecular_weight: at(&self.molecular_weight)?,
            exhaust_velocity: mps(at(&self.exhaust_velocity)?),
            area_ratio: at(&self.area_ratio)?,
        })
    }
}

fn pair_key(fuel: &str, oxidizer: &str) -> (String, String) {
    (
        fuel.trim().to_ascii_lowercase(),
        oxidizer.trim().to_ascii_lowercase(),
    )
}

/// Tabulated solver output, bilinear in (chamber pressure, mixture ratio) per propellant pair.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThermoTable {
    pairs: HashMap<(String, String), PairTable>,
}

impl ThermoTable {
    /// Build from rows; every pair must cover a full pressure × mixture-ratio grid.
    pub fn from_records(records: &[ThermoRecord], source_name: &str) -> EngineResult<Self> {
        let table_error = |message: String| EngineError::ThermoTable {
            source_name: source_name.to_string(),
            message,
        };

        let mut grouped: BTreeMap<(String, String), Vec<&ThermoRecord>> = BTreeMap::new();
        for rec in records {
            if ensure_positive(rec.pc_pa, "chamber pressure").is_err()
                || ensure_positive(rec.mixture_ratio, "mixture ratio").is_err()
            {
                return Err(table_error(format!(
                    "non-positive operating point pc = {}, MR = {}",
                    rec.pc_pa, rec.mixture_ratio
                )));
            }
            grouped
                .entry(pair_key(&rec.fuel, &rec.oxidizer))
                .or_default()
                .push(rec);
        }

        let mut pairs = HashMap::new();
        for (key, rows) in grouped {
            let mut cells: BTreeMap<(u64, u64), &ThermoRecord> = BTreeMap::new();
            let mut pcs = BTreeMap::new();
            let mut mrs = BTreeMap::new();
            for rec in rows {
                // Positive floats order the same as their bit patterns
                if cells
                    .insert((rec.pc_pa.to_bits(), rec.mixture_ratio.to_bits()), rec)
                    .is_some()
                {
                    return Err(table_error(format!(
                        "duplicate point for {}/{} at pc = {}, MR = {}",
                        key.0, key.1, rec.pc_pa, rec.mixture_ratio
                    )));
                }
                pcs.insert(rec.pc_pa.to_bits(), rec.pc_pa);
                mrs.insert(rec.mixture_ratio.to_bits(), rec.mixture_ratio);
            }
            let pc_axis: Vec<f64> = pcs.into_values().collect();
            let mr_axis: Vec<f64> = mrs.into_values().collect();

            let mut columns: [Vec<f64>; 5] = Default::default();
            for pc in &pc_axis {
                for mr in &mr_axis {
                    let rec = cells.get(&(pc.to_bits(), mr.to_bits())).ok_or_else(|| {
                        table_error(format!(
                            "{}/{} missing grid point pc = {pc}, MR = {mr}",
                            key.0, key.1
                        ))
                    })?;
                    for (col, v) in columns.iter_mut().zip([
                        rec.t_k,
                        rec.gamma,
                        rec.mw_kg_kmol,
                        rec.c_mps,
                        rec.area_ratio,
                    ]) {
                        col.push(v);
                    }
                }
            }
            let [t, gamma, mw, c, eps] = columns;
            let grid = |values: Vec<f64>| {
                Grid2::new(pc_axis.clone(), mr_axis.clone(), values)
                    .map_err(|e| table_error(format!("{}/{}: {e}", key.0, key.1)))
            };
            let table = PairTable {
                temperature: grid(t)?,
                gamma: grid(gamma)?,
                molecular_weight: grid(mw)?,
                exhaust_velocity: grid(c)?,
                area_ratio: grid(eps)?,
            };
            debug!(
                fuel = %key.0,
                oxidizer = %key.1,
                pressures = pc_axis.len(),
                mixture_ratios = mr_axis.len(),
                "loaded thermochemistry grid"
            );
            pairs.insert(key, table);
        }
        Ok(Self { pairs })
    }

    /// Read CSV with header
    /// `fuel,oxidizer,pc_pa,mixture_ratio,t_k,gamma,mw_kg_kmol,c_mps,area_ratio`.
    pub fn from_csv_reader<R: Read>(reader: R, source_name: &str) -> EngineResult<Self> {
        let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let records = rdr
            .deserialize::<ThermoRecord>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| EngineError::ThermoTable {
                source_name: source_name.to_string(),
                message: e.to_string(),
            })?;
        Self::from_records(&records, source_name)
    }

    pub fn from_csv_path(path: &Path) -> EngineResult<Self> {
        let file = std::fs::File::open(path).map_err(|e| EngineError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_csv_reader(file, &path.display().to_string())
    }

    pub fn propellant_pairs(&self) -> Vec<(String, String)> {
        let mut keys: Vec<_> = self.pairs.keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl ThermoOracle for ThermoTable {
    fn properties(&self, query: &ThermoQuery) -> EngineResult<ThermoProperties> {
        let table = self
            .pairs
            .get(&pair_key(&query.fuel, &query.oxidizer))
            .ok_or_else(|| EngineError::UnknownPropellants {
                fuel: query.fuel.clone(),
                oxidizer: query.oxidizer.clone(),
            })?;
        let props = table.lookup(query.chamber_pressure.value, query.mixture_ratio)?;
        props.validate()?;
        Ok(props)
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::methalox;
    use super::*;
    use ps_core::units::pa;

    fn query(pc: f64, mr: f64) -> ThermoQuery {
        ThermoQuery {
            fuel: "ch4".into(),
            oxidizer: "Lox".into(),
            chamber_pressure: pa(pc),
            mixture_ratio: mr,
        }
    }

    #[test]
    fn corner_values_are_exact() {
        let props = methalox().properties(&query(2e6, 2.5)).unwrap();
        assert!((props.chamber_temperature.value - 3300.0).abs() < 1e-9);
        assert!((props.gamma - 1.20).abs() < 1e-12);
        assert!((props.area_ratio - 4.0).abs() < 1e-12);
    }

    #[test]
    fn centre_is_average_of_corners() {
        let props = methalox().properties(&query(4e6, 3.0)).unwrap();
        assert!((props.chamber_temperature.value - 3450.0).abs() < 1e-9);
        assert!((props.molecular_weight - 21.75).abs() < 1e-12);
        assert!((props.exhaust_velocity.value - 2975.0).abs() < 1e-9);
    }

    #[test]
    fn unknown_pair_and_range_errors() {
        let table = methalox();
        let mut q = query(4e6, 3.0);
        q.fuel = "RP1".into();
        assert!(matches!(
            table.properties(&q),
            Err(EngineError::UnknownPropellants { .. })
        ));
        assert!(matches!(
            table.properties(&query(1e7, 3.0)),
            Err(EngineError::OutOfTableRange {
                what: "chamber pressure",
                ..
            })
        ));
        assert!(matches!(
            table.properties(&query(4e6, 5.0)),
            Err(EngineError::OutOfTableRange {
                what: "mixture ratio",
                ..
            })
        ));
    }

    #[test]
    fn incomplete_grid_is_rejected() {
        let csv = "fuel,oxidizer,pc_pa,mixture_ratio,t_k,gamma,mw_kg_kmol,c_mps,area_ratio\n\
                   RP1,LOX,2e6,2.0,3400,1.2,22,2900,5\n\
                   RP1,LOX,4e6,2.0,3450,1.2,22,2950,6\n\
                   RP1,LOX,4e6,2.5,3500,1.2,23,2980,6\n";
        let err = ThermoTable::from_csv_reader(csv.as_bytes(), "partial").unwrap_err();
        assert!(err.to_string().contains("missing grid point"));
    }

    #[test]
    fn pairs_are_listed() {
        assert_eq!(
            methalox().propellant_pairs(),
            vec![("ch4".to_string(), "lox".to_string())]
        );
    }
}
