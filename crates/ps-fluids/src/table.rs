//! Name-keyed fluid property table.
//!
//! Tables start from the built-in catalog and can be extended from CSV files
//! with the header `name,h_fg,T_sat,roe_l,c_l,cp`. Files without a `name`
//! column are keyed by their file stem, so a directory holding `water.csv`,
//! `ethanol.csv`, ... loads one fluid per file.

use crate::catalog::builtin_catalog;
use crate::error::{FluidError, FluidResult};
use crate::properties::FluidProperties;
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
struct FluidRecord {
    #[serde(default)]
    name: Option<String>,
    h_fg: f64,
    #[serde(rename = "T_sat", alias = "t_sat")]
    t_sat: f64,
    #[serde(rename = "roe_l", alias = "rho_l")]
    rho_l: f64,
    c_l: f64,
    cp: f64,
}

/// Fluid table with case-insensitive lookup by name or alias.
#[derive(Debug, Clone, Default)]
pub struct FluidTable {
    fluids: Vec<FluidProperties>,
    index: HashMap<String, usize>,
}

fn key(name: &str) -> String {
    name.trim().to_ascii_lowercase()
}

impl FluidTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table holding the built-in catalog, aliases included.
    pub fn builtin() -> Self {
        let mut table = Self::new();
        for entry in builtin_catalog() {
            let idx = table.insert(entry.properties());
            table.index.insert(key(entry.display_name), idx);
            for alias in entry.aliases {
                table.index.insert(key(alias), idx);
            }
        }
        table
    }

    /// Insert or replace a fluid. Returns its slot.
    pub fn insert(&mut self, props: FluidProperties) -> usize {
        let k = key(&props.name);
        if let Some(&idx) = self.index.get(&k) {
            debug!(fluid = %props.name, "replacing fluid properties");
            self.fluids[idx] = props;
            idx
        } else {
            self.fluids.push(props);
            let idx = self.fluids.len() - 1;
            self.index.insert(k, idx);
            idx
        }
    }

    /// Register an additional name for an existing fluid.
    pub fn add_alias(&mut self, alias: &str, name: &str) -> FluidResult<()> {
        let idx = *self
            .index
            .get(&key(name))
            .ok_or_else(|| FluidError::UnknownFluid {
                name: name.to_string(),
            })?;
        self.index.insert(key(alias), idx);
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> FluidResult<&FluidProperties> {
        self.index
            .get(&key(name))
            .map(|&idx| &self.fluids[idx])
            .ok_or_else(|| FluidError::UnknownFluid {
                name: name.to_string(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(&key(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &FluidProperties> {
        self.fluids.iter()
    }

    pub fn len(&self) -> usize {
        self.fluids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fluids.is_empty()
    }

    /// Read records from any CSV source into this table.
    ///
    /// `default_name` keys rows that carry no `name` column.
    pub fn extend_from_csv_reader<R: Read>(
        &mut self,
        reader: R,
        source_name: &str,
        default_name: Option<&str>,
    ) -> FluidResult<usize> {
        let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let mut count = 0;
        for result in rdr.deserialize::<FluidRecord>() {
            let record = result.map_err(|e| FluidError::InvalidRecord {
                source_name: source_name.to_string(),
                message: e.to_string(),
            })?;
            let name = match (record.name, default_name) {
                (Some(n), _) if !n.trim().is_empty() => n,
                (_, Some(d)) => d.to_string(),
                _ => {
                    return Err(FluidError::InvalidRecord {
                        source_name: source_name.to_string(),
                        message: "row has no fluid name".to_string(),
                    });
                }
            };
            let props = FluidProperties::new(
                name,
                record.h_fg,
                record.t_sat,
                record.rho_l,
                record.c_l,
                record.cp,
            )?;
            self.insert(props);
            count += 1;
        }
        debug!(source = source_name, count, "loaded fluid records");
        Ok(count)
    }

    /// Load the built-in catalog extended by a single CSV file.
    pub fn from_csv_path(path: &Path) -> FluidResult<Self> {
        let mut table = Self::builtin();
        table.extend_from_csv_path(path)?;
        Ok(table)
    }

    pub fn extend_from_csv_path(&mut self, path: &Path) -> FluidResult<usize> {
        let file = std::fs::File::open(path).map_err(|e| FluidError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let stem = path.file_stem().and_then(|s| s.to_str());
        self.extend_from_csv_reader(file, &path.display().to_string(), stem)
    }

    /// Load the built-in catalog extended by every `*.csv` file in `dir`.
    pub fn from_csv_dir(dir: &Path) -> FluidResult<Self> {
        let io_err = |e: std::io::Error| FluidError::Io {
            path: dir.display().to_string(),
            message: e.to_string(),
        };
        let mut paths = Vec::new();
        for entry in std::fs::read_dir(dir).map_err(io_err)? {
            let path = entry.map_err(io_err)?.path();
            if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("csv")) {
                paths.push(path);
            }
        }
        if paths.is_empty() {
            warn!(dir = %dir.display(), "no fluid CSV files found");
        }
        paths.sort();

        let mut table = Self::builtin();
        for path in paths {
            table.extend_from_csv_path(&path)?;
        }
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_lookup_by_alias() {
        let table = FluidTable::builtin();
        let a = table.lookup("kerosene").unwrap();
        let b = table.lookup("RP-1").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.name, "rp1");
    }

    #[test]
    fn unknown_fluid_is_an_error() {
        let table = FluidTable::builtin();
        let err = table.lookup("unobtainium").unwrap_err();
        assert_eq!(
            err,
            FluidError::UnknownFluid {
                name: "unobtainium".into()
            }
        );
    }

    #[test]
    fn csv_rows_extend_and_override() {
        let data = "name,h_fg,T_sat,roe_l,c_l,cp\n\
                    water, 2.26e6, 373.15, 1000.0, 4186, 2000\n\
                    hydrazine, 1.25e6, 386.7, 1004, 3080, 1650\n";
        let mut table = FluidTable::builtin();
        let n = table
            .extend_from_csv_reader(data.as_bytes(), "inline", None)
            .unwrap();
        assert_eq!(n, 2);
        assert!((table.lookup("water").unwrap().rho_liquid_kg_m3 - 1000.0).abs() < 1e-12);
        // Alias still points at the replaced slot
        assert!((table.lookup("H2O").unwrap().rho_liquid_kg_m3 - 1000.0).abs() < 1e-12);
        assert!(table.contains("Hydrazine"));
    }

    #[test]
    fn nameless_rows_use_default_name() {
        let data = "h_fg,T_sat,roe_l,c_l,cp\n3.0e5,400,900,2000,1500\n";
        let mut table = FluidTable::new();
        table
            .extend_from_csv_reader(data.as_bytes(), "inline", Some("fuel_x"))
            .unwrap();
        assert!(table.contains("fuel_x"));

        let err = FluidTable::new()
            .extend_from_csv_reader(data.as_bytes(), "inline", None)
            .unwrap_err();
        assert!(matches!(err, FluidError::InvalidRecord { .. }));
    }

    #[test]
    fn non_physical_row_is_rejected() {
        let data = "name,h_fg,T_sat,roe_l,c_l,cp\nbad,1,1,-5,1,1\n";
        let err = FluidTable::new()
            .extend_from_csv_reader(data.as_bytes(), "inline", None)
            .unwrap_err();
        assert!(matches!(err, FluidError::NonPhysical { .. }));
    }

    #[test]
    fn add_alias_requires_existing_fluid() {
        let mut table = FluidTable::builtin();
        table.add_alias("fuel", "ethanol").unwrap();
        assert_eq!(table.lookup("fuel").unwrap().name, "ethanol");
        assert!(table.add_alias("x", "nope").is_err());
    }
}
