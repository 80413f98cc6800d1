use ps_core::units::{k, kgps, m, pa};
use ps_engine::{
    BartzInputs, ContourSpec, EngineError, EnginePerformance, EngineSpec, NozzleContour,
    ThermoTable, bartz, hoop_stress, write_contour_csv_path,
};
use std::fs;

const TABLE: &str = "\
fuel,oxidizer,pc_pa,mixture_ratio,t_k,gamma,mw_kg_kmol,c_mps,area_ratio
RP1,LOX,2e6,2.0,3400,1.22,21.5,2850,4.5
RP1,LOX,2e6,2.8,3600,1.20,23.5,2900,4.8
RP1,LOX,5e6,2.0,3450,1.21,21.8,2950,8.5
RP1,LOX,5e6,2.8,3650,1.19,23.8,3000,9.0
ethanol,lox,2e6,1.2,3100,1.21,22.0,2700,4.2
ethanol,lox,2e6,1.8,3250,1.19,23.5,2750,4.4
ethanol,lox,5e6,1.2,3150,1.20,22.3,2800,8.0
ethanol,lox,5e6,1.8,3300,1.18,23.8,2850,8.3
";

fn temp_dir(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("ps_engine_{name}_{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn spec(fuel: &str, mr: f64) -> EngineSpec {
    EngineSpec {
        fuel: fuel.into(),
        oxidizer: "LOX".into(),
        chamber_pressure: pa(3e6),
        mixture_ratio: mr,
        mass_flow: kgps(1.5),
        characteristic_length: m(1.1),
        chamber_diameter: m(0.09),
        efficiency: 0.97,
    }
}

#[test]
fn table_file_to_contour_file() {
    let dir = temp_dir("chain");
    let table_path = dir.join("thermo.csv");
    fs::write(&table_path, TABLE).unwrap();
    let table = ThermoTable::from_csv_path(&table_path).unwrap();
    assert_eq!(table.propellant_pairs().len(), 2);

    let perf = EnginePerformance::size(&spec("rp1", 2.4), &table).unwrap();
    assert!(perf.throat_diameter.value < perf.chamber_diameter.value);
    assert!(perf.contraction_ratio > 1.0);

    let contour = NozzleContour::from_performance(&perf, &ContourSpec::default()).unwrap();
    let points = contour.sample(m(5e-4)).unwrap();
    let out = dir.join("contour.csv");
    write_contour_csv_path(&points, &out).unwrap();
    let written = fs::read_to_string(&out).unwrap();
    assert_eq!(written.lines().count(), points.len() + 1);

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn propellant_names_are_case_insensitive() {
    let table = ThermoTable::from_csv_reader(TABLE.as_bytes(), "inline").unwrap();
    let a = EnginePerformance::size(&spec("Ethanol", 1.5), &table).unwrap();
    let b = EnginePerformance::size(&spec("ETHANOL", 1.5), &table).unwrap();
    assert_eq!(a, b);
}

#[test]
fn out_of_range_mixture_ratio_is_reported() {
    let table = ThermoTable::from_csv_reader(TABLE.as_bytes(), "inline").unwrap();
    let err = EnginePerformance::size(&spec("ethanol", 2.5), &table).unwrap_err();
    assert!(matches!(
        err,
        EngineError::OutOfTableRange {
            what: "mixture ratio",
            ..
        }
    ));
}

#[test]
fn missing_table_file_is_io_error() {
    let err = ThermoTable::from_csv_path(std::path::Path::new("/nonexistent/thermo.csv"))
        .unwrap_err();
    assert!(matches!(err, EngineError::Io { .. }));
}

#[test]
fn wall_and_film_estimates_from_sized_engine() {
    let table = ThermoTable::from_csv_reader(TABLE.as_bytes(), "inline").unwrap();
    let s = spec("rp1", 2.4);
    let perf = EnginePerformance::size(&s, &table).unwrap();

    let sigma = hoop_stress(s.chamber_pressure, perf.chamber_diameter, m(0.003)).unwrap();
    assert!((sigma.value - 3e6 * 0.09 / 0.006).abs() < 1e-3);

    let at_throat = BartzInputs::from_performance(
        &perf,
        s.chamber_pressure,
        perf.throat_diameter,
        2100.0,
        9e-5,
        k(800.0),
    );
    let at_chamber = BartzInputs {
        local_diameter: perf.chamber_diameter.value,
        ..at_throat
    };
    assert!(bartz(&at_throat).unwrap() > bartz(&at_chamber).unwrap());
}
