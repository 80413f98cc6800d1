use ps_fluids::{FluidError, FluidTable};
use std::fs;

#[test]
fn load_directory_of_single_fluid_files() {
    let temp_dir = std::env::temp_dir().join("ps_fluids_csv_dir_test");
    let _ = fs::remove_dir_all(&temp_dir);
    fs::create_dir_all(&temp_dir).unwrap();

    fs::write(
        temp_dir.join("nitromethane.csv"),
        "h_fg,T_sat,roe_l,c_l,cp\n5.6e5,374.3,1137,1730,1200\n",
    )
    .unwrap();
    fs::write(
        temp_dir.join("ethanol.csv"),
        "h_fg,T_sat,roe_l,c_l,cp\n8.4e5,351.4,790,2440,1420\n",
    )
    .unwrap();
    fs::write(temp_dir.join("notes.txt"), "ignored").unwrap();

    let table = FluidTable::from_csv_dir(&temp_dir).unwrap();
    let nm = table.lookup("nitromethane").unwrap();
    assert!((nm.rho_liquid_kg_m3 - 1137.0).abs() < 1e-12);
    // File overrides the built-in ethanol entry
    assert!((table.lookup("ethanol").unwrap().rho_liquid_kg_m3 - 790.0).abs() < 1e-12);
    // Built-ins untouched by the directory are still present
    assert!(table.contains("lox"));

    let _ = fs::remove_dir_all(&temp_dir);
}

#[test]
fn load_single_table_file() {
    let temp_dir = std::env::temp_dir().join("ps_fluids_csv_file_test");
    let _ = fs::remove_dir_all(&temp_dir);
    fs::create_dir_all(&temp_dir).unwrap();
    let path = temp_dir.join("props.csv");
    fs::write(
        &path,
        "name,h_fg,T_sat,roe_l,c_l,cp\nhtp,1.3e6,423,1431,2600,1300\n",
    )
    .unwrap();

    let table = FluidTable::from_csv_path(&path).unwrap();
    assert!(table.lookup("HTP").is_ok());

    let _ = fs::remove_dir_all(&temp_dir);
}

#[test]
fn missing_file_reports_io_error() {
    let path = std::env::temp_dir().join("ps_fluids_does_not_exist.csv");
    let err = FluidTable::from_csv_path(&path).unwrap_err();
    assert!(matches!(err, FluidError::Io { .. }));
}
