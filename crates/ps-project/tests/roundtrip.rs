use ps_injector::InjectorSweepParameter;
use ps_project::*;

fn stage() -> StageDef {
    StageDef {
        mass_flow_kg_s: 0.025,
        upstream_pressure_pa: 2.4e6,
        chamber_pressure_pa: 2.0e6,
        density_kg_m3: None,
        fluid: Some("water".to_string()),
        kinematic_viscosity_m2_s: 1e-6,
        spray_half_angle_deg: 60.0,
        inlet_passages: 3,
        inlet_length_ratio: 4.5,
        nozzle_length_ratio: 1.0,
        chamber_length_ratio: 3.0,
        inlet_radius_ratio: Some(1.3),
    }
}

fn full_design() -> DesignFile {
    DesignFile {
        sizing: Some(SizingDef {
            max_iterations: Some(50),
            inlet_loss: Some(InletLossDef::Fixed { coefficient: 0.1 }),
            ..SizingDef::default()
        }),
        injector: Some(stage()),
        injector_sweep: Some(InjectorSweepDef {
            parameter: InjectorSweepParameter::PressureDrop,
            start: 2e5,
            end: 8e5,
            num_points: 4,
            spacing: SweepSpacingDef::Logarithmic,
        }),
        engine: Some(EngineDef {
            fuel: "CH4".to_string(),
            oxidizer: "LOX".to_string(),
            chamber_pressure_pa: 3e6,
            mixture_ratio: 3.0,
            mass_flow_kg_s: 1.5,
            characteristic_length_m: 1.0,
            chamber_diameter_m: 0.08,
            efficiency: 0.95,
            wall_thickness_m: Some(0.003),
            contour: Some(ContourDef {
                chamber_fillet_radius_m: 0.05,
                upstream_throat_radius_m: 0.03,
                downstream_throat_radius_m: 0.025,
                convergence_angle_deg: 30.0,
                divergence_angle_deg: 15.0,
                step_m: 1e-3,
            }),
        }),
        engine_sweep: Some(EngineSweepDef {
            fuels: OneOrMany::Many(vec!["CH4".to_string(), "RP1".to_string()]),
            oxidizers: OneOrMany::One("LOX".to_string()),
            mixture_ratios: OneOrMany::Many(vec![2.5, 3.0]),
            chamber_pressures_pa: OneOrMany::One(3e6),
            mass_flows_kg_s: OneOrMany::One(1.0),
            efficiencies: OneOrMany::One(1.0),
            characteristic_length_m: 1.0,
            chamber_diameter_m: 0.08,
            contour: None,
        }),
        ..DesignFile::new("Round trip")
    }
}

#[test]
fn roundtrip_yaml() {
    let design = full_design();
    let path = std::env::temp_dir().join("ps_project_roundtrip.yaml");

    save_yaml(&path, &design).unwrap();
    let loaded = load_yaml(&path).unwrap();
    assert_eq!(design, loaded);
    std::fs::remove_file(&path).ok();
}

#[test]
fn roundtrip_json() {
    let design = full_design();
    let path = std::env::temp_dir().join("ps_project_roundtrip.json");

    save_json(&path, &design).unwrap();
    let loaded = load_design(&path).unwrap();
    assert_eq!(design, loaded);
    std::fs::remove_file(&path).ok();
}

#[test]
fn scalar_or_list_fields_accept_both_forms() {
    let yaml = r#"
version: 1
name: sweep
engine_sweep:
  fuels: CH4
  oxidizers: [LOX]
  mixture_ratios: [2.5, 3.0, 3.5]
  chamber_pressures_pa: 3000000.0
  mass_flows_kg_s: [1.0, 2.0]
  characteristic_length_m: 1.0
  chamber_diameter_m: 0.08
"#;
    let design: DesignFile = serde_yaml::from_str(yaml).unwrap();
    validate_design(&design).unwrap();
    let sweep = design.engine_sweep().unwrap();
    assert_eq!(sweep.fuels, vec!["CH4".to_string()]);
    assert_eq!(sweep.efficiencies, vec![1.0]);
    assert_eq!(sweep.specs().len(), 6);
}

#[test]
fn invalid_file_is_rejected_on_save() {
    let mut design = full_design();
    if let Some(engine) = design.engine.as_mut() {
        engine.efficiency = 1.5;
    }
    let path = std::env::temp_dir().join("ps_project_invalid.yaml");
    let err = save_yaml(&path, &design).unwrap_err();
    assert!(matches!(err, ProjectError::Validation(_)));
    assert!(err.to_string().contains("engine.efficiency"));
}

#[test]
fn malformed_yaml_is_a_yaml_error() {
    let path = std::env::temp_dir().join("ps_project_malformed.yaml");
    std::fs::write(&path, "version: [1\nname: x\n").unwrap();
    assert!(matches!(load_yaml(&path), Err(ProjectError::Yaml(_))));
    std::fs::remove_file(&path).ok();
}
