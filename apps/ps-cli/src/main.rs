mod units;

use clap::{Parser, Subcommand};
use ps_core::units::{m, rad};
use ps_engine::{
    EngineError, EnginePerformance, NozzleContour, ThermoTable, hoop_stress, sweep_engines,
    write_contour_csv_path, write_sweep_csv,
};
use ps_fluids::{FluidError, FluidTable, filter_builtin_catalog};
use ps_injector::{
    BipropellantSolution, DesignRuleViolation, EmpiricalSolution, InjectorError,
    InjectorSweepParameter, SizedGeometry, StageSolution, TabulatedChart, characteristic_curves,
    size_bipropellant, size_empirical, size_stage, sweep_stage,
};
use ps_project::{DesignFile, ProjectError, load_design};
use serde::Serialize;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;
use units::{LengthUnit, degrees};

#[derive(Parser)]
#[command(name = "ps-cli")]
#[command(about = "Propsize - swirl injector and rocket engine sizing", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a design file
    Validate {
        /// Path to the design YAML or JSON file
        design: PathBuf,
    },
    /// Size the single-stage injector of a design
    Injector {
        design: PathBuf,
        /// Length unit for printed geometry
        #[arg(long, value_enum, default_value = "m")]
        units: LengthUnit,
        /// Print every pass of the hydraulic-loss loop
        #[arg(long)]
        trace: bool,
        /// Print the full solution as JSON
        #[arg(long)]
        json: bool,
    },
    /// Size the nested bipropellant element of a design
    Bipropellant {
        design: PathBuf,
        #[arg(long, value_enum, default_value = "m")]
        units: LengthUnit,
        #[arg(long)]
        trace: bool,
        #[arg(long)]
        json: bool,
    },
    /// Size the chart-driven element of a design
    Empirical {
        design: PathBuf,
        /// Gas-vortex chart CSV (A,R_in_ratio,rbar_m)
        #[arg(long)]
        chart: PathBuf,
        #[arg(long, value_enum, default_value = "m")]
        units: LengthUnit,
        #[arg(long)]
        json: bool,
    },
    /// Run the injector sweep of a design and write CSV
    SweepInjector {
        design: PathBuf,
        /// Output CSV file path (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Size the engine of a design
    Engine {
        design: PathBuf,
        /// Thermochemistry table CSV
        #[arg(long)]
        thermo: PathBuf,
        /// Write the sampled nozzle contour to this CSV file
        #[arg(long)]
        contour: Option<PathBuf>,
        #[arg(long, value_enum, default_value = "m")]
        units: LengthUnit,
        #[arg(long)]
        json: bool,
    },
    /// Run the engine sweep of a design and write CSV
    SweepEngine {
        design: PathBuf,
        #[arg(long)]
        thermo: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Look up a fluid by name or alias
    Fluid {
        name: String,
        /// Extra fluid table: a CSV file or a directory of CSV files
        #[arg(long)]
        table: Option<PathBuf>,
    },
    /// Print swirl characteristic curves mu(phi) as CSV
    Curves {
        /// Geometric characteristic A (repeatable)
        #[arg(long = "a", required = true)]
        a: Vec<f64>,
        /// Samples per curve
        #[arg(long, default_value_t = 50)]
        points: usize,
    },
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error(transparent)]
    Project(#[from] ProjectError),
    #[error(transparent)]
    Injector(#[from] InjectorError),
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error(transparent)]
    Fluid(#[from] FluidError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

type CliResult<T> = Result<T, CliError>;

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { design } => cmd_validate(&design),
        Commands::Injector {
            design,
            units,
            trace,
            json,
        } => cmd_injector(&design, units, trace, json),
        Commands::Bipropellant {
            design,
            units,
            trace,
            json,
        } => cmd_bipropellant(&design, units, trace, json),
        Commands::Empirical {
            design,
            chart,
            units,
            json,
        } => cmd_empirical(&design, &chart, units, json),
        Commands::SweepInjector { design, output } => {
            cmd_sweep_injector(&design, output.as_deref())
        }
        Commands::Engine {
            design,
            thermo,
            contour,
            units,
            json,
        } => cmd_engine(&design, &thermo, contour.as_deref(), units, json),
        Commands::SweepEngine {
            design,
            thermo,
            output,
        } => cmd_sweep_engine(&design, &thermo, output.as_deref()),
        Commands::Fluid { name, table } => cmd_fluid(&name, table.as_deref()),
        Commands::Curves { a, points } => cmd_curves(&a, points),
    }
}

fn base_dir(path: &Path) -> &Path {
    path.parent().unwrap_or_else(|| Path::new("."))
}

fn load_with_fluids(path: &Path) -> CliResult<(DesignFile, FluidTable)> {
    let design = load_design(path)?;
    let fluids = design.fluid_table(base_dir(path))?;
    Ok((design, fluids))
}

fn print_json<T: Serialize>(value: &T) -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_violations(violations: &[DesignRuleViolation]) {
    for v in violations {
        println!("  ! {v}");
    }
}

fn print_geometry(sized: &SizedGeometry, units: LengthUnit) {
    let rows = [
        ("nozzle radius R_n", sized.nozzle_radius),
        ("inlet arm radius R_in", sized.inlet_arm_radius),
        ("inlet passage radius r_in", sized.inlet_passage_radius),
        ("vortex chamber radius R_s", sized.vortex_chamber_radius),
        ("inlet passage length l_in", sized.inlet_passage_length),
        ("nozzle length l_n", sized.nozzle_length),
        ("vortex chamber length l_s", sized.vortex_chamber_length),
    ];
    for (label, value) in rows {
        println!("  {:<28} {}", label, units.show(value));
    }
}

fn cmd_validate(path: &Path) -> CliResult<()> {
    println!("Validating design: {}", path.display());
    let (design, fluids) = load_with_fluids(path)?;

    // Fluid names and sweep bounds are only checked on conversion
    if design.injector.is_some() {
        design.injector_spec(&fluids)?;
    }
    if design.bipropellant.is_some() {
        design.bipropellant_spec(&fluids)?;
    }
    if design.empirical.is_some() {
        design.empirical_spec(&fluids)?;
    }
    if design.injector_sweep.is_some() {
        design.injector_sweep()?;
    }
    println!("✓ Design '{}' is valid", design.name);
    Ok(())
}

fn print_stage(solution: &StageSolution, units: LengthUnit, trace: bool) {
    println!("  converged in {} iterations", solution.iterations);
    println!(
        "  {:<28} {:.3} deg",
        "spray half-angle",
        degrees(solution.spray_half_angle)
    );
    println!(
        "  {:<28} {:.5} / {:.5} / {:.5}",
        "A / phi / mu", solution.geometry.a, solution.geometry.phi, solution.geometry.mu
    );
    println!("  {:<28} {:.5}", "loss coefficient", solution.loss_coefficient);
    print_geometry(&solution.sized, units);
    println!(
        "  {:<28} {:.1} (lambda = {:.5})",
        "inlet Reynolds number", solution.reynolds, solution.friction_factor
    );
    print_violations(&solution.violations);

    if trace {
        println!(
            "\n  {:>4} {:>12} {:>12} {:>9} {:>9} {:>9} {:>14}",
            "iter", "alpha_deg", "Re", "eps_in", "eps", "mu_corr", "R_n"
        );
        for snap in &solution.trace {
            println!(
                "  {:>4} {:>12.6} {:>12.1} {:>9.5} {:>9.5} {:>9.5} {:>14}",
                snap.iteration,
                degrees(rad(snap.next.alpha)),
                snap.reynolds,
                snap.inlet_loss_coefficient,
                snap.loss_coefficient,
                snap.corrected_mu,
                units.show(m(snap.next.nozzle_radius)),
            );
        }
    }
}

fn cmd_injector(path: &Path, units: LengthUnit, trace: bool, json: bool) -> CliResult<()> {
    let (design, fluids) = load_with_fluids(path)?;
    let spec = design.injector_spec(&fluids)?;
    let solution = size_stage(&spec, &design.sizing_config())?;

    if json {
        return print_json(&solution);
    }
    println!("Injector '{}'", design.name);
    print_stage(&solution, units, trace);
    Ok(())
}

fn print_bipropellant(solution: &BipropellantSolution, units: LengthUnit, trace: bool) {
    println!("Inner stage:");
    print_stage(&solution.inner, units, trace);

    let outer = &solution.outer;
    println!("\nOuter stage:");
    println!("  converged in {} iterations", outer.iterations);
    println!(
        "  {:<28} {:.5} / {:.5} / {:.5}",
        "A / phi / mu", outer.geometry.a, outer.geometry.phi, outer.geometry.mu
    );
    print_geometry(&outer.sized, units);
    println!(
        "  {:<28} {:.1} (lambda = {:.5})",
        "inlet Reynolds number", outer.reynolds, outer.friction_factor
    );
    println!("  {:<28} {}", "gas core radius r_mn", units.show(outer.gas_core_radius));
    println!(
        "  {:<28} {:.3} deg",
        "reduced spray half-angle",
        degrees(outer.reduced_spray_half_angle)
    );
    if trace {
        println!("\n  {:>4} {:>14} {:>9} {:>9} {:>12}", "iter", "R_n", "phi", "mu", "change");
        for snap in &outer.trace {
            println!(
                "  {:>4} {:>14} {:>9.5} {:>9.5} {:>12.3e}",
                snap.iteration,
                units.show(m(snap.nozzle_radius)),
                snap.phi,
                snap.mu,
                snap.change
            );
        }
    }

    println!("\nElement:");
    println!("  {:<28} {:.4}", "mass ratio k_m", solution.mass_ratio);
    println!("  {:<28} {}", "mixing length l_mix", units.show(solution.mixing_length));
    println!(
        "  {:<28} {}",
        "nozzle extension dl_n",
        units.show(solution.nozzle_extension)
    );
    println!(
        "  {:<28} {}",
        "outer nozzle length l_n2",
        units.show(solution.outer_nozzle_length)
    );
    print_violations(&solution.violations);
}

fn cmd_bipropellant(path: &Path, units: LengthUnit, trace: bool, json: bool) -> CliResult<()> {
    let (design, fluids) = load_with_fluids(path)?;
    let spec = design.bipropellant_spec(&fluids)?;
    let solution = size_bipropellant(&spec, &design.sizing_config())?;

    if json {
        return print_json(&solution);
    }
    println!("Bipropellant element '{}'", design.name);
    print_bipropellant(&solution, units, trace);
    Ok(())
}

fn print_empirical(solution: &EmpiricalSolution, units: LengthUnit) {
    println!(
        "  {:<28} {:.5} / {:.5}",
        "A / mu (chart)", solution.geometric_parameter, solution.discharge_coefficient
    );
    print_geometry(&solution.sized, units);
    println!("  {:<28} {:.1}", "inlet Reynolds number", solution.reynolds);
    println!(
        "  {:<28} {} (r_m / R_n = {:.4})",
        "gas vortex radius r_m",
        units.show(solution.gas_vortex_radius),
        solution.gas_vortex_ratio
    );
    print_violations(&solution.violations);
}

fn cmd_empirical(path: &Path, chart: &Path, units: LengthUnit, json: bool) -> CliResult<()> {
    let (design, fluids) = load_with_fluids(path)?;
    let spec = design.empirical_spec(&fluids)?;
    let chart = TabulatedChart::from_csv_path(chart)?;
    let solution = size_empirical(&spec, &chart, &design.sizing_config())?;

    if json {
        return print_json(&solution);
    }
    println!("Chart-sized element '{}'", design.name);
    print_empirical(&solution, units);
    Ok(())
}

#[derive(Serialize)]
struct InjectorSweepCsvRow {
    value: f64,
    nozzle_radius_m: Option<f64>,
    inlet_passage_radius_m: Option<f64>,
    vortex_chamber_radius_m: Option<f64>,
    discharge_coefficient: Option<f64>,
    reynolds: Option<f64>,
    iterations: Option<usize>,
    error: Option<String>,
}

fn output_writer(output: Option<&Path>) -> CliResult<Box<dyn Write>> {
    Ok(match output {
        Some(path) => Box::new(std::fs::File::create(path)?),
        None => Box::new(io::stdout()),
    })
}

fn cmd_sweep_injector(path: &Path, output: Option<&Path>) -> CliResult<()> {
    let (design, fluids) = load_with_fluids(path)?;
    let base = design.injector_spec(&fluids)?;
    let (parameter, sweep) = design.injector_sweep()?;
    let result = sweep_stage(&base, parameter, &sweep, &design.sizing_config());
    info!(
        points = result.points.len(),
        failed = result.num_failed(),
        "injector sweep finished"
    );

    let mut wtr = csv::Writer::from_writer(output_writer(output)?);
    for point in &result.points {
        // Report the swept value in the unit it was written in
        let value = match parameter {
            InjectorSweepParameter::SprayHalfAngle => degrees(rad(point.value)),
            InjectorSweepParameter::PressureDrop => point.value,
        };
        let ok = point.outcome.as_ref().ok();
        wtr.serialize(InjectorSweepCsvRow {
            value,
            nozzle_radius_m: ok.map(|s| s.sized.nozzle_radius.value),
            inlet_passage_radius_m: ok.map(|s| s.sized.inlet_passage_radius.value),
            vortex_chamber_radius_m: ok.map(|s| s.sized.vortex_chamber_radius.value),
            discharge_coefficient: ok.map(|s| s.geometry.mu),
            reynolds: ok.map(|s| s.reynolds),
            iterations: ok.map(|s| s.iterations),
            error: point.outcome.as_ref().err().map(|e| e.to_string()),
        })?;
    }
    wtr.flush()?;
    Ok(())
}

fn cmd_engine(
    path: &Path,
    thermo: &Path,
    contour_out: Option<&Path>,
    units: LengthUnit,
    json: bool,
) -> CliResult<()> {
    let design = load_design(path)?;
    let def = design.engine_def()?;
    let table = ThermoTable::from_csv_path(thermo)?;
    let spec = def.to_spec();
    let perf = EnginePerformance::size(&spec, &table)?;

    if let Some(out) = contour_out {
        let contour_spec = def
            .contour
            .as_ref()
            .map(|c| c.to_spec())
            .unwrap_or_default();
        let step = def.contour.as_ref().map_or(5e-3, |c| c.step_m);
        let contour = NozzleContour::from_performance(&perf, &contour_spec)?;
        let points = contour.sample(m(step))?;
        write_contour_csv_path(&points, out)?;
        if !json {
            println!("✓ Wrote {} contour points to {}", points.len(), out.display());
        }
    }

    if json {
        return print_json(&perf);
    }

    println!("Engine '{}' ({}/{})", design.name, spec.fuel, spec.oxidizer);
    println!("  {:<28} {:.1} N", "thrust", perf.thrust.value);
    println!("  {:<28} {:.1} s", "specific impulse", perf.specific_impulse.value);
    println!(
        "  {:<28} {:.1} m/s",
        "characteristic velocity", perf.characteristic_velocity.value
    );
    println!(
        "  {:<28} {:.0} K, gamma {:.4}, M {:.2} kg/kmol",
        "chamber gas",
        perf.properties.chamber_temperature.value,
        perf.properties.gamma,
        perf.properties.molecular_weight
    );
    println!("  {:<28} {}", "throat diameter", units.show(perf.throat_diameter));
    println!("  {:<28} {}", "exit diameter", units.show(perf.exit_diameter));
    println!("  {:<28} {}", "chamber diameter", units.show(perf.chamber_diameter));
    println!("  {:<28} {}", "chamber length", units.show(perf.chamber_length));
    println!("  {:<28} {:.3}", "contraction ratio", perf.contraction_ratio);
    println!("  {:<28} {:.3}", "expansion ratio", perf.properties.area_ratio);
    if let Some(t) = def.wall_thickness_m {
        let sigma = hoop_stress(spec.chamber_pressure, perf.chamber_diameter, m(t))?;
        println!("  {:<28} {:.2} MPa", "chamber hoop stress", sigma.value / 1e6);
    }
    Ok(())
}

fn cmd_sweep_engine(path: &Path, thermo: &Path, output: Option<&Path>) -> CliResult<()> {
    let design = load_design(path)?;
    let sweep = design.engine_sweep()?;
    let table = ThermoTable::from_csv_path(thermo)?;
    let result = sweep_engines(&sweep, &table);
    info!(
        rows = result.rows.len(),
        failed = result.num_failed(),
        "engine sweep finished"
    );
    write_sweep_csv(&result, output_writer(output)?)?;
    if let Some(out) = output {
        println!(
            "✓ Wrote {} rows ({} failed) to {}",
            result.rows.len(),
            result.num_failed(),
            out.display()
        );
    }
    Ok(())
}

fn cmd_fluid(name: &str, table_path: Option<&Path>) -> CliResult<()> {
    let table = match table_path {
        Some(p) if p.is_dir() => FluidTable::from_csv_dir(p)?,
        Some(p) => FluidTable::from_csv_path(p)?,
        None => FluidTable::builtin(),
    };

    let props = match table.lookup(name) {
        Ok(props) => props,
        Err(e) => {
            let suggestions = filter_builtin_catalog(name);
            if !suggestions.is_empty() {
                println!("Did you mean:");
                for entry in suggestions {
                    println!("  {} ({})", entry.display_name, entry.aliases.join(", "));
                }
            }
            return Err(e.into());
        }
    };

    println!("{}", props.name);
    println!("  {:<28} {:.1} kg/m^3", "liquid density", props.rho_liquid_kg_m3);
    println!("  {:<28} {:.2} K", "saturation temperature", props.t_sat_k);
    println!("  {:<28} {:.0} J/kg", "enthalpy of vaporization", props.h_fg_j_per_kg);
    println!(
        "  {:<28} {:.1} J/(kg K)",
        "liquid specific heat", props.c_liquid_j_per_kg_k
    );
    println!("  {:<28} {:.1} J/(kg K)", "vapour specific heat", props.cp_j_per_kg_k);
    Ok(())
}

fn cmd_curves(a_values: &[f64], points: usize) -> CliResult<()> {
    let curves = characteristic_curves(a_values, points);
    let mut wtr = csv::Writer::from_writer(io::stdout());

    let mut header = vec!["phi".to_string()];
    header.extend(curves.iter().map(|c| match c.a {
        Some(a) => format!("mu_A={a}"),
        None => "mu_ideal".to_string(),
    }));
    wtr.write_record(&header)?;

    let n = curves.first().map_or(0, |c| c.phi.len());
    for i in 0..n {
        let mut row = vec![curves[0].phi[i].to_string()];
        row.extend(curves.iter().map(|c| c.mu[i].to_string()));
        wtr.write_record(&row)?;
    }
    wtr.flush()?;
    Ok(())
}
