mod error;
mod run_service;

use clap::{Parser, Subcommand};
use dfn_project::{compile_case, load_case};
use dfn_results::{DirectionRecord, RunRecord};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use crate::error::AppResult;
use crate::run_service::RunOptions;

#[derive(Parser)]
#[command(name = "dfn-cli")]
#[command(about = "Steady thermohydraulic model of discrete fracture networks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a case file and build its network
    Validate {
        /// Path to the case file (JSON or YAML)
        case_path: PathBuf,
    },
    /// Solve a case and print flows and temperatures
    Solve {
        /// Path to the case file (JSON or YAML)
        case_path: PathBuf,
        /// Store the run next to the case file
        #[arg(long)]
        store: bool,
        /// Solve again even if a stored run exists
        #[arg(long)]
        no_cache: bool,
        /// Print the run record as JSON
        #[arg(long)]
        json: bool,
    },
    /// List stored runs for a case
    Runs {
        /// Path to the case file (JSON or YAML)
        case_path: PathBuf,
    },
    /// Show a stored run
    ShowRun {
        /// Path to the case file (JSON or YAML)
        case_path: PathBuf,
        /// Run ID to display
        run_id: String,
        /// Print the run record as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { case_path } => cmd_validate(&case_path),
        Commands::Solve {
            case_path,
            store,
            no_cache,
            json,
        } => cmd_solve(
            &case_path,
            RunOptions {
                store,
                use_cache: !no_cache,
            },
            json,
        ),
        Commands::Runs { case_path } => cmd_runs(&case_path),
        Commands::ShowRun {
            case_path,
            run_id,
            json,
        } => cmd_show_run(&case_path, &run_id, json),
    }
}

fn cmd_validate(case_path: &Path) -> AppResult<()> {
    println!("Validating case: {}", case_path.display());
    let case = load_case(case_path)?;
    let compiled = compile_case(&case)?;
    println!("✓ Case is valid");
    println!(
        "  {} junctions, {} fractures",
        compiled.network.junction_count(),
        compiled.network.fracture_count()
    );
    Ok(())
}

fn cmd_solve(case_path: &Path, options: RunOptions, json: bool) -> AppResult<()> {
    let response = run_service::ensure_run(case_path, options)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&response.record)?);
        return Ok(());
    }

    println!("Case: {}", response.case.name);
    if let Some(manifest) = &response.manifest {
        if response.loaded_from_cache {
            println!("✓ Loaded from cache: {}", manifest.run_id);
        } else {
            println!("✓ Stored run: {}", manifest.run_id);
        }
    }
    print_record(&response.record);
    Ok(())
}

fn cmd_runs(case_path: &Path) -> AppResult<()> {
    let runs = run_service::list_runs(case_path)?;

    if runs.is_empty() {
        println!("No stored runs for {}", case_path.display());
    } else {
        println!("Stored runs:");
        for manifest in runs {
            println!(
                "  {} ({}, solver {})",
                manifest.run_id, manifest.timestamp, manifest.solver_version
            );
        }
    }
    Ok(())
}

fn cmd_show_run(case_path: &Path, run_id: &str, json: bool) -> AppResult<()> {
    let (manifest, record) = run_service::load_run(case_path, run_id)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
        return Ok(());
    }

    println!("Run {}", manifest.run_id);
    println!("  Case: {}", manifest.case_name);
    println!("  Timestamp: {}", manifest.timestamp);
    println!("  Solver: {}", manifest.solver_version);
    print_record(&record);
    Ok(())
}

fn print_record(record: &RunRecord) {
    println!("\nFractures:");
    println!(
        "  {:>4} {:>6} {:>6} {:>14} {:>9} {:>12} {:>12}",
        "#", "from", "to", "flow", "dir", "T_in", "T_out"
    );
    for f in &record.fractures {
        let direction = match f.direction {
            DirectionRecord::Forward => "→",
            DirectionRecord::Reverse => "←",
            DirectionRecord::Stagnant => "-",
        };
        println!(
            "  {:>4} {:>6} {:>6} {:>14.6e} {:>9} {:>12} {:>12}",
            f.index,
            f.from,
            f.to,
            f.flow_rate,
            direction,
            fmt_temperature(f.inlet_temperature),
            fmt_temperature(f.outlet_temperature)
        );
    }

    println!("\nJunctions:");
    println!(
        "  {:>6} {:>14} {:>12} {:>14}",
        "label", "pressure", "T", "boundary flow"
    );
    for j in &record.junctions {
        println!(
            "  {:>6} {:>14.6e} {:>12} {:>14.6e}",
            j.label,
            j.pressure,
            fmt_temperature(j.temperature),
            j.boundary_flow
        );
    }

    println!();
    if let Some(t) = record.production_temperature {
        println!("Production temperature: {t:.4}");
    }
    println!("Heat extraction rate:   {:.6e}", record.heat_extraction_rate);
}

fn fmt_temperature(t: Option<f64>) -> String {
    t.map_or_else(|| "-".to_string(), |t| format!("{t:.4}"))
}
