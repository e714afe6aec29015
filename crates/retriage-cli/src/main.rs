mod commands;
mod logging;
mod progress;

use std::path::PathBuf;
use std::process;

use clap::{CommandFactory, Parser};
use colored::*;
use commands::{Cli, Commands, ModeArg};
use dotenv::dotenv;
use progress::CliReporter;
use retriage_core::{
    batch, report, scanner, AppConfig, ClassificationEngine, Determination, FileDescriptor,
    FileStatus, RunMode,
};
use tracing::{error, info};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    let _guard = logging::init_logger();

    let config = match retriage_core::config::load_configuration() {
        Ok(config) => config,
        Err(err) => {
            error!("Error loading configuration: {}", err);
            process::exit(1);
        }
    };

    let args = Cli::parse();

    match args.command {
        Some(Commands::Classify {
            path,
            mode,
            csv,
            json,
        }) => {
            if let Err(err) = run_classify(&config, path, mode, csv, json) {
                error!("Error: {}", err);
            }
        }
        Some(Commands::Scan { path }) => {
            if let Err(err) = run_scan(&config, path) {
                error!("Error: {}", err);
            }
        }
        Some(Commands::PrintConfig) => {
            println!("Configuration: {:#?}", config);
        }
        None => {
            let _ = Cli::command().print_long_help();
        }
    }

    Ok(())
}

fn resolve_roots(config: &AppConfig, path: Option<PathBuf>) -> Result<Vec<PathBuf>, String> {
    match path {
        Some(path) => Ok(vec![path]),
        None if config.root_paths.is_empty() => {
            Err("no path given and no root_paths configured".to_string())
        }
        None => Ok(config.root_paths.iter().map(PathBuf::from).collect()),
    }
}

fn scan_roots(
    config: &AppConfig,
    roots: &[PathBuf],
) -> Result<Vec<FileDescriptor>, Box<dyn std::error::Error>> {
    let mut descriptors = Vec::new();
    for root in roots {
        info!("Scanning directory: {}", root.display());
        descriptors.extend(scanner::scan_directory(root, &config.ignore_patterns)?);
    }
    Ok(descriptors)
}

fn run_classify(
    config: &AppConfig,
    path: Option<PathBuf>,
    mode: ModeArg,
    csv: Option<PathBuf>,
    json: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let roots = resolve_roots(config, path)?;
    let descriptors = scan_roots(config, &roots)?;
    info!("{} files discovered", descriptors.len());

    // The composition root owns the one engine instance for this run.
    let engine = ClassificationEngine::new(config.engine.clone(), config.policy.clone());
    info!("Classification backend: {}", engine.backend_name());

    let run_mode: RunMode = mode.into();
    let reporter = CliReporter::new();
    let results = batch::classify_all(&engine, descriptors, run_mode, &reporter);

    let count_of = |d: Determination| {
        results
            .iter()
            .filter(|r| r.model_determination == d)
            .count()
    };
    let errors = results
        .iter()
        .filter(|r| r.status == FileStatus::Error)
        .count();

    println!();
    info!(
        "KEEP: {}, DESTROY: {}, TRANSITORY: {}, NA: {}, errors: {}",
        format!("{}", count_of(Determination::Keep)).green(),
        format!("{}", count_of(Determination::Destroy)).red(),
        format!("{}", count_of(Determination::Transitory)).yellow(),
        format!("{}", count_of(Determination::Na)).cyan(),
        format!("{}", errors).red(),
    );

    if let Some(csv_path) = csv {
        let rows = report::write_csv(&csv_path, &results)?;
        info!("{} rows exported to {}", rows, csv_path.display());
    }
    if let Some(json_path) = json {
        let rows = report::write_json(&json_path, &results)?;
        info!("{} rows exported to {}", rows, json_path.display());
    }

    Ok(())
}

fn run_scan(config: &AppConfig, path: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let roots = resolve_roots(config, path)?;
    let descriptors = scan_roots(config, &roots)?;

    let counts = scanner::count_categories(&descriptors, &config.policy);
    info!(
        "{} files: {} to destroy, {} to analyze, {} skipped",
        counts.total,
        format!("{}", counts.destroy).red(),
        format!("{}", counts.analyze).green(),
        format!("{}", counts.skip).cyan(),
    );

    Ok(())
}
