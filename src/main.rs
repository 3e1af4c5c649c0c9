mod cli;
mod config;
mod error;
mod index;
mod owner;
mod proximity;
mod rating;
mod report;
mod survey;
mod types;

use crate::error::{Result, ScoreError};
use crate::types::config::{ScoringConfig, TransitFlow};
use crate::types::measurement::{ContextFile, LocationContext};
use crate::types::report::{AttractivenessReport, LocationSummary};
use crate::types::scoring::Tier;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const UNFAVORABLE: i32 = 1;
    pub const INVALID_INPUT: i32 = 2;
    pub const RUNTIME_FAILURE: i32 = 3;
}

fn init_tracing(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, _) => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn config_root(explicit: Option<&Path>, input: Option<&Path>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .or_else(|| {
            input
                .and_then(Path::parent)
                .filter(|parent| !parent.as_os_str().is_empty())
                .map(Path::to_path_buf)
        })
        .unwrap_or_else(|| PathBuf::from("."))
}

fn require_file(path: &Path) -> Result<()> {
    if !path.is_file() {
        return Err(ScoreError::PathNotFound(path.display().to_string()));
    }
    Ok(())
}

fn read_context(path: &Path) -> Result<LocationContext> {
    let content = std::fs::read_to_string(path)?;
    let file: ContextFile = toml::from_str(&content)
        .map_err(|e| ScoreError::invalid_measurement(&path.display().to_string(), e.to_string()))?;
    LocationContext::try_from(file)
}

fn assess(context: &LocationContext, config: &ScoringConfig) -> Result<AttractivenessReport> {
    let ratings = rating::rate(context, config)?;
    let index = index::compose(&ratings, &config.index);
    let badges = index::badges(&ratings, &config.index);
    let city = context
        .city
        .clone()
        .unwrap_or_else(|| config.profile_for_department(context.department).name);
    let location = LocationSummary {
        city,
        department: context.department,
        coordinates: context.coordinates,
        iris: context.iris.clone(),
    };
    Ok(AttractivenessReport::new(location, ratings, index, badges))
}

fn emit(report: &AttractivenessReport, format: &cli::ReportFormat, strict: bool) -> Result<i32> {
    let output_format = match format {
        cli::ReportFormat::Json => report::OutputFormat::Json,
        cli::ReportFormat::Md => report::OutputFormat::Md,
    };
    println!("{}", report::render(report, output_format)?);

    if strict && report.index.tier == Tier::Unfavorable {
        Ok(exit_code::UNFAVORABLE)
    } else {
        Ok(exit_code::SUCCESS)
    }
}

fn run(cli: cli::Cli) -> Result<i32> {
    let config_dir = cli.config_dir.as_deref();
    match cli.command {
        cli::Commands::Score(cmd) => {
            require_file(&cmd.path)?;
            let config = config::load_config(&config_root(config_dir, Some(&cmd.path)))?;
            let context = read_context(&cmd.path)?;
            let report = assess(&context, &config)?;
            emit(&report, &cmd.format, cmd.strict)
        }
        cli::Commands::Survey(cmd) => {
            require_file(&cmd.path)?;
            let base_dir = config_root(None, Some(&cmd.path));
            let config = config::load_config(&config_root(config_dir, Some(&cmd.path)))?;
            let file = survey::load_survey(&cmd.path)?;
            let context = survey::build_context(&file, &base_dir, &config)?;
            let report = assess(&context, &config)?;
            emit(&report, &cmd.format, cmd.strict)
        }
        cli::Commands::Cities => {
            let config = config::load_config(&config_root(config_dir, None))?;
            println!("cities:");
            for city in &config.cities {
                let coefficients = config.coefficients(city);
                let flow = match city.transit_flow {
                    TransitFlow::Validations { high, medium } => {
                        format!("validations >= {high} / >= {medium}")
                    }
                    TransitFlow::Unavailable => "unavailable".to_string(),
                    TransitFlow::Absent => "none".to_string(),
                };
                println!(
                    "- {} ({}): bar_max={} bar_mid={} mall={}, transit flow: {}",
                    city.name,
                    city.department,
                    coefficients.bar_max,
                    coefficients.bar_mid,
                    coefficients.mall,
                    flow
                );
            }
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Owner(cmd) => {
            require_file(&cmd.dataset)?;
            let records: Vec<owner::OwnerRecord> = survey::dataset::load(&cmd.dataset)?;
            let found = owner::search(&records, &cmd.street, &cmd.number, cmd.owner.as_deref());

            match found.candidates.split_first() {
                Some((best, others)) => {
                    println!("street: {} ({:.0}% match)", best.street, best.score);
                    for other in others {
                        println!("  also close: {} ({:.0}% match)", other.street, other.score);
                    }
                }
                None => println!(
                    "street: no match for \"{}\"",
                    owner::normalize_street(&cmd.street)
                ),
            }
            if found.owners.len() > 1 {
                println!("owners:");
                for record in &found.owners {
                    println!(
                        "- {} (siren {})",
                        record.denomination,
                        record.siren.as_deref().unwrap_or("n/a")
                    );
                }
            }
            println!("owner: {}", found.lookup);
            Ok(exit_code::SUCCESS)
        }
    }
}

fn main() {
    let cli = cli::Cli::parse();
    init_tracing(cli.verbose, cli.quiet);
    match run(cli) {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
        }
        Err(e) => {
            eprintln!("error: {}", e);
            let code = if e.is_validation() {
                exit_code::INVALID_INPUT
            } else {
                exit_code::RUNTIME_FAILURE
            };
            std::process::exit(code);
        }
    }
}
