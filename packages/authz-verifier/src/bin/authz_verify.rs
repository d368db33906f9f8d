//! Authorization verifier CLI
//!
//! # Usage
//!
//! ```bash
//! # Verify every entry point of a program model
//! authz-verify program.json
//!
//! # Custom configuration, JSON report
//! authz-verify program.yaml --config authz.yaml --format json
//!
//! # Selected entry points only, with debug logging
//! authz-verify program.json --entry Api.GetSecret --entry Api.Delete -vv
//! ```
//!
//! Exits with status 1 when any error-severity diagnostic is reported and 2
//! when the model or configuration cannot be loaded.

use authz_verifier::config::{Preset, VerifierConfig};
use authz_verifier::pipeline::{AuthzVerifier, VerificationReport};
use authz_verifier::shared::models::{MethodId, ProgramModel};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "authz-verify")]
#[command(about = "Prove permission checks dominate authorization-sensitive calls", long_about = None)]
struct Cli {
    /// Program model (JSON, or YAML by extension)
    model: PathBuf,

    /// Configuration file (YAML, `version: 1`)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Preset used when no configuration file is given
    #[arg(long, default_value = "balanced")]
    preset: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Entry point to verify (`Type.Method`); repeatable
    #[arg(short, long = "entry")]
    entries: Vec<String>,

    /// Verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(report) => {
            if report.has_errors() {
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("authz-verify: {}", e);
            std::process::exit(2);
        }
    }
}

fn run(cli: &Cli) -> Result<VerificationReport, Box<dyn std::error::Error>> {
    let config = match &cli.config {
        Some(path) => VerifierConfig::from_yaml_file(path)?,
        None => VerifierConfig::preset(Preset::from_str(&cli.preset)?),
    };
    let program = ProgramModel::load(&cli.model)?;
    let verifier = AuthzVerifier::new(config);

    let report = if cli.entries.is_empty() {
        verifier.verify(&program)?
    } else {
        let entries = cli
            .entries
            .iter()
            .map(|e| {
                MethodId::parse(e).ok_or_else(|| format!("Invalid entry point '{}', expected Type.Method", e))
            })
            .collect::<Result<Vec<_>, _>>()?;
        verifier.verify_entries(&program, &entries)?
    };

    match cli.format {
        OutputFormat::Json => println!("{}", report.to_json()?),
        OutputFormat::Text => print_text(&report),
    }

    Ok(report)
}

fn print_text(report: &VerificationReport) {
    for diagnostic in &report.diagnostics {
        println!("{}", diagnostic);
    }
    println!(
        "{} error(s), {} warning(s) across {} entry point(s)",
        report.error_count(),
        report.warning_count(),
        report.entry_points.len()
    );
}
