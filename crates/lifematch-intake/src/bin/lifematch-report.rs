//! LifeMatch Report CLI
//!
//! Rank donors for a patient, or patients for a donor, and print the match
//! report.
//!
//! Usage:
//!   lifematch-report --donors <file> --patients <file> --patient <id> [--format csv]
//!   lifematch-report --donors <file> --patients <file> --donor <id> [--now <date>]

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, ValueEnum};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use lifematch_core::models::dates;
use lifematch_core::{EngineConfig, ReportAnchor};
use lifematch_intake::{build_report, load_donors_file, load_patients_file};

#[derive(Parser)]
#[command(name = "lifematch-report")]
#[command(author = "LifeMatch Team")]
#[command(version = "0.1.0")]
#[command(about = "Rank donor-patient matches and print a report", long_about = None)]
struct Cli {
    /// Donor roster (JSON, or semicolon table with .csv/.txt extension)
    #[arg(long)]
    donors: PathBuf,

    /// Patient roster (JSON, or semicolon table with .csv/.txt extension)
    #[arg(long)]
    patients: PathBuf,

    /// Rank donors for this patient id
    #[arg(long, conflicts_with = "donor", required_unless_present = "donor")]
    patient: Option<String>,

    /// Rank patients for this donor id
    #[arg(long)]
    donor: Option<String>,

    /// Engine configuration (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Evaluation instant, RFC 3339 or YYYY-MM-DD (defaults to now)
    #[arg(long)]
    now: Option<String>,

    /// Seed for the simulated distance penalty
    #[arg(long)]
    seed: Option<u64>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Json)]
    format: Format,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Json,
    Csv,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => EngineConfig::default(),
    };

    let now: DateTime<Utc> = match &cli.now {
        Some(raw) => dates::parse_instant(raw).ok_or_else(|| anyhow!("Invalid --now value: {}", raw))?,
        None => Utc::now(),
    };

    let mut rng = match cli.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };

    let donors = load_donors_file(&cli.donors)
        .with_context(|| format!("Failed to load donors from {}", cli.donors.display()))?;
    let patients = load_patients_file(&cli.patients, now.date_naive(), &mut rng)
        .with_context(|| format!("Failed to load patients from {}", cli.patients.display()))?;

    let anchor = match (cli.patient, cli.donor) {
        (Some(id), _) => ReportAnchor::Patient(id),
        (None, Some(id)) => ReportAnchor::Donor(id),
        (None, None) => return Err(anyhow!("Either --patient or --donor is required")),
    };

    let report = build_report(&donors, &patients, &anchor, &config, now, rng)
        .with_context(|| format!("Failed to build report for {}", anchor.id()))?;

    match cli.format {
        Format::Json => println!("{}", report.to_json()?),
        Format::Csv => print!("{}", report.to_csv()),
    }

    Ok(())
}
