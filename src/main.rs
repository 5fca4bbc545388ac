//! Evaluate a JSON request file and print a JSON report.
//!
//! Usage:
//!   healthrevo <request.json> [--config <config.json>] [--interactions <rows.json>]
//!              [--interaction-db <interactions.db>] [--pretty]

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::NaiveDateTime;
use clap::Parser;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use healthrevo_core::alerts::AlertFilter;
use healthrevo_core::config::{ConfigError, EngineConfig};
use healthrevo_core::engine::{ClinicalEngine, EngineError, IngestOutcome, PrescriptionReview};
use healthrevo_core::medication::knowledge::records_from_rows;
use healthrevo_core::medication::{
    InteractionKnowledgeBase, InteractionTable, KnowledgeBaseError, SqliteInteractionStore,
};
use healthrevo_core::models::{Alert, Medication, RiskScore, VitalsReading};

#[derive(Parser)]
#[command(name = "healthrevo")]
#[command(version)]
#[command(about = "Screen vitals, score risk and review prescriptions for one patient", long_about = None)]
struct Cli {
    /// Request file (JSON)
    request: PathBuf,

    /// Engine configuration file; overrides the request's `config`
    #[arg(long)]
    config: Option<PathBuf>,

    /// Extra interaction rows (JSON array) merged into the knowledge base
    #[arg(long)]
    interactions: Option<PathBuf>,

    /// SQLite interaction database to use instead of the in-memory table
    #[arg(long)]
    interaction_db: Option<PathBuf>,

    /// Pretty-print the report
    #[arg(long)]
    pretty: bool,
}

#[derive(Debug, Deserialize)]
struct Request {
    patient_id: i64,
    #[serde(default)]
    config: Option<EngineConfig>,
    /// Reference time for windowing and alert stamps; defaults to now.
    #[serde(default)]
    now: Option<NaiveDateTime>,
    #[serde(default)]
    reading: Option<VitalsReading>,
    #[serde(default)]
    history: Vec<VitalsReading>,
    #[serde(default)]
    prescription_text: Option<String>,
    #[serde(default)]
    medications: Option<Vec<Medication>>,
    /// Loose interaction rows, same shape as the import format.
    #[serde(default)]
    interactions: Vec<serde_json::Value>,
}

#[derive(Debug, Serialize)]
struct Report {
    patient_id: i64,
    generated_at: NaiveDateTime,
    screening: Vec<Alert>,
    ingestion: Option<IngestOutcome>,
    risk: Vec<RiskScore>,
    prescription: Option<PrescriptionReview>,
    /// Every alert raised for the patient in this run, priority-sorted.
    alerts: Vec<Alert>,
}

#[derive(Error, Debug)]
enum CliError {
    #[error("Request file {0} could not be read: {1}")]
    Read(String, String),

    #[error("Request file {0} could not be parsed: {1}")]
    Parse(String, String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    KnowledgeBase(#[from] KnowledgeBaseError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("Report could not be serialised: {0}")]
    Output(#[from] serde_json::Error),
}

fn main() -> ExitCode {
    healthrevo_core::init_tracing();
    let cli = Cli::parse();

    match execute(&cli) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Request failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn execute(cli: &Cli) -> Result<String, CliError> {
    let request = load_request(&cli.request)?;
    let config = resolve_config(cli, &request)?;

    let mut rows = records_from_rows(&request.interactions);
    if let Some(path) = &cli.interactions {
        rows.extend(InteractionTable::load_json(path)?.records().iter().cloned());
    }

    let report = match &cli.interaction_db {
        Some(path) => {
            let store = SqliteInteractionStore::open(path)?;
            if !rows.is_empty() {
                store.import(&rows, false)?;
            }
            evaluate(ClinicalEngine::new(config, store)?, &request)?
        }
        None => evaluate(
            ClinicalEngine::new(config, InteractionTable::from_records(rows))?,
            &request,
        )?,
    };

    let output = if cli.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    Ok(output)
}

fn load_request(path: &Path) -> Result<Request, CliError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| CliError::Read(path.display().to_string(), e.to_string()))?;
    serde_json::from_str(&raw)
        .map_err(|e| CliError::Parse(path.display().to_string(), e.to_string()))
}

/// `--config` file, then the request's own `config`, then the environment.
fn resolve_config(cli: &Cli, request: &Request) -> Result<EngineConfig, CliError> {
    if let Some(path) = &cli.config {
        return Ok(EngineConfig::from_json_file(path)?);
    }
    if let Some(config) = &request.config {
        config.validate()?;
        return Ok(config.clone());
    }
    Ok(EngineConfig::from_env()?)
}

fn evaluate<K: InteractionKnowledgeBase>(
    engine: ClinicalEngine<K>,
    request: &Request,
) -> Result<Report, EngineError> {
    let now = request
        .now
        .unwrap_or_else(|| chrono::Local::now().naive_local());
    let patient_id = request.patient_id;

    let (screening, ingestion) = match &request.reading {
        Some(reading) => (
            engine.screen_reading_at(patient_id, reading, &request.history, now)?,
            Some(engine.ingest_reading_at(patient_id, reading, now)?),
        ),
        None => (Vec::new(), None),
    };

    let mut window = request.history.clone();
    if let Some(outcome) = &ingestion {
        window.push(outcome.reading.clone());
    }
    let risk = engine.assess_risk(&window, now);

    let medications = match (&request.medications, &request.prescription_text) {
        (Some(meds), _) => Some(meds.clone()),
        (None, Some(text)) => Some(healthrevo_core::medication::parse_prescription_text(text)),
        (None, None) => None,
    };
    let prescription = medications
        .map(|meds| engine.review_medications_at(patient_id, meds, now))
        .transpose()?;

    let alerts = engine.alerts().list(&AlertFilter::for_patient(patient_id))?;

    Ok(Report {
        patient_id,
        generated_at: now,
        screening,
        ingestion,
        risk,
        prescription,
        alerts,
    })
}
