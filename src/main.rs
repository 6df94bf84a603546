//! adaptive-triage - Replays a recorded case through the triage engine.
//!
//! Reads a JSON array of `{"question_id": ..., "value": ...}` answers, applies
//! them in order until the engine can finish, and prints the session summary
//! as JSON.

use anyhow::{Context, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use adaptive_triage::adapters::InMemorySessionStore;
use adaptive_triage::application::{RegisterAnswerCommand, TriageService};
use adaptive_triage::config::AppConfig;
use adaptive_triage::domain::catalog::AnswerValue;
use adaptive_triage::domain::foundation::QuestionId;
use adaptive_triage::domain::triage::TriageSummary;
use adaptive_triage::ports::CatalogSource;

#[derive(Debug, Parser)]
#[command(name = "adaptive-triage", version, about = "Replay a triage case file")]
struct Cli {
    /// JSON case file: [{"question_id": "...", "value": ...}, ...]
    case: PathBuf,

    /// Keep applying answers after the engine could finish
    #[arg(long)]
    all: bool,

    /// Pretty-print the summary
    #[arg(long)]
    pretty: bool,
}

#[derive(Debug, Deserialize)]
struct CaseAnswer {
    question_id: String,
    value: AnswerValue,
}

#[derive(Debug, Serialize)]
struct CaseReport {
    summary: TriageSummary,
    next_question: Option<QuestionId>,
    answers_applied: usize,
    answers_skipped: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;
    init_tracing(&config);

    let source = config.catalog.source();
    let catalog = source
        .load()
        .await
        .with_context(|| format!("Failed to load catalog from {}", source.describe()))?;
    info!(catalog = %source.describe(), questions = catalog.len(), "catalog loaded");

    let text = tokio::fs::read_to_string(&cli.case)
        .await
        .with_context(|| format!("Failed to read case file {}", cli.case.display()))?;
    let answers: Vec<CaseAnswer> = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse case file {}", cli.case.display()))?;

    let service = TriageService::new(
        Arc::new(InMemorySessionStore::new()),
        catalog,
        config.engine.post_emergency,
    );
    let session_id = service.start_session().await?;

    let total = answers.len();
    let mut applied = 0;
    for answer in answers {
        let outcome = service
            .register_answer(RegisterAnswerCommand {
                session_id,
                question_id: answer.question_id.clone(),
                value: answer.value,
            })
            .await
            .with_context(|| format!("Answer to '{}' was rejected", answer.question_id))?;
        applied += 1;
        if outcome.can_finish && !cli.all {
            break;
        }
    }

    let report = CaseReport {
        summary: service.summary(&session_id).await?,
        next_question: service
            .get_next_question(&session_id)
            .await?
            .map(|q| q.id),
        answers_applied: applied,
        answers_skipped: total - applied,
    };
    service.close_session(&session_id).await?;

    let json = if cli.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{}", json);
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(config.logging.env_filter())
        .with_writer(std::io::stderr);
    if config.logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}
