//! CLI module for the semantic answer cache
//!
//! Provides subcommands for answering questions over a JSON corpus:
//! - `ask`: interactive question loop on stdin
//! - `query`: answer a single question
//! - `quiz`: multiple-choice quiz generated from the corpus

pub mod ask;
pub mod query;
pub mod quiz;

use std::path::Path;

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::domain::retrieval::{parse_corpus, ContextDocument};
use crate::infrastructure::logging;
use crate::infrastructure::services::QaSession;

/// Cached document question answering
#[derive(Parser)]
#[command(name = "semantic-answer-cache")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Answer questions interactively, reusing cached answers
    Ask(ask::AskArgs),

    /// Answer a single question
    Query(query::QueryArgs),

    /// Take a multiple-choice quiz generated from the corpus
    Quiz(quiz::QuizArgs),
}

/// Load configuration, initialise logging and read the corpus
async fn prepare(corpus: &Path) -> anyhow::Result<(AppConfig, Vec<ContextDocument>)> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;
    logging::init_logging(&config.logging);

    let documents = read_corpus(corpus).await?;

    Ok((config, documents))
}

/// Build a session over the corpus
async fn prepare_session(corpus: &Path) -> anyhow::Result<QaSession> {
    let (config, documents) = prepare(corpus).await?;

    crate::create_session(&config, documents).await
}

async fn read_corpus(path: &Path) -> anyhow::Result<Vec<ContextDocument>> {
    let json = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read corpus {}", path.display()))?;

    let documents = parse_corpus(&json)?;

    if documents.is_empty() {
        anyhow::bail!("Corpus {} contains no documents", path.display());
    }

    Ok(documents)
}
