//! Ask command - interactive question loop

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::error;

use crate::domain::answer_cache::AnswerCacheStats;
use crate::domain::qa::{ChatHistory, QaError};
use crate::infrastructure::services::QaSession;

const EXIT_COMMANDS: &[&str] = &["exit", "quit"];
const HISTORY_COMMAND: &str = "/history";

/// Arguments for the ask command
#[derive(Args, Clone)]
pub struct AskArgs {
    /// JSON array of pre-split documents (`content`, `source`, optional `lastmod`)
    #[arg(long)]
    pub corpus: PathBuf,

    /// Print generated answers only once they are complete
    #[arg(long)]
    pub no_stream: bool,
}

/// Read questions from stdin until EOF or `exit`; `/history` prints the
/// conversation so far
pub async fn run(args: AskArgs) -> anyhow::Result<()> {
    let session = super::prepare_session(&args.corpus).await?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("Question: ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            println!();
            break;
        };

        let question = line.trim();

        if question.is_empty() {
            continue;
        }

        if EXIT_COMMANDS.contains(&question.to_lowercase().as_str()) {
            break;
        }

        if question == HISTORY_COMMAND {
            println!("{}", format_history(&session.history().await));
            continue;
        }

        let result = if args.no_stream {
            session.ask(question).await.map(|answer| println!("\n{}\n", answer))
        } else {
            ask_streaming(&session, question).await
        };

        if let Err(e) = result {
            error!(error = %e, "Failed to answer question");
            eprintln!("Error: {}\n", e);
        }
    }

    let stats = session.cache().stats().await?;
    println!("{}", format_stats(&stats));

    Ok(())
}

/// Print tokens as they arrive; cache hits are printed whole with their marker
async fn ask_streaming(session: &QaSession, question: &str) -> Result<(), QaError> {
    println!();

    let mut streamed = false;
    let answer = session
        .ask_streaming(question, &mut |token: &str| {
            streamed = true;
            print!("{}", token);
            let _ = std::io::stdout().flush();
        })
        .await?;

    if streamed {
        println!("\n");
    } else {
        println!("{}\n", answer);
    }

    Ok(())
}

fn format_history(history: &ChatHistory) -> String {
    if history.is_empty() {
        return "No questions asked yet.".to_string();
    }

    history
        .turns()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_stats(stats: &AnswerCacheStats) -> String {
    format!(
        "Cached answers: {} | exact hits: {} | similar hits: {} | misses: {} | hit rate: {:.0}%",
        stats.entries,
        stats.exact_hits,
        stats.similar_hits,
        stats.misses,
        stats.hit_rate() * 100.0
    )
}
