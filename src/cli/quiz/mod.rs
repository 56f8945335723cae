//! Quiz command - multiple-choice quiz over the corpus

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::domain::quiz::{Difficulty, QuizQuestion};

/// Arguments for the quiz command
#[derive(Args, Clone)]
pub struct QuizArgs {
    /// JSON array of pre-split documents (`content`, `source`, optional `lastmod`)
    #[arg(long)]
    pub corpus: PathBuf,

    /// Build the quiz from the passages closest to this topic instead of the
    /// whole corpus
    #[arg(long)]
    pub topic: Option<String>,

    /// easy or hard
    #[arg(long, default_value = "easy")]
    pub difficulty: Difficulty,
}

/// Generate a quiz, ask every question on stdin and print the score
pub async fn run(args: QuizArgs) -> anyhow::Result<()> {
    let (config, documents) = super::prepare(&args.corpus).await?;

    println!("Generating quiz...");
    let quiz =
        crate::generate_quiz(&config, documents, args.topic.as_deref(), args.difficulty).await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut selections = Vec::with_capacity(quiz.questions.len());

    for (idx, question) in quiz.questions.iter().enumerate() {
        println!("\n{}", format_question(idx, question));
        print!("Your answer: ");
        std::io::stdout().flush()?;

        let line = lines.next_line().await?.unwrap_or_default();
        selections.push(parse_choice(&line, question.answers.len()));
    }

    let score = quiz.score(&selections);
    println!("\n{}", score);

    if score.is_perfect() {
        println!("Perfect score! Great job!");
    }

    Ok(())
}

fn format_question(idx: usize, question: &QuizQuestion) -> String {
    let options: Vec<String> = question
        .answers
        .iter()
        .enumerate()
        .map(|(i, a)| format!("  {}) {}", i + 1, a.answer))
        .collect();

    format!("{}. {}\n{}", idx + 1, question.question, options.join("\n"))
}

/// 1-based option number typed by the user, as a 0-based index
fn parse_choice(input: &str, options: usize) -> Option<usize> {
    input
        .trim()
        .parse::<usize>()
        .ok()
        .filter(|n| (1..=options).contains(n))
        .map(|n| n - 1)
}
