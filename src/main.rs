use clap::Parser;
use semantic_answer_cache::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Ask(args) => cli::ask::run(args).await,
        Command::Query(args) => cli::query::run(args).await,
        Command::Quiz(args) => cli::quiz::run(args).await,
    }
}
