//! Query command - answers one question and exits

use std::path::PathBuf;

use clap::Args;

/// Arguments for the query command
#[derive(Args, Clone)]
pub struct QueryArgs {
    /// JSON array of pre-split documents (`content`, `source`, optional `lastmod`)
    #[arg(long)]
    pub corpus: PathBuf,

    /// Question to answer
    pub question: String,
}

/// Answer a single question
pub async fn run(args: QueryArgs) -> anyhow::Result<()> {
    let session = super::prepare_session(&args.corpus).await?;

    let answer = session.ask(&args.question).await?;
    println!("{}", answer);

    Ok(())
}
