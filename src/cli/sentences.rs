//! CLI entry-point for exporting sentences to the dependency parser.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args as ClapArgs;
use tracing::instrument;

use crate::{config::Settings, data::articles};

/// Args for the `sentences` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Article JSON produced by `filter` (or `fetch`).
    #[arg(short, long)]
    pub input: Option<PathBuf>,
    /// Output text path.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let input = args
        .input
        .unwrap_or_else(|| settings.join_output("entity_articles.json"));
    let output = args
        .output
        .unwrap_or_else(|| settings.join_output("sentences.txt"));
    let records = articles::read_articles(&input)?;
    articles::write_sentences(&records, &output)?;
    Ok(())
}
