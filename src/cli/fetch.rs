//! CLI entry-point for fetching PubMed article metadata.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args as ClapArgs;
use tracing::{info, instrument};

use crate::{
    config::Settings,
    data::{
        articles,
        pubmed::{self, PubmedClient},
    },
};

/// Args for the `fetch` sub-command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Text file with one PMID per line.
    #[arg(short = 'p', long)]
    pub pmid_list: PathBuf,
    /// Output JSON path (defaults to `<outputs>/pubmed_articles.json`).
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Override the contact email sent to PubMed.
    #[arg(short = 'e', long)]
    pub pubmed_email: Option<String>,
    /// Override PMIDs per efetch request.
    #[arg(short, long)]
    pub batch_size: Option<usize>,
    /// Override the worker pool size.
    #[arg(short = 'n', long)]
    pub n_processes: Option<usize>,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, mut settings: Settings) -> Result<()> {
    if let Some(email) = args.pubmed_email {
        settings.pubmed_email = email;
    }
    let batch_size = args.batch_size.unwrap_or(settings.batch_size);
    let workers = args.n_processes.unwrap_or(settings.workers);
    let output = args
        .output
        .unwrap_or_else(|| settings.join_output("pubmed_articles.json"));

    let pmids = articles::load_pmids(&args.pmid_list)?;
    info!(count = pmids.len(), batch_size, workers, "fetching pubmed articles");

    let client = PubmedClient::new(&settings)?;
    let records = pubmed::fetch_articles(&client, &pmids, batch_size, workers)
        .await
        .context("fetch pubmed articles")?;
    articles::persist_json(&records, &output)?;
    info!(path = %output.display(), count = records.len(), "saved pubmed articles");
    Ok(())
}
