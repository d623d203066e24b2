//! CLI entry-point for entity filtering.

use std::{path::PathBuf, sync::Arc};

use anyhow::Result;
use clap::Args as ClapArgs;
use tracing::{info, instrument, warn};

use crate::{
    config::Settings,
    data::{
        articles::{self, ArticleRecord},
        pmc,
    },
    nlp::entities::{self, EntityDictionary},
    workers,
};

/// Args for the `filter` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Article JSON produced by `fetch`.
    #[arg(short, long, conflicts_with = "pmc_folder")]
    pub input: Option<PathBuf>,
    /// Folder of PubMed Central full-text `.xml` articles, filtered paragraph
    /// by paragraph instead of by abstract.
    #[arg(short = 'p', long)]
    pub pmc_folder: Option<PathBuf>,
    /// Entity list (defaults to the configured entity file).
    #[arg(long)]
    pub entities: Option<PathBuf>,
    /// Output JSON path.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Override the worker pool size.
    #[arg(short = 'n', long)]
    pub n_processes: Option<usize>,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let entity_path = args
        .entities
        .clone()
        .unwrap_or_else(|| settings.entity_file.clone());
    let workers = args.n_processes.unwrap_or(settings.workers);
    let entities = entities::load_entities(&entity_path)?;
    let dictionary = Arc::new(EntityDictionary::new(&entities)?);

    let (kept, total, output) = match &args.pmc_folder {
        Some(folder) => {
            let output = args.output.clone().unwrap_or_else(|| {
                let name = folder
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "pmc".to_string());
                settings.join_output(format!("{name}.json"))
            });
            let files = pmc::pmc_files(folder)?;
            let total = files.len();
            let kept = workers::map_unordered(files, workers, move |path| {
                match pmc::read_pmc_article(&path) {
                    Ok(article) => pmc::filter_full_text(article, &dictionary),
                    Err(err) => {
                        warn!(error = %format!("{err:#}"), "skipping unreadable article");
                        None
                    }
                }
            })
            .await?;
            (kept, total, output)
        }
        None => {
            let input = args
                .input
                .clone()
                .unwrap_or_else(|| settings.join_output("pubmed_articles.json"));
            let output = args
                .output
                .clone()
                .unwrap_or_else(|| settings.join_output("entity_articles.json"));
            let candidates = articles::read_articles(&input)?;
            let total = candidates.len();
            let kept = workers::map_unordered(candidates, workers, move |article| {
                articles::filter_article(article, &dictionary)
            })
            .await?;
            (kept, total, output)
        }
    };
    let kept: Vec<ArticleRecord> = kept.into_iter().flatten().collect();

    articles::persist_json(&kept, &output)?;
    info!(path = %output.display(), kept = kept.len(), total, "saved entity articles");
    Ok(())
}
