//! Runtime configuration utilities for phrase-miner.

use std::{
    env,
    path::{Path, PathBuf},
    str::FromStr,
};

use anyhow::Context;
use serde::Deserialize;

const DEFAULT_EFETCH_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/efetch.fcgi";

/// Application configuration resolved from `.env` and defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Contact email for PubMed E-utilities courtesy policy.
    pub pubmed_email: String,
    /// Tool name sent with PubMed requests.
    pub pubmed_tool: String,
    /// Optional NCBI key; raises the server-side request allowance.
    pub ncbi_api_key: Option<String>,
    /// E-utilities efetch endpoint.
    pub efetch_url: String,
    /// Maximum requests dispatched within any one-second window.
    pub rate_limit: usize,
    /// PMIDs requested per efetch call.
    pub batch_size: usize,
    /// Size of the per-document worker pool.
    pub workers: usize,
    /// Entity strings, one per line.
    pub entity_file: PathBuf,
    /// Pretrained sentence model name (requires the `embeddings` feature).
    pub embedding_model: String,
    /// Vector length of the fallback hashing embedder.
    pub embedding_dim: usize,
    /// Root folder for pipeline outputs.
    pub outputs_dir: PathBuf,
}

impl Settings {
    /// Load configuration from environment with reasonable defaults.
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let pubmed_email =
            env::var("PUBMED_EMAIL").unwrap_or_else(|_| "research@example.com".to_string());
        let pubmed_tool = env::var("PUBMED_TOOL").unwrap_or_else(|_| "fetch_pubmed".to_string());
        let ncbi_api_key = env::var("NCBI_API_KEY").ok().filter(|k| !k.trim().is_empty());
        let efetch_url =
            env::var("PUBMED_EFETCH_URL").unwrap_or_else(|_| DEFAULT_EFETCH_URL.to_string());
        let entity_file = env::var("ENTITY_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("entity_strings.txt"));
        let embedding_model =
            env::var("EMBEDDING_MODEL").unwrap_or_else(|_| "bge-base-en-v1.5".to_string());
        let outputs_dir = env::var("OUTPUTS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./outputs"));

        std::fs::create_dir_all(&outputs_dir).context("creating outputs dir")?;

        Ok(Self {
            pubmed_email,
            pubmed_tool,
            ncbi_api_key,
            efetch_url,
            rate_limit: env_number("PUBMED_RATE_LIMIT", 10),
            batch_size: env_number("FETCH_BATCH_SIZE", 250),
            workers: env_number("WORKERS", 8),
            entity_file,
            embedding_model,
            embedding_dim: env_number("EMBEDDING_DIM", 768),
            outputs_dir,
        })
    }

    /// Convenience helper for derived output path segments.
    pub fn join_output<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        self.outputs_dir.join(path)
    }
}

fn env_number<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
