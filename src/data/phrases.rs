//! Parquet persistence for phrase embedding records.

use std::{fs::File, path::Path};

use anyhow::{Context, Result};
use polars::prelude::{
    DataFrame, NamedFrom, ParquetReader, ParquetWriter, SerReader, Series,
};
use tracing::info;

use crate::nlp::PhraseRecord;

/// Write records as one row each: `doc_id`, `label`, `phrase`, `embedding` (list of f32).
pub fn persist_phrases(records: &[PhraseRecord], path: &Path) -> Result<()> {
    let doc_ids: Vec<&str> = records.iter().map(|r| r.doc_id.as_str()).collect();
    let labels: Vec<&str> = records.iter().map(|r| r.label.as_str()).collect();
    let phrases: Vec<&str> = records.iter().map(|r| r.phrase.as_str()).collect();
    let embeddings: Vec<Series> = records
        .iter()
        .map(|r| Series::new("".into(), r.embedding.as_slice()))
        .collect();

    let mut df = DataFrame::new(vec![
        Series::new("doc_id".into(), doc_ids),
        Series::new("label".into(), labels),
        Series::new("phrase".into(), phrases),
        Series::new("embedding".into(), embeddings),
    ])?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(path).with_context(|| format!("create {path:?}"))?;
    ParquetWriter::new(file).finish(&mut df)?;
    info!(path = %path.display(), rows = records.len(), "wrote phrase embeddings");
    Ok(())
}

/// Load the phrase table back, e.g. for downstream similarity analysis.
pub fn read_phrases(path: &Path) -> Result<DataFrame> {
    let file = File::open(path).with_context(|| format!("open {path:?}"))?;
    Ok(ParquetReader::new(file).finish()?)
}
