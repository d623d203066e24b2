//! Fixed-size worker pool for stateless per-document work.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use thiserror::Error;
use tokio::task::{self, JoinError};

/// A worker task died instead of returning a value.
#[derive(Debug, Error)]
#[error("worker task failed: {0}")]
pub struct WorkerError(#[from] JoinError);

/// Results gathered in completion order. Iteration order is unspecified and
/// must not be assumed to follow submission order.
#[derive(Debug, Clone)]
pub struct Unordered<T>(Vec<T>);

impl<T> Unordered<T> {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.0.iter()
    }
}

impl<T> IntoIterator for Unordered<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<T> FromIterator<T> for Unordered<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Run `job` over `items` on blocking workers, at most `workers` at a time.
pub async fn map_unordered<T, R, F>(
    items: Vec<T>,
    workers: usize,
    job: F,
) -> Result<Unordered<R>, WorkerError>
where
    T: Send + 'static,
    R: Send + 'static,
    F: Fn(T) -> R + Send + Sync + 'static,
{
    let job = Arc::new(job);
    let results = stream::iter(items)
        .map(|item| {
            let job = Arc::clone(&job);
            task::spawn_blocking(move || job(item))
        })
        .buffer_unordered(workers.max(1))
        .collect::<Vec<_>>()
        .await;

    let mut collected = Vec::with_capacity(results.len());
    for result in results {
        collected.push(result?);
    }
    Ok(Unordered(collected))
}
