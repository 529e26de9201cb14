//! Batch tag writing.
//!
//! Each song in a batch is resolved and written by its own task. At most
//! `max_concurrent_writes` tasks hold a slot at once; the rest wait. A song
//! that fails is reported in its result and never affects the others.
//! Results come back in input order.
//!
//! Only the query that enumerates a batch's songs can fail the batch itself.

use std::path::PathBuf;
use std::sync::Arc;

use futures::future::join_all;
use serde::Serialize;
use sqlx::SqlitePool;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::config::DEFAULT_MAX_CONCURRENT_WRITES;
use crate::db;
use crate::error::{Error, Result, ResultExt};
use crate::tags::{TagWriter, resolve_song};

/// Outcome of writing one song's tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SongProcessingResult {
    pub song_id: i64,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SongProcessingResult {
    pub fn ok(song_id: i64) -> Self {
        Self {
            song_id,
            success: true,
            error: None,
        }
    }

    pub fn failed(song_id: i64, error: impl std::fmt::Display) -> Self {
        Self {
            song_id,
            success: false,
            error: Some(error.to_string()),
        }
    }
}

/// Outcome of a batch; `results` follows the input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResult {
    pub success: bool,
    pub message: String,
    /// Songs written successfully
    pub processed_count: usize,
    pub failed_count: usize,
    pub results: Vec<SongProcessingResult>,
}

impl BatchResult {
    fn from_results(message: String, results: Vec<SongProcessingResult>) -> Self {
        let processed_count = results.iter().filter(|r| r.success).count();
        Self {
            success: true,
            message,
            processed_count,
            failed_count: results.len() - processed_count,
            results,
        }
    }
}

/// Resolves and writes tags for single songs and batches.
#[derive(Debug, Clone)]
pub struct BatchCoordinator {
    pool: SqlitePool,
    writer: Arc<TagWriter>,
    max_concurrent_writes: usize,
}

impl BatchCoordinator {
    pub fn new(pool: SqlitePool, writer: TagWriter) -> Self {
        Self {
            pool,
            writer: Arc::new(writer),
            max_concurrent_writes: DEFAULT_MAX_CONCURRENT_WRITES,
        }
    }

    /// Size of the admission gate; 0 is treated as 1.
    pub fn with_max_concurrent_writes(mut self, max: usize) -> Self {
        self.max_concurrent_writes = max.max(1);
        self
    }

    /// Write one song; failures end up in the result.
    pub async fn write_song(&self, song_id: i64) -> SongProcessingResult {
        match self.write_song_inner(song_id).await {
            Ok(path) => {
                debug!(target: "batch", song_id, "Wrote tags to {:?}", path);
                SongProcessingResult::ok(song_id)
            }
            Err(e) => {
                warn!(target: "batch", song_id, "Tag write failed: {}", e);
                SongProcessingResult::failed(song_id, e)
            }
        }
    }

    async fn write_song_inner(&self, song_id: i64) -> Result<PathBuf> {
        let song = resolve_song(&self.pool, song_id).await?;
        let writer = Arc::clone(&self.writer);

        tokio::task::spawn_blocking(move || writer.write(&song.filepath, &song.tags))
            .await
            .map_err(|e| Error::Io(std::io::Error::other(e)).context("tag writer task"))?
    }

    /// Write every song in `song_ids`, at most `max_concurrent_writes` at a time.
    pub async fn run_batch(&self, song_ids: &[i64], message: impl Into<String>) -> BatchResult {
        info!(
            target: "batch",
            "Writing tags for {} songs ({} at a time)",
            song_ids.len(),
            self.max_concurrent_writes
        );

        let coordinator = self.clone();
        let results = run_gated(song_ids, self.max_concurrent_writes, move |song_id| {
            let coordinator = coordinator.clone();
            async move { coordinator.write_song(song_id).await }
        })
        .await;

        let batch = BatchResult::from_results(message.into(), results);
        info!(
            target: "batch",
            "{}: {} written, {} failed",
            batch.message,
            batch.processed_count,
            batch.failed_count
        );
        batch
    }

    /// Write every song on an album.
    pub async fn write_album(&self, album_id: i64) -> Result<BatchResult> {
        let ids = db::song_ids_for_album(&self.pool, album_id)
            .await
            .with_context(format!("listing songs of album {album_id}"))?;
        Ok(self.run_batch(&ids, format!("Processed album {album_id}")).await)
    }

    /// Write every song credited to a producer.
    pub async fn write_producer(&self, producer_id: i64) -> Result<BatchResult> {
        let ids = db::song_ids_for_producer(&self.pool, producer_id)
            .await
            .with_context(format!("listing songs of producer {producer_id}"))?;
        Ok(self
            .run_batch(&ids, format!("Processed producer {producer_id}"))
            .await)
    }

    /// Write every song linked to an artist.
    pub async fn write_artist(&self, artist_id: i64) -> Result<BatchResult> {
        let ids = db::song_ids_for_artist(&self.pool, artist_id)
            .await
            .with_context(format!("listing songs of artist {artist_id}"))?;
        Ok(self
            .run_batch(&ids, format!("Processed artist {artist_id}"))
            .await)
    }
}

/// Run `work` for every id on its own task, with at most `max` tasks past
/// the admission gate at once. Results follow the order of `song_ids`.
async fn run_gated<F, Fut>(song_ids: &[i64], max: usize, work: F) -> Vec<SongProcessingResult>
where
    F: Fn(i64) -> Fut + Clone + Send + 'static,
    Fut: Future<Output = SongProcessingResult> + Send + 'static,
{
    let gate = Arc::new(Semaphore::new(max.max(1)));

    let handles: Vec<_> = song_ids
        .iter()
        .map(|&song_id| {
            let gate = Arc::clone(&gate);
            let work = work.clone();
            tokio::spawn(async move {
                let Ok(_permit) = gate.acquire_owned().await else {
                    return SongProcessingResult::failed(song_id, "admission gate closed");
                };
                work(song_id).await
            })
        })
        .collect();

    join_all(handles)
        .await
        .into_iter()
        .zip(song_ids)
        .map(|(joined, &song_id)| {
            joined.unwrap_or_else(|e| SongProcessingResult::failed(song_id, format!("task failed: {e}")))
        })
        .collect()
}
