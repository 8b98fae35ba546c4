//! Ingestion pipeline orchestration.
//!
//! Coordinates the end-to-end ingestion workflow:
//! 1. Chunk documents
//! 2. Embed each chunk through the gateway (retry + pacing)
//! 3. Insert vector and chunk metadata into the index
//! 4. Persist the index snapshot
//!
//! Chunks are processed strictly in order, one at a time. The first
//! chunk whose embedding stays failing after all retries ends the
//! run; whatever was inserted up to that point is persisted so the
//! work is not lost.

use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::core::error::Result;
use crate::core::gateway::EmbeddingGateway;
use crate::core::indexer::Chunker;
use crate::core::storage::{Metric, VectorIndex, VectorSearch};
use crate::core::types::{Chunk, Document};

/// Lifecycle of one chunk during a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkState {
    Pending,
    Embedding,
    Inserted,
    /// Retries exhausted; terminal for the whole run
    FailedExhausted,
}

/// Progress notification for one chunk state change
#[derive(Debug, Clone, Copy)]
pub struct Progress<'a> {
    /// 1-based position of the chunk in the run
    pub current: usize,
    pub total: usize,
    pub state: ChunkState,
    pub chunk: &'a Chunk,
}

/// Receives progress notifications during a run
pub trait ProgressSink {
    fn report(&mut self, progress: Progress<'_>);
}

impl<F> ProgressSink for F
where
    F: FnMut(Progress<'_>),
{
    fn report(&mut self, progress: Progress<'_>) {
        self(progress)
    }
}

/// Sink that discards progress
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&mut self, _progress: Progress<'_>) {}
}

/// How a run ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum IngestOutcome {
    /// Every chunk was inserted
    Completed,
    /// The chunk at `chunk_index` (0-based position in the run)
    /// exhausted its retries
    Aborted {
        chunk_index: usize,
        chunk_id: String,
        error: String,
    },
}

/// Summary of an ingestion run
#[derive(Debug, Clone, Serialize)]
pub struct IngestReport {
    pub documents: usize,
    pub chunks_total: usize,
    pub chunks_inserted: usize,
    /// Whether a snapshot was written by this run
    pub snapshot_persisted: bool,
    pub index_path: PathBuf,
    pub duration_ms: u64,
    pub outcome: IngestOutcome,
}

impl IngestReport {
    pub fn is_complete(&self) -> bool {
        self.outcome == IngestOutcome::Completed
    }
}

/// Chunker → embedding gateway → vector index
pub struct IngestionPipeline {
    chunker: Chunker,
    gateway: EmbeddingGateway,
    metric: Metric,
    index_path: PathBuf,
}

impl IngestionPipeline {
    pub fn new(
        chunker: Chunker,
        gateway: EmbeddingGateway,
        metric: Metric,
        index_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            chunker,
            gateway,
            metric,
            index_path: index_path.into(),
        }
    }

    pub fn index_path(&self) -> &Path {
        &self.index_path
    }

    /// Ingest `documents` into a fresh index and persist it.
    ///
    /// An embedding failure does not make this return `Err`; it is
    /// reported through [`IngestOutcome::Aborted`]. `Err` means the
    /// snapshot could not be written.
    pub async fn run(
        &self,
        documents: &[Document],
        progress: &mut dyn ProgressSink,
    ) -> Result<IngestReport> {
        let start = Instant::now();

        let chunks: Vec<Chunk> = self.chunker.chunks(documents).collect();
        let total = chunks.len();
        info!(
            "Ingesting {} documents ({} chunks, model {})",
            documents.len(),
            total,
            self.gateway.model_name()
        );

        let mut index: Option<VectorIndex> = None;
        let mut outcome = IngestOutcome::Completed;

        for (i, chunk) in chunks.iter().enumerate() {
            let current = i + 1;
            let chunk_id = chunk.id();
            let notify = |state| Progress {
                current,
                total,
                state,
                chunk,
            };

            progress.report(notify(ChunkState::Pending));
            progress.report(notify(ChunkState::Embedding));
            info!("Processing chunk {}/{} ({})", current, total, chunk_id);

            let inserted = match self.gateway.embed(&chunk_id, &chunk.text).await {
                Ok(vector) => index
                    .get_or_insert_with(|| VectorIndex::new(self.metric))
                    .insert(vector, chunk.clone()),
                Err(e) => Err(e),
            };

            match inserted {
                Ok(id) => {
                    debug!("Inserted {} as id {}", chunk_id, id);
                    progress.report(notify(ChunkState::Inserted));
                }
                Err(e) => {
                    error!("Chunk {} failed permanently: {}", chunk_id, e);
                    progress.report(notify(ChunkState::FailedExhausted));
                    outcome = IngestOutcome::Aborted {
                        chunk_index: i,
                        chunk_id,
                        error: e.to_string(),
                    };
                    break;
                }
            }
        }

        let chunks_inserted = index.as_ref().map_or(0, |idx| idx.len());
        let snapshot_persisted = match &index {
            Some(idx) => {
                idx.persist(&self.index_path)?;
                info!(
                    "Saved index with {} entries to {}",
                    chunks_inserted,
                    self.index_path.display()
                );
                true
            }
            None => {
                warn!("No chunks were embedded; no index was written");
                false
            }
        };

        let duration_ms = start.elapsed().as_millis() as u64;
        match &outcome {
            IngestOutcome::Completed => info!(
                "Ingestion complete: {}/{} chunks in {}ms",
                chunks_inserted, total, duration_ms
            ),
            IngestOutcome::Aborted { chunk_id, .. } => warn!(
                "Ingestion stopped at {}: {}/{} chunks saved",
                chunk_id, chunks_inserted, total
            ),
        }

        Ok(IngestReport {
            documents: documents.len(),
            chunks_total: total,
            chunks_inserted,
            snapshot_persisted,
            index_path: self.index_path.clone(),
            duration_ms,
            outcome,
        })
    }
}
