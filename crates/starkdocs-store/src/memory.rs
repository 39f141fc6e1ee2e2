//! In-memory chunk store with change detection.
//!
//! This module provides a [`MemoryStore`] that keeps the most recent chunks of
//! every document in memory. It's useful for:
//! - Re-ingestion runs that only need to know what changed
//! - Tests that don't need persistence

use async_trait::async_trait;
use starkdocs_core::{ChunkSink, IngestedChunk, SinkError, SinkReport};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Chunks of one document, keyed by unique id.
type DocumentChunks = HashMap<String, IngestedChunk>;

/// Totals across all stored documents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub total_documents: u64,
    pub total_chunks: u64,
}

/// In-memory chunk store.
///
/// Each [`write`](ChunkSink::write) replaces the stored chunks of one document.
/// Chunks are matched by `unique_id` and compared by content hash, so the
/// returned [`SinkReport`] tells which chunks need re-embedding.
///
/// # Example
///
/// ```rust
/// use starkdocs_core::ChunkSink;
/// use starkdocs_store::MemoryStore;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = MemoryStore::new();
/// let report = store.write("intro.md", &[]).await?;
/// assert_eq!(report.inserted, 0);
/// assert_eq!(store.stats().await.total_chunks, 0);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Default)]
pub struct MemoryStore {
    documents: Arc<RwLock<HashMap<String, DocumentChunks>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored chunks of `document`, in document order.
    pub async fn chunks_for(&self, document: &str) -> Vec<IngestedChunk> {
        let documents = self.documents.read().await;
        let mut chunks: Vec<IngestedChunk> = documents
            .get(document)
            .map(|chunks| chunks.values().cloned().collect())
            .unwrap_or_default();
        chunks.sort_by_key(|c| c.chunk.meta.core_start_char);
        chunks
    }

    /// Look up a single chunk.
    pub async fn get(&self, document: &str, unique_id: &str) -> Option<IngestedChunk> {
        let documents = self.documents.read().await;
        documents.get(document)?.get(unique_id).cloned()
    }

    /// Forget a document. Returns how many chunks were dropped.
    pub async fn remove_document(&self, document: &str) -> u64 {
        let mut documents = self.documents.write().await;
        let removed = documents.remove(document).map_or(0, |chunks| chunks.len() as u64);
        debug!("Removed {} chunks for {}", removed, document);
        removed
    }

    pub async fn stats(&self) -> StoreStats {
        let documents = self.documents.read().await;
        StoreStats {
            total_documents: documents.len() as u64,
            total_chunks: documents.values().map(|c| c.len() as u64).sum(),
        }
    }
}

#[async_trait]
impl ChunkSink for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn write(
        &self,
        document: &str,
        chunks: &[IngestedChunk],
    ) -> Result<SinkReport, SinkError> {
        let mut documents = self.documents.write().await;
        let previous = documents.get(document);
        let mut current = DocumentChunks::with_capacity(chunks.len());
        let mut report = SinkReport::default();

        for chunk in chunks {
            let id = &chunk.chunk.meta.unique_id;
            if current.contains_key(id) {
                return Err(SinkError::Write(format!(
                    "duplicate chunk id {id} in {document}"
                )));
            }
            match previous.and_then(|stored| stored.get(id)) {
                Some(old) if old.content_hash == chunk.content_hash => report.unchanged += 1,
                Some(_) => report.updated += 1,
                None => report.inserted += 1,
            }
            current.insert(id.clone(), chunk.clone());
        }
        report.removed = previous.map_or(0, |stored| {
            stored.keys().filter(|id| !current.contains_key(*id)).count() as u64
        });

        debug!(
            "Stored {} chunks for {} ({} new, {} updated, {} unchanged, {} removed)",
            current.len(),
            document,
            report.inserted,
            report.updated,
            report.unchanged,
            report.removed
        );

        if current.is_empty() {
            documents.remove(document);
        } else {
            documents.insert(document.to_string(), current);
        }
        Ok(report)
    }
}
