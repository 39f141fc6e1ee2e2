//! Core traits for starkdocs components.
//!
//! - [`DocumentSplitter`]: Split one markdown document into chunks
//! - [`SourceLinkResolver`]: Map `(document, title)` to a public URL
//! - [`ChunkSink`]: Persist ingested chunks for the embedding stage
//!
//! Splitting is synchronous and CPU-bound; only the sink touches I/O.

use async_trait::async_trait;

use crate::error::SinkError;
use crate::types::{Chunk, IngestedChunk, SinkReport};

// ============================================================================
// Splitting
// ============================================================================

/// Trait for splitting one document into chunks.
pub trait DocumentSplitter: Send + Sync {
    /// Name of this splitting strategy.
    fn name(&self) -> &str;

    /// Split a markdown document. Empty or whitespace-only input yields no chunks.
    fn split(&self, markdown: &str) -> Vec<Chunk>;
}

// ============================================================================
// Source links
// ============================================================================

/// Trait for resolving the public URL of a chunk's section.
pub trait SourceLinkResolver: Send + Sync {
    /// Resolve a link for `title` inside `document`, if one exists.
    fn resolve(&self, document: &str, title: &str) -> Option<String>;
}

// ============================================================================
// Chunk sinks
// ============================================================================

/// Trait for the downstream chunk writer.
#[async_trait]
pub trait ChunkSink: Send + Sync {
    /// Name of this sink.
    fn name(&self) -> &str;

    /// Write all chunks of one document, replacing what was stored for it before.
    async fn write(
        &self,
        document: &str,
        chunks: &[IngestedChunk],
    ) -> Result<SinkReport, SinkError>;

    /// Flush buffered output.
    async fn flush(&self) -> Result<(), SinkError> {
        Ok(())
    }
}
