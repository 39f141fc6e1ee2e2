//! Core types for starkdocs.
//!
//! ## Documents
//! - [`Document`]: A named raw markdown document handed to the splitter
//!
//! ## Chunks
//! - [`Chunk`]: Chunk content plus its [`ChunkMeta`]
//! - [`SplitOptions`]: Configuration for splitting behavior
//! - [`ROOT_TITLE`]: Title given to chunks outside any configured section
//!
//! ## Ingestion
//! - [`IngestedChunk`]: A chunk with content hash and source link
//! - [`SinkReport`]: What a [`crate::ChunkSink`] did with a batch

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ChunkError;

/// Title assigned when no configured-level header governs a chunk.
pub const ROOT_TITLE: &str = "ROOT";

// ============================================================================
// Documents
// ============================================================================

/// A raw documentation page, as supplied by an upstream fetcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Document name, usually its path relative to the docs root
    pub name: String,
    /// Raw markdown text
    pub content: String,
}

impl Document {
    /// Create a document from a name and its markdown.
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

// ============================================================================
// Chunks
// ============================================================================

/// A chunk of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Chunk text, including any overlap prefix
    pub content: String,
    /// Position and section metadata
    pub meta: ChunkMeta,
}

/// Metadata attached to each chunk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkMeta {
    /// Governing section title, or [`ROOT_TITLE`]
    pub title: String,
    /// 0-based sequence number among chunks sharing `title`
    pub chunk_number: u32,
    /// `[prefix-]slug(title)-chunk_number`, unique within one document
    pub unique_id: String,
    /// Character offset where the chunk starts, overlap included
    pub start_char: usize,
    /// Character offset where the chunk ends (exclusive)
    pub end_char: usize,
    /// Character offset where the non-overlapped region starts
    pub core_start_char: usize,
    /// Ancestor header titles, root to leaf
    pub header_path: Vec<String>,
}

/// Configuration for the markdown splitter.
///
/// All sizes count characters (Unicode scalar values).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitOptions {
    /// Upper bound for a segment before overlap is added
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,

    /// Segments shorter than this are merged with a neighbor
    #[serde(default = "default_min_chars")]
    pub min_chars: usize,

    /// Trailing context copied from the previous segment
    #[serde(default = "default_overlap")]
    pub overlap: usize,

    /// Header levels that start a new section
    #[serde(default = "default_header_levels")]
    pub header_levels: Vec<u8>,

    /// Treat fenced code blocks as atomic
    #[serde(default = "default_true")]
    pub preserve_code_blocks: bool,

    /// Prepended to every unique id when non-empty
    #[serde(default)]
    pub id_prefix: String,

    /// Trim surrounding whitespace from chunk content
    #[serde(default = "default_true")]
    pub trim: bool,
}

fn default_max_chars() -> usize {
    2048
}

fn default_min_chars() -> usize {
    500
}

fn default_overlap() -> usize {
    256
}

fn default_header_levels() -> Vec<u8> {
    vec![1, 2]
}

fn default_true() -> bool {
    true
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            max_chars: default_max_chars(),
            min_chars: default_min_chars(),
            overlap: default_overlap(),
            header_levels: default_header_levels(),
            preserve_code_blocks: true,
            id_prefix: String::new(),
            trim: true,
        }
    }
}

impl SplitOptions {
    /// Check every option against its constraint.
    ///
    /// # Errors
    ///
    /// Returns [`ChunkError::InvalidConfig`] naming the first violated constraint.
    pub fn validate(&self) -> Result<(), ChunkError> {
        if self.max_chars == 0 {
            return Err(ChunkError::InvalidConfig(
                "max_chars must be greater than 0".to_string(),
            ));
        }
        if self.min_chars >= self.max_chars {
            return Err(ChunkError::InvalidConfig(format!(
                "min_chars ({}) must be less than max_chars ({})",
                self.min_chars, self.max_chars
            )));
        }
        if self.overlap >= self.max_chars {
            return Err(ChunkError::InvalidConfig(format!(
                "overlap ({}) must be less than max_chars ({})",
                self.overlap, self.max_chars
            )));
        }
        if self.header_levels.is_empty() {
            return Err(ChunkError::InvalidConfig(
                "header_levels must not be empty".to_string(),
            ));
        }
        if let Some(level) = self.header_levels.iter().find(|l| !(1..=6).contains(*l)) {
            return Err(ChunkError::InvalidConfig(format!(
                "header_levels entries must be between 1 and 6, got {level}"
            )));
        }
        Ok(())
    }

    /// Whether headers of `level` start a new section.
    #[must_use]
    pub fn is_section_level(&self, level: u8) -> bool {
        self.header_levels.contains(&level)
    }
}

// ============================================================================
// Ingestion
// ============================================================================

/// A chunk ready for the embedding/vector-store writer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestedChunk {
    /// Name of the source document
    pub document: String,
    /// blake3 hex digest of `chunk.content`
    pub content_hash: String,
    /// Public URL of the section, if resolvable
    pub source_link: Option<String>,
    /// When the chunk was produced
    pub ingested_at: DateTime<Utc>,
    /// The chunk itself
    #[serde(flatten)]
    pub chunk: Chunk,
}

/// Outcome of writing one document's chunks to a sink.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SinkReport {
    /// Chunks seen for the first time
    pub inserted: u64,
    /// Chunks whose content hash changed
    pub updated: u64,
    /// Chunks whose content hash is unchanged
    pub unchanged: u64,
    /// Previously stored chunks no longer produced
    pub removed: u64,
}

impl SinkReport {
    /// Accumulate another report into this one.
    pub fn absorb(&mut self, other: SinkReport) {
        self.inserted += other.inserted;
        self.updated += other.updated;
        self.unchanged += other.unchanged;
        self.removed += other.removed;
    }
}
