//! # starkdocs-core
//!
//! Core types and traits for starkdocs, the documentation ingester behind the
//! Cairo/Starknet coding assistant.
//!
//! This crate provides the foundational abstractions shared by the other crates:
//!
//! - **Document Splitting**: [`DocumentSplitter`] trait for turning one markdown
//!   document into bounded, cross-referenced chunks
//! - **Source Links**: [`SourceLinkResolver`] trait for mapping a chunk back to
//!   its public documentation URL
//! - **Chunk Sinks**: [`ChunkSink`] trait for the downstream writer that feeds
//!   the embedding/vector-store stage
//!
//! ## Architecture
//!
//! ```text
//! Document → DocumentSplitter → content_hash + SourceLinkResolver → ChunkSink
//! ```
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Document`] | A named raw markdown document |
//! | [`Chunk`] | A bounded slice of a document with its metadata |
//! | [`ChunkMeta`] | Title, numbering, id, offsets and header path of a chunk |
//! | [`SplitOptions`] | Validated configuration for the splitter |
//! | [`IngestedChunk`] | A chunk enriched with hash and source link, ready to store |
//!
//! ## Related Crates
//!
//! - `starkdocs-chunker`: The recursive markdown splitter
//! - `starkdocs-store`: In-memory and JSON-lines chunk sinks
//! - `starkdocs`: Command-line ingester

pub mod error;
pub mod hash;
pub mod traits;
pub mod types;

pub use error::{ChunkError, Error, Result, SinkError};
pub use hash::content_hash;
pub use traits::*;
pub use types::*;
