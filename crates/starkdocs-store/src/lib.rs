//! Chunk sinks for starkdocs.
//!
//! This crate provides the storage side of ingestion, implementing the
//! [`ChunkSink`](starkdocs_core::ChunkSink) trait for two backends:
//!
//! - [`MemoryStore`]: keeps the latest chunks of every document and reports
//!   which ones were inserted, updated, unchanged or removed by comparing
//!   content hashes
//! - [`JsonlSink`]: appends one JSON object per chunk to a file, ready for the
//!   embedding stage
//!
//! # Example
//!
//! ```rust,ignore
//! use starkdocs_core::ChunkSink;
//! use starkdocs_store::MemoryStore;
//!
//! let store = MemoryStore::new();
//! let report = store.write("cairo-book/ch01.md", &chunks).await?;
//! println!("{} new, {} changed", report.inserted, report.updated);
//! ```

pub mod jsonl;
pub mod memory;

pub use jsonl::JsonlSink;
pub use memory::{MemoryStore, StoreStats};
