//! Markdown chunking for starkdocs.
//!
//! [`MarkdownSplitter`] turns one markdown document into an ordered list of
//! [`Chunk`](starkdocs_core::Chunk)s sized for embedding. Each stage works on
//! byte ranges into a single buffer:
//!
//! ```text
//! tokenize → RecursiveSegmenter → SegmentMerger → OverlapAssembler → MetadataAttacher
//! ```
//!
//! - [`tokenizer`]: headers and fenced code blocks, found in one pass
//! - [`segmenter`]: header, paragraph then line splitting of oversized regions
//! - [`merger`]: folding of undersized neighbors, code-safe boundaries
//! - [`overlap`]: context prefixes copied from the previous chunk
//! - [`metadata`]: titles, header paths, numbering and ids
//!
//! ```
//! use starkdocs_chunker::MarkdownSplitter;
//!
//! let splitter = MarkdownSplitter::builder().max_chars(1024).min_chars(200).build()?;
//! let chunks = splitter.split_to_chunks("# Storage\n\nStarknet storage slots...");
//! assert_eq!(chunks[0].meta.title, "Storage");
//! # Ok::<(), starkdocs_core::ChunkError>(())
//! ```

pub mod merger;
pub mod metadata;
pub mod overlap;
pub mod segment;
pub mod segmenter;
pub mod splitter;
pub mod tokenizer;

pub use merger::SegmentMerger;
pub use metadata::{slugify, MetadataAttacher};
pub use overlap::{AssembledChunk, OverlapAssembler};
pub use segment::{Segment, SplitContext};
pub use segmenter::{RecursiveSegmenter, SplitStrategy, MAX_SPLIT_DEPTH};
pub use splitter::{MarkdownSplitter, MarkdownSplitterBuilder};
pub use tokenizer::{tokenize, CodeBlockToken, Fence, HeaderToken, Tokens};
