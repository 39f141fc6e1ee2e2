//! Markdown splitter entry point.

use std::borrow::Cow;

use starkdocs_core::{Chunk, ChunkError, DocumentSplitter, SplitOptions};
use tracing::debug;

use crate::merger::SegmentMerger;
use crate::metadata::MetadataAttacher;
use crate::overlap::OverlapAssembler;
use crate::segment::{Segment, SplitContext};
use crate::segmenter::{split_at_headers, RecursiveSegmenter};
use crate::tokenizer::tokenize;

/// Splits markdown documents into section-aware, overlapping chunks.
///
/// The splitter holds only validated options, so one instance can be shared
/// across threads and reused for any number of documents.
#[derive(Debug, Clone)]
pub struct MarkdownSplitter {
    options: SplitOptions,
}

impl MarkdownSplitter {
    /// Create a splitter, rejecting invalid options.
    ///
    /// # Errors
    ///
    /// Returns [`ChunkError::InvalidConfig`] naming the violated constraint.
    pub fn new(options: SplitOptions) -> Result<Self, ChunkError> {
        options.validate()?;
        Ok(Self { options })
    }

    /// Start building a splitter from default options.
    #[must_use]
    pub fn builder() -> MarkdownSplitterBuilder {
        MarkdownSplitterBuilder::default()
    }

    #[must_use]
    pub fn options(&self) -> &SplitOptions {
        &self.options
    }

    /// Split `markdown` into chunks with metadata.
    ///
    /// Line endings are normalized to `\n` first; every offset in the result
    /// refers to the normalized text. Blank input yields no chunks.
    #[must_use]
    pub fn split_to_chunks(&self, markdown: &str) -> Vec<Chunk> {
        if markdown.trim().is_empty() {
            return Vec::new();
        }

        let normalized = normalize_line_endings(markdown);
        let text: &str = &normalized;
        let tokens = tokenize(text);
        let ctx = SplitContext::new(text, &tokens, &self.options);

        let segmenter = RecursiveSegmenter::new(ctx);
        let merger = SegmentMerger::new(ctx);

        // Sections are merged independently so small neighbors never
        // swallow a configured-level header.
        let mut segments = Vec::new();
        for section in split_at_headers(Segment::new(0, text.len()), &ctx) {
            let leaves = segmenter.split(section);
            segments.extend(merger.merge(&leaves));
        }

        let assembled = OverlapAssembler::new(ctx).assemble(&segments);
        let chunks = MetadataAttacher::new(ctx).attach(assembled);

        debug!(
            "Split {} chars into {} chunks ({} headers, {} code blocks)",
            text.chars().count(),
            chunks.len(),
            tokens.headers.len(),
            tokens.code_blocks.len()
        );

        chunks
    }
}

impl DocumentSplitter for MarkdownSplitter {
    fn name(&self) -> &str {
        "markdown"
    }

    fn split(&self, markdown: &str) -> Vec<Chunk> {
        self.split_to_chunks(markdown)
    }
}

fn normalize_line_endings(text: &str) -> Cow<'_, str> {
    if text.contains('\r') {
        Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(text)
    }
}

/// Builder for [`MarkdownSplitter`].
#[derive(Debug, Clone, Default)]
pub struct MarkdownSplitterBuilder {
    options: SplitOptions,
}

impl MarkdownSplitterBuilder {
    #[must_use]
    pub fn max_chars(mut self, max_chars: usize) -> Self {
        self.options.max_chars = max_chars;
        self
    }

    #[must_use]
    pub fn min_chars(mut self, min_chars: usize) -> Self {
        self.options.min_chars = min_chars;
        self
    }

    #[must_use]
    pub fn overlap(mut self, overlap: usize) -> Self {
        self.options.overlap = overlap;
        self
    }

    /// Header levels that open a new section.
    #[must_use]
    pub fn header_levels(mut self, levels: impl Into<Vec<u8>>) -> Self {
        self.options.header_levels = levels.into();
        self
    }

    #[must_use]
    pub fn preserve_code_blocks(mut self, preserve: bool) -> Self {
        self.options.preserve_code_blocks = preserve;
        self
    }

    /// Prefix for generated chunk ids.
    #[must_use]
    pub fn id_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.options.id_prefix = prefix.into();
        self
    }

    #[must_use]
    pub fn trim(mut self, trim: bool) -> Self {
        self.options.trim = trim;
        self
    }

    /// Validate the options and create the splitter.
    ///
    /// # Errors
    ///
    /// Returns [`ChunkError::InvalidConfig`] if any option is out of range.
    pub fn build(self) -> Result<MarkdownSplitter, ChunkError> {
        MarkdownSplitter::new(self.options)
    }
}
