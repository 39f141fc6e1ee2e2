//! Context overlap between consecutive chunks.

use tracing::debug;

use crate::segment::{back_chars, Segment, SplitContext};

/// A chunk before metadata is attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledChunk {
    /// Overlap prefix followed by the segment text, trimmed if configured
    pub content: String,
    /// Byte offset where the overlap prefix starts
    pub start: usize,
    /// Byte offset where the segment itself starts
    pub core_start: usize,
    /// Byte offset where the segment ends
    pub end: usize,
}

/// Prepends trailing context of the previous segment to each segment.
pub struct OverlapAssembler<'a> {
    ctx: SplitContext<'a>,
}

impl<'a> OverlapAssembler<'a> {
    #[must_use]
    pub fn new(ctx: SplitContext<'a>) -> Self {
        Self { ctx }
    }

    /// Build chunk text for each segment, dropping chunks that are blank.
    #[must_use]
    pub fn assemble(&self, segments: &[Segment]) -> Vec<AssembledChunk> {
        let text = self.ctx.text;
        let mut chunks = Vec::with_capacity(segments.len());

        for (i, segment) in segments.iter().enumerate() {
            let prefix_start = match i.checked_sub(1).map(|p| segments[p]) {
                Some(previous) => self.overlap_start(previous),
                None => segment.start,
            };

            let mut content = String::with_capacity(segment.end - prefix_start);
            if prefix_start < segment.start {
                let previous_end = segments[i - 1].end;
                content.push_str(&text[prefix_start..previous_end]);
            }
            content.push_str(segment.slice(text));

            if content.trim().is_empty() {
                debug!("Dropping blank chunk at byte {}", segment.start);
                continue;
            }
            if self.ctx.options.trim {
                content = content.trim().to_string();
            }

            chunks.push(AssembledChunk {
                content,
                start: prefix_start,
                core_start: segment.start,
                end: segment.end,
            });
        }

        chunks
    }

    /// Where the overlap taken from `previous` begins.
    ///
    /// A start inside a code block that closes within `previous` moves to the
    /// block's close. A block reaching past `previous` leaves it untouched.
    fn overlap_start(&self, previous: Segment) -> usize {
        let text = self.ctx.text;
        let take = self.ctx.options.overlap.min(previous.char_len(text));
        let start = back_chars(text, previous.start, previous.end, take);

        if !self.ctx.options.preserve_code_blocks {
            return start;
        }
        match self.ctx.tokens.code_block_containing(start) {
            Some(block) if block.end <= previous.end => block.end,
            _ => start,
        }
    }
}
