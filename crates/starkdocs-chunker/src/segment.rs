//! Offset ranges into the document buffer.
//!
//! Segments are byte ranges that always sit on char boundaries. Sizes are
//! measured in characters so limits behave the same for non-ASCII prose.

use starkdocs_core::SplitOptions;

use crate::tokenizer::Tokens;

/// Half-open byte range `[start, end)` into the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub start: usize,
    pub end: usize,
}

impl Segment {
    #[must_use]
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "segment start {start} past end {end}");
        Self { start, end }
    }

    /// The text this segment covers.
    #[must_use]
    pub fn slice<'a>(&self, text: &'a str) -> &'a str {
        &text[self.start..self.end]
    }

    /// Length in characters.
    #[must_use]
    pub fn char_len(&self, text: &str) -> usize {
        self.slice(text).chars().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The segment spanning from this one's start to `other`'s end.
    #[must_use]
    pub fn join(self, other: Segment) -> Segment {
        Segment::new(self.start, other.end)
    }
}

/// Borrowed view of one document shared by every pipeline stage.
#[derive(Debug, Clone, Copy)]
pub struct SplitContext<'a> {
    pub text: &'a str,
    pub tokens: &'a Tokens,
    pub options: &'a SplitOptions,
}

impl<'a> SplitContext<'a> {
    #[must_use]
    pub fn new(text: &'a str, tokens: &'a Tokens, options: &'a SplitOptions) -> Self {
        Self {
            text,
            tokens,
            options,
        }
    }

    /// Whether a boundary at `pos` would tear a fenced block apart.
    ///
    /// Always false when code blocks are not preserved.
    #[must_use]
    pub fn cuts_code_block(&self, pos: usize) -> bool {
        self.options.preserve_code_blocks && self.tokens.code_block_containing(pos).is_some()
    }
}

/// Convert a byte offset into a character offset.
#[must_use]
pub fn char_offset(text: &str, byte: usize) -> usize {
    if text.is_ascii() {
        byte
    } else {
        text[..byte].chars().count()
    }
}

/// Byte offset `n` characters before `end`, never earlier than `floor`.
#[must_use]
pub fn back_chars(text: &str, floor: usize, end: usize, n: usize) -> usize {
    if n == 0 {
        return end;
    }
    text[floor..end]
        .char_indices()
        .rev()
        .nth(n - 1)
        .map_or(floor, |(idx, _)| floor + idx)
}
