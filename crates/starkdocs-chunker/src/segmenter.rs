//! Recursive segmentation of oversized regions.
//!
//! A segment larger than `max_chars` is subdivided by the first strategy in
//! [`SplitStrategy::CHAIN`] that yields more than one piece, and each piece is
//! segmented again. Every strategy returns contiguous, non-overlapping pieces
//! that cover its input exactly, so the leaves always tile the original range.

use tracing::{debug, warn};

use crate::segment::{Segment, SplitContext};

/// Nesting limit for recursive splitting.
pub const MAX_SPLIT_DEPTH: usize = 64;

/// One way of subdividing a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitStrategy {
    /// Cut before every configured-level header
    Headers,
    /// Cut after runs of two or more newlines outside code
    Paragraphs,
    /// Pack whole lines up to `max_chars`, never cutting inside code
    Lines,
}

impl SplitStrategy {
    /// Strategies in the order they are tried.
    pub const CHAIN: [SplitStrategy; 3] = [
        SplitStrategy::Headers,
        SplitStrategy::Paragraphs,
        SplitStrategy::Lines,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            SplitStrategy::Headers => "headers",
            SplitStrategy::Paragraphs => "paragraphs",
            SplitStrategy::Lines => "lines",
        }
    }

    /// Subdivide `segment`. A single returned piece means "no split".
    #[must_use]
    pub fn apply(self, segment: Segment, ctx: &SplitContext<'_>) -> Vec<Segment> {
        match self {
            SplitStrategy::Headers => split_at_headers(segment, ctx),
            SplitStrategy::Paragraphs => split_at_paragraphs(segment, ctx),
            SplitStrategy::Lines => split_at_lines(segment, ctx),
        }
    }
}

/// Recursive splitter over a fixed strategy chain.
pub struct RecursiveSegmenter<'a> {
    ctx: SplitContext<'a>,
    strategies: &'a [SplitStrategy],
}

impl<'a> RecursiveSegmenter<'a> {
    /// Create a segmenter using [`SplitStrategy::CHAIN`].
    #[must_use]
    pub fn new(ctx: SplitContext<'a>) -> Self {
        Self::with_strategies(ctx, &SplitStrategy::CHAIN)
    }

    /// Create a segmenter with a custom strategy order.
    #[must_use]
    pub fn with_strategies(ctx: SplitContext<'a>, strategies: &'a [SplitStrategy]) -> Self {
        Self { ctx, strategies }
    }

    /// Split `segment` into leaves no larger than `max_chars` where possible.
    #[must_use]
    pub fn split(&self, segment: Segment) -> Vec<Segment> {
        let mut leaves = Vec::new();
        self.split_into(segment, 0, &mut leaves);
        leaves
    }

    fn split_into(&self, segment: Segment, depth: usize, leaves: &mut Vec<Segment>) {
        let len = segment.char_len(self.ctx.text);
        if len <= self.ctx.options.max_chars {
            leaves.push(segment);
            return;
        }

        if depth >= MAX_SPLIT_DEPTH {
            warn!(
                "Split depth limit {} reached at byte {}; emitting {} chars whole",
                MAX_SPLIT_DEPTH, segment.start, len
            );
            leaves.push(segment);
            return;
        }

        for strategy in self.strategies {
            let pieces = strategy.apply(segment, &self.ctx);
            if pieces.len() > 1 {
                debug!(
                    "Split {} chars at byte {} into {} pieces by {}",
                    len,
                    segment.start,
                    pieces.len(),
                    strategy.name()
                );
                for piece in pieces {
                    self.split_into(piece, depth + 1, leaves);
                }
                return;
            }
        }

        self.warn_unsplittable(segment, len);
        leaves.push(segment);
    }

    fn warn_unsplittable(&self, segment: Segment, len: usize) {
        let max = self.ctx.options.max_chars;
        let text = self.ctx.text;
        let oversized_block = self.ctx.options.preserve_code_blocks
            && self
                .ctx
                .tokens
                .code_blocks_within(segment.start, segment.end)
                .any(|block| text[block.start..block.end].chars().count() > max);

        if oversized_block {
            warn!(
                "Code block at byte {} is too large to split ({} chars > max_chars {}); emitting it whole",
                segment.start, len, max
            );
        } else {
            warn!(
                "Text at byte {} cannot be split further ({} chars > max_chars {}); emitting it whole",
                segment.start, len, max
            );
        }
    }
}

/// Cut before each configured-level header in the segment.
///
/// Text before the first header becomes its own leading piece.
#[must_use]
pub fn split_at_headers(segment: Segment, ctx: &SplitContext<'_>) -> Vec<Segment> {
    let headers: Vec<usize> = ctx
        .tokens
        .headers_within(segment.start, segment.end)
        .iter()
        .filter(|header| ctx.options.is_section_level(header.level))
        .map(|header| header.start)
        .collect();

    let Some(&first) = headers.first() else {
        return vec![segment];
    };

    let mut pieces = Vec::with_capacity(headers.len() + 1);
    if first > segment.start {
        pieces.push(Segment::new(segment.start, first));
    }
    for (i, &start) in headers.iter().enumerate() {
        let end = headers.get(i + 1).copied().unwrap_or(segment.end);
        pieces.push(Segment::new(start, end));
    }
    pieces
}

/// Cut after every run of two or more newlines that is not inside a code block.
///
/// The newline run stays with the preceding piece.
#[must_use]
pub fn split_at_paragraphs(segment: Segment, ctx: &SplitContext<'_>) -> Vec<Segment> {
    let bytes = segment.slice(ctx.text).as_bytes();
    let mut pieces = Vec::new();
    let mut piece_start = segment.start;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'\n' {
            i += 1;
            continue;
        }

        let run_start = i;
        while i < bytes.len() && bytes[i] == b'\n' {
            i += 1;
        }

        let cut = segment.start + i;
        if i - run_start >= 2
            && cut > piece_start
            && cut < segment.end
            && !ctx.cuts_code_block(cut)
        {
            pieces.push(Segment::new(piece_start, cut));
            piece_start = cut;
        }
    }

    pieces.push(Segment::new(piece_start, segment.end));
    pieces
}

/// Pack whole lines greedily up to `max_chars`.
///
/// A cut that would land inside a code block is postponed until the block
/// closes. A single line longer than `max_chars` stays whole.
#[must_use]
pub fn split_at_lines(segment: Segment, ctx: &SplitContext<'_>) -> Vec<Segment> {
    let max = ctx.options.max_chars;
    let mut pieces = Vec::new();
    let mut piece_start = segment.start;
    let mut piece_len = 0;
    let mut offset = segment.start;

    for line in segment.slice(ctx.text).split_inclusive('\n') {
        let line_len = line.chars().count();
        if piece_len > 0
            && piece_len + line_len > max
            && !ctx.cuts_code_block(offset)
        {
            pieces.push(Segment::new(piece_start, offset));
            piece_start = offset;
            piece_len = 0;
        }
        piece_len += line_len;
        offset += line.len();
    }

    pieces.push(Segment::new(piece_start, segment.end));
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize;
    use starkdocs_core::SplitOptions;

    fn options(max_chars: usize) -> SplitOptions {
        SplitOptions {
            max_chars,
            min_chars: 0,
            overlap: 0,
            ..Default::default()
        }
    }

    fn whole(text: &str) -> Segment {
        Segment::new(0, text.len())
    }

    fn assert_tiles(pieces: &[Segment], parent: Segment) {
        assert_eq!(pieces.first().map(|p| p.start), Some(parent.start));
        assert_eq!(pieces.last().map(|p| p.end), Some(parent.end));
        for pair in pieces.windows(2) {
            assert_eq!(pair[0].end, pair[1].start, "pieces must be contiguous");
        }
    }

    #[test]
    fn test_split_at_headers_with_preamble() {
        let text = "intro\n# A\nbody\n## B\nmore\n### C\nleaf";
        let tokens = tokenize(text);
        let opts = options(10);
        let ctx = SplitContext::new(text, &tokens, &opts);

        let pieces = split_at_headers(whole(text), &ctx);
        assert_eq!(pieces.len(), 3);
        assert_eq!(pieces[0].slice(text), "intro\n");
        assert!(pieces[1].slice(text).starts_with("# A"));
        // Level 3 is not configured, so C stays inside B
        assert!(pieces[2].slice(text).contains("### C"));
        assert_tiles(&pieces, whole(text));
    }

    #[test]
    fn test_split_at_headers_without_headers() {
        let text = "no headers here";
        let tokens = tokenize(text);
        let opts = options(5);
        let ctx = SplitContext::new(text, &tokens, &opts);

        assert_eq!(split_at_headers(whole(text), &ctx), vec![whole(text)]);
    }

    #[test]
    fn test_split_at_paragraphs_keeps_separator_with_previous() {
        let text = "one\n\ntwo\n\n\nthree";
        let tokens = tokenize(text);
        let opts = options(5);
        let ctx = SplitContext::new(text, &tokens, &opts);

        let pieces = split_at_paragraphs(whole(text), &ctx);
        let slices: Vec<&str> = pieces.iter().map(|p| p.slice(text)).collect();
        assert_eq!(slices, vec!["one\n\n", "two\n\n\n", "three"]);
    }

    #[test]
    fn test_split_at_paragraphs_skips_blank_lines_in_code() {
        let text = "```\nlet a = 1;\n\nlet b = 2;\n```\n\nafter";
        let tokens = tokenize(text);
        let opts = options(5);
        let ctx = SplitContext::new(text, &tokens, &opts);

        let pieces = split_at_paragraphs(whole(text), &ctx);
        assert_eq!(pieces.len(), 2);
        assert!(pieces[0].slice(text).ends_with("```\n\n"));
        assert_eq!(pieces[1].slice(text), "after");
    }

    #[test]
    fn test_split_at_paragraphs_splits_code_when_not_preserved() {
        let text = "```\nlet a = 1;\n\nlet b = 2;\n```";
        let tokens = tokenize(text);
        let opts = SplitOptions {
            preserve_code_blocks: false,
            ..options(5)
        };
        let ctx = SplitContext::new(text, &tokens, &opts);

        assert_eq!(split_at_paragraphs(whole(text), &ctx).len(), 2);
    }

    #[test]
    fn test_split_at_lines_packs_to_max() {
        let text = "aaaa\nbbbb\ncccc\ndddd";
        let tokens = tokenize(text);
        let opts = options(10);
        let ctx = SplitContext::new(text, &tokens, &opts);

        let pieces = split_at_lines(whole(text), &ctx);
        let slices: Vec<&str> = pieces.iter().map(|p| p.slice(text)).collect();
        assert_eq!(slices, vec!["aaaa\nbbbb\n", "cccc\ndddd"]);
    }

    #[test]
    fn test_split_at_lines_cuts_before_blank_lines() {
        let text = "aaaa\nbbbb\n\n\ncccc";
        let tokens = tokenize(text);
        let opts = options(10);
        let ctx = SplitContext::new(text, &tokens, &opts);

        let pieces = split_at_lines(whole(text), &ctx);
        let slices: Vec<&str> = pieces.iter().map(|p| p.slice(text)).collect();
        assert_eq!(slices, vec!["aaaa\nbbbb\n", "\n\ncccc"]);
    }

    #[test]
    fn test_split_at_lines_trailing_newline_run_within_max() {
        let text = "123456789\n\n\n\n";
        let tokens = tokenize(text);
        let opts = options(10);
        let ctx = SplitContext::new(text, &tokens, &opts);

        let pieces = split_at_lines(whole(text), &ctx);
        let slices: Vec<&str> = pieces.iter().map(|p| p.slice(text)).collect();
        assert_eq!(slices, vec!["123456789\n", "\n\n\n"]);
    }

    #[test]
    fn test_split_at_lines_does_not_cut_inside_code() {
        let text = "```\nline one\nline two\nline three\n```\ntail";
        let tokens = tokenize(text);
        let opts = options(12);
        let ctx = SplitContext::new(text, &tokens, &opts);

        let pieces = split_at_lines(whole(text), &ctx);
        assert_eq!(pieces.len(), 2);
        assert!(pieces[0].slice(text).ends_with("```\n"));
        assert_eq!(pieces[1].slice(text), "tail");
    }

    #[test]
    fn test_recursive_falls_back_to_lines() {
        let line = "word ".repeat(8);
        let text = format!("{line}\n{line}\n{line}\n{line}");
        let tokens = tokenize(&text);
        let opts = options(90);
        let ctx = SplitContext::new(&text, &tokens, &opts);

        let leaves = RecursiveSegmenter::new(ctx).split(whole(&text));
        assert!(leaves.len() > 1);
        for leaf in &leaves {
            assert!(leaf.char_len(&text) <= 90);
        }
        assert_tiles(&leaves, whole(&text));
    }

    #[test]
    fn test_recursive_keeps_oversized_code_block_whole() {
        let body = "x = 1;\n".repeat(20);
        let text = format!("```cairo\n{body}```\n");
        let tokens = tokenize(&text);
        let opts = options(30);
        let ctx = SplitContext::new(&text, &tokens, &opts);

        let leaves = RecursiveSegmenter::new(ctx).split(whole(&text));
        assert_eq!(leaves, vec![whole(&text)]);
    }

    #[test]
    fn test_recursive_returns_single_long_line() {
        let text = "z".repeat(200);
        let tokens = tokenize(&text);
        let opts = options(50);
        let ctx = SplitContext::new(&text, &tokens, &opts);

        let leaves = RecursiveSegmenter::new(ctx).split(whole(&text));
        assert_eq!(leaves, vec![whole(&text)]);
    }

    #[test]
    fn test_small_segment_is_base_case() {
        let text = "# A\n\nshort\n\n# B\n\nshort";
        let tokens = tokenize(text);
        let opts = options(1000);
        let ctx = SplitContext::new(text, &tokens, &opts);

        assert_eq!(RecursiveSegmenter::new(ctx).split(whole(text)), vec![whole(text)]);
    }

    #[test]
    fn test_custom_strategy_order() {
        let text = "one\n\ntwo\n\nthree";
        let tokens = tokenize(text);
        let opts = options(6);
        let ctx = SplitContext::new(text, &tokens, &opts);

        let only_lines = [SplitStrategy::Lines];
        let leaves = RecursiveSegmenter::with_strategies(ctx, &only_lines).split(whole(text));
        assert_tiles(&leaves, whole(text));
        assert!(leaves.len() > 1);
    }
}
