//! Merging of undersized neighboring segments.

use tracing::debug;

use crate::segment::{Segment, SplitContext};

/// Merges small contiguous segments and keeps boundaries out of code blocks.
pub struct SegmentMerger<'a> {
    ctx: SplitContext<'a>,
}

impl<'a> SegmentMerger<'a> {
    #[must_use]
    pub fn new(ctx: SplitContext<'a>) -> Self {
        Self { ctx }
    }

    /// Merge a contiguous run of segments left to right.
    ///
    /// Two neighbors merge when either is below `min_chars` or whitespace only,
    /// and the union fits in `max_chars`. An undersized final segment is always absorbed by its
    /// predecessor. If the accumulated tail is still undersized it is folded
    /// into the previous output segment as long as that stays within
    /// `1.5 * max_chars`.
    #[must_use]
    pub fn merge(&self, segments: &[Segment]) -> Vec<Segment> {
        let Some((&first, rest)) = segments.split_first() else {
            return Vec::new();
        };

        let text = self.ctx.text;
        let min = self.ctx.options.min_chars;
        let max = self.ctx.options.max_chars;

        let mut merged: Vec<Segment> = Vec::with_capacity(segments.len());
        let mut current = first;
        let mut current_len = current.char_len(text);
        let mut current_blank = is_blank(current, text);

        for (i, &next) in rest.iter().enumerate() {
            let next_len = next.char_len(text);
            let next_blank = is_blank(next, text);
            let is_last = i + 1 == rest.len();
            let undersized = current_len < min || next_len < min || current_blank || next_blank;

            if (undersized && current_len + next_len <= max) || (is_last && next_len < min) {
                current = current.join(next);
                current_len += next_len;
                current_blank &= next_blank;
            } else {
                merged.push(current);
                current = next;
                current_len = next_len;
                current_blank = next_blank;
            }
        }

        let relaxed_max = max + max / 2;
        let fold_into_previous = current_len < min
            && merged
                .last()
                .is_some_and(|previous| previous.char_len(text) + current_len <= relaxed_max);
        match merged.last_mut() {
            Some(previous) if fold_into_previous => *previous = previous.join(current),
            _ => merged.push(current),
        }

        debug!("Merged {} segments into {}", segments.len(), merged.len());

        if self.ctx.options.preserve_code_blocks {
            self.seal_code_blocks(merged)
        } else {
            merged
        }
    }

    /// Move any boundary that falls inside a code block to the block's close.
    fn seal_code_blocks(&self, segments: Vec<Segment>) -> Vec<Segment> {
        let mut sealed = Vec::with_capacity(segments.len());
        let mut floor = 0;

        for mut segment in segments {
            segment.start = segment.start.max(floor);
            if segment.start >= segment.end {
                continue;
            }
            if let Some(block) = self.ctx.tokens.code_block_containing(segment.end) {
                segment.end = block.end;
            }
            floor = segment.end;
            sealed.push(segment);
        }

        sealed
    }
}

fn is_blank(segment: Segment, text: &str) -> bool {
    segment.slice(text).trim().is_empty()
}
