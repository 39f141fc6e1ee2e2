//! Single-pass scan for markdown headers and fenced code blocks.
//!
//! The scan works line by line over `\n`-normalized text. A line beginning in
//! column 0 with three or more backticks or tildes starts a fenced block, and
//! the next line beginning with the same three-character fence closes it,
//! whatever follows on that line. Header lines are only recognized outside
//! fenced blocks, so code content never becomes document structure.

use tracing::warn;

/// Fence style of a code block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fence {
    Backtick,
    Tilde,
}

impl Fence {
    /// The three-character opening marker.
    #[must_use]
    pub fn marker(self) -> &'static str {
        match self {
            Fence::Backtick => "```",
            Fence::Tilde => "~~~",
        }
    }

    /// Parse an opening fence line. The fence must start in column 0.
    fn open(line: &str) -> Option<(Fence, &str)> {
        let fence = if line.starts_with("```") {
            Fence::Backtick
        } else if line.starts_with("~~~") {
            Fence::Tilde
        } else {
            return None;
        };
        let info = line.trim_start_matches(fence.char()).trim();
        Some((fence, info))
    }

    fn char(self) -> char {
        match self {
            Fence::Backtick => '`',
            Fence::Tilde => '~',
        }
    }
}

/// A markdown ATX header occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderToken {
    /// Header level, 1 through 6
    pub level: u8,
    /// Header text without markers
    pub text: String,
    /// Byte offset of the header line
    pub start: usize,
    /// Byte offset of the end of the header line, newline excluded
    pub end: usize,
}

/// A fenced code block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlockToken {
    /// Byte offset of the opening fence line
    pub start: usize,
    /// Byte offset just past the closing fence line, newline included
    pub end: usize,
    pub fence: Fence,
    /// Language or other info after the opening fence
    pub info: Option<String>,
    /// False when the document ended before a closing fence
    pub closed: bool,
}

impl CodeBlockToken {
    /// Whether `pos` lies strictly between the block's start and end.
    #[must_use]
    pub fn strictly_contains(&self, pos: usize) -> bool {
        self.start < pos && pos < self.end
    }
}

/// Structural tokens of one document.
#[derive(Debug, Clone, Default)]
pub struct Tokens {
    /// Headers in document order
    pub headers: Vec<HeaderToken>,
    /// Code blocks in document order, non-overlapping
    pub code_blocks: Vec<CodeBlockToken>,
}

impl Tokens {
    /// The code block that strictly contains `pos`, if any.
    #[must_use]
    pub fn code_block_containing(&self, pos: usize) -> Option<&CodeBlockToken> {
        let idx = self.code_blocks.partition_point(|block| block.end <= pos);
        self.code_blocks
            .get(idx)
            .filter(|block| block.strictly_contains(pos))
    }

    /// Code blocks intersecting `[start, end)`.
    pub fn code_blocks_within(
        &self,
        start: usize,
        end: usize,
    ) -> impl Iterator<Item = &CodeBlockToken> {
        let first = self.code_blocks.partition_point(|block| block.end <= start);
        self.code_blocks[first..]
            .iter()
            .take_while(move |block| block.start < end)
    }

    /// Headers whose line starts inside `[start, end)`.
    #[must_use]
    pub fn headers_within(&self, start: usize, end: usize) -> &[HeaderToken] {
        let first = self.headers.partition_point(|h| h.start < start);
        let last = self.headers.partition_point(|h| h.start < end);
        &self.headers[first..last]
    }
}

/// Scan `text` once for headers and fenced code blocks.
///
/// An unclosed fence extends to the end of the document and is logged.
#[must_use]
pub fn tokenize(text: &str) -> Tokens {
    let mut tokens = Tokens::default();
    let mut open: Option<CodeBlockToken> = None;
    let mut offset = 0;

    for line in text.split_inclusive('\n') {
        let body = line.strip_suffix('\n').unwrap_or(line);
        let line_start = offset;
        offset += line.len();

        if let Some(block) = open.as_mut() {
            if body.starts_with(block.fence.marker()) {
                block.end = offset;
                block.closed = true;
                if let Some(block) = open.take() {
                    tokens.code_blocks.push(block);
                }
            }
            continue;
        }

        if let Some((fence, info)) = Fence::open(body) {
            open = Some(CodeBlockToken {
                start: line_start,
                end: line_start,
                fence,
                info: (!info.is_empty()).then(|| info.to_string()),
                closed: false,
            });
            continue;
        }

        if let Some((level, text)) = parse_header(body) {
            tokens.headers.push(HeaderToken {
                level,
                text,
                start: line_start,
                end: line_start + body.len(),
            });
        }
    }

    if let Some(mut block) = open {
        block.end = text.len();
        warn!(
            "Unclosed {} code block at byte {}; treating it as running to end of document",
            block.fence.marker(),
            block.start
        );
        tokens.code_blocks.push(block);
    }

    tokens
}

/// Parse an ATX header line (`## Title ##`).
fn parse_header(line: &str) -> Option<(u8, String)> {
    if !line.starts_with('#') {
        return None;
    }

    let hash_count = line.chars().take_while(|c| *c == '#').count();
    if hash_count > 6 {
        return None;
    }

    let rest = &line[hash_count..];
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }

    let rest = rest.trim();
    let stripped = rest.trim_end_matches('#');
    // A closing run only counts when separated from the text by whitespace.
    let text = if stripped.is_empty()
        || stripped.len() == rest.len()
        || stripped.ends_with(char::is_whitespace)
    {
        stripped.trim_end()
    } else {
        rest
    };

    if text.is_empty() {
        return None;
    }
    Some((hash_count as u8, text.to_string()))
}
