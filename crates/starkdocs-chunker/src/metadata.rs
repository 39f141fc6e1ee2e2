//! Titles, header paths and identifiers for assembled chunks.

use std::collections::{HashMap, HashSet};

use starkdocs_core::{Chunk, ChunkMeta, ROOT_TITLE};

use crate::overlap::AssembledChunk;
use crate::segment::{char_offset, SplitContext};
use crate::tokenizer::HeaderToken;

/// Attaches [`ChunkMeta`] to assembled chunks.
pub struct MetadataAttacher<'a> {
    ctx: SplitContext<'a>,
}

impl<'a> MetadataAttacher<'a> {
    #[must_use]
    pub fn new(ctx: SplitContext<'a>) -> Self {
        Self { ctx }
    }

    /// Resolve metadata for every chunk, in document order.
    #[must_use]
    pub fn attach(&self, chunks: Vec<AssembledChunk>) -> Vec<Chunk> {
        let text = self.ctx.text;
        let options = self.ctx.options;
        let headers = &self.ctx.tokens.headers;

        let mut stack: Vec<&HeaderToken> = Vec::new();
        let mut replayed = 0;
        let mut counters: HashMap<String, u32> = HashMap::new();
        let mut seen_ids: HashSet<String> = HashSet::new();
        let mut out = Vec::with_capacity(chunks.len());

        for chunk in chunks {
            // Replay every header opening before the chunk's end.
            while let Some(header) = headers.get(replayed).filter(|h| h.start < chunk.end) {
                while stack.last().is_some_and(|top| top.level >= header.level) {
                    stack.pop();
                }
                stack.push(header);
                replayed += 1;
            }

            let title = self
                .ctx
                .tokens
                .headers_within(chunk.core_start, chunk.end)
                .iter()
                .find(|h| options.is_section_level(h.level))
                .or_else(|| {
                    stack
                        .iter()
                        .rev()
                        .find(|h| options.is_section_level(h.level))
                        .copied()
                })
                .map_or_else(|| ROOT_TITLE.to_string(), |h| h.text.clone());

            let counter = counters.entry(title.clone()).or_insert(0);
            let chunk_number = *counter;
            *counter += 1;

            let unique_id = dedupe(
                format_id(&options.id_prefix, &title, chunk_number),
                &mut seen_ids,
            );

            out.push(Chunk {
                content: chunk.content,
                meta: ChunkMeta {
                    title,
                    chunk_number,
                    unique_id,
                    start_char: char_offset(text, chunk.start),
                    end_char: char_offset(text, chunk.end),
                    core_start_char: char_offset(text, chunk.core_start),
                    header_path: stack.iter().map(|h| h.text.clone()).collect(),
                },
            });
        }

        out
    }
}

fn format_id(prefix: &str, title: &str, chunk_number: u32) -> String {
    let slug = slugify(title);
    if prefix.is_empty() {
        format!("{slug}-{chunk_number}")
    } else {
        format!("{prefix}-{slug}-{chunk_number}")
    }
}

/// Distinct titles can share a slug; suffix repeats until the id is free.
fn dedupe(id: String, seen: &mut HashSet<String>) -> String {
    if seen.insert(id.clone()) {
        return id;
    }
    let mut k = 1;
    loop {
        let candidate = format!("{id}-{k}");
        if seen.insert(candidate.clone()) {
            return candidate;
        }
        k += 1;
    }
}

/// Lowercase, hyphen-separated form of a title.
///
/// Word characters are kept, whitespace and hyphen runs become one hyphen,
/// everything else is dropped, and edge hyphens are trimmed.
#[must_use]
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_hyphen = false;

    for c in title.chars() {
        if c.is_alphanumeric() || c == '_' {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.extend(c.to_lowercase());
        } else if c.is_whitespace() || c == '-' {
            pending_hyphen = true;
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize;
    use starkdocs_core::SplitOptions;

    fn assembled(text: &str, ranges: &[(usize, usize, usize)]) -> Vec<AssembledChunk> {
        ranges
            .iter()
            .map(|&(start, core_start, end)| AssembledChunk {
                content: text[start..end].to_string(),
                start,
                core_start,
                end,
            })
            .collect()
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Getting Started"), "getting-started");
        assert_eq!(slugify("  Storage -- Layout!  "), "storage-layout");
        assert_eq!(slugify("felt252 & u256"), "felt252-u256");
        assert_eq!(slugify("snake_case_name"), "snake_case_name");
        assert_eq!(slugify("Ünïcode Title"), "ünïcode-title");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_title_and_path_from_headers() {
        let text = "# A\n\nbody1\n\n## B\n\nbody2";
        let tokens = tokenize(text);
        let opts = SplitOptions::default();
        let ctx = SplitContext::new(text, &tokens, &opts);

        let b = text.find("## B").unwrap();
        let chunks = assembled(text, &[(0, 0, b), (b, b, text.len())]);
        let chunks = MetadataAttacher::new(ctx).attach(chunks);

        assert_eq!(chunks[0].meta.title, "A");
        assert_eq!(chunks[0].meta.header_path, vec!["A"]);
        assert_eq!(chunks[0].meta.unique_id, "a-0");
        assert_eq!(chunks[1].meta.title, "B");
        assert_eq!(chunks[1].meta.header_path, vec!["A", "B"]);
        assert_eq!(chunks[1].meta.start_char, b);
    }

    #[test]
    fn test_title_falls_back_to_ancestor() {
        let text = "## Section\n\nfirst\n\n### Detail\n\nsecond";
        let tokens = tokenize(text);
        let opts = SplitOptions::default();
        let ctx = SplitContext::new(text, &tokens, &opts);

        let d = text.find("### Detail").unwrap();
        let chunks = assembled(text, &[(0, 0, d), (d, d, text.len())]);
        let chunks = MetadataAttacher::new(ctx).attach(chunks);

        // Level 3 is not configured, so the nearest level-2 ancestor names it.
        assert_eq!(chunks[1].meta.title, "Section");
        assert_eq!(chunks[1].meta.chunk_number, 1);
        assert_eq!(chunks[1].meta.unique_id, "section-1");
        assert_eq!(chunks[1].meta.header_path, vec!["Section", "Detail"]);
    }

    #[test]
    fn test_overlap_prefix_does_not_claim_title() {
        let text = "# A\n\nbody1\n\n# B\n\nbody2 body2";
        let tokens = tokenize(text);
        let opts = SplitOptions::default();
        let ctx = SplitContext::new(text, &tokens, &opts);

        let b = text.find("# B").unwrap();
        let body2 = text.find("body2").unwrap();
        // Second chunk's overlap reaches back over "# B"; third starts inside B.
        let chunks = assembled(text, &[(0, 0, b), (2, b, body2), (b, body2, text.len())]);
        let chunks = MetadataAttacher::new(ctx).attach(chunks);

        assert_eq!(chunks[1].meta.title, "B");
        assert_eq!(chunks[2].meta.title, "B");
        assert_eq!(chunks[2].meta.chunk_number, 1);
    }

    #[test]
    fn test_root_title_and_prefix() {
        let text = "plain text\n\n### Deep only\n\nmore";
        let tokens = tokenize(text);
        let opts = SplitOptions {
            id_prefix: "cairo-book".to_string(),
            ..Default::default()
        };
        let ctx = SplitContext::new(text, &tokens, &opts);

        let deep = text.find("###").unwrap();
        let chunks = assembled(text, &[(0, 0, deep), (deep, deep, text.len())]);
        let chunks = MetadataAttacher::new(ctx).attach(chunks);

        assert_eq!(chunks[0].meta.title, ROOT_TITLE);
        assert!(chunks[0].meta.header_path.is_empty());
        assert_eq!(chunks[0].meta.unique_id, "cairo-book-root-0");
        assert_eq!(chunks[1].meta.unique_id, "cairo-book-root-1");
        assert_eq!(chunks[1].meta.header_path, vec!["Deep only"]);
    }

    #[test]
    fn test_colliding_slugs_get_suffix() {
        let text = "# Hello World\n\nx\n\n# hello-world\n\ny";
        let tokens = tokenize(text);
        let opts = SplitOptions::default();
        let ctx = SplitContext::new(text, &tokens, &opts);

        let second = text.find("# hello-world").unwrap();
        let chunks = assembled(text, &[(0, 0, second), (second, second, text.len())]);
        let chunks = MetadataAttacher::new(ctx).attach(chunks);

        assert_eq!(chunks[0].meta.unique_id, "hello-world-0");
        assert_eq!(chunks[1].meta.chunk_number, 0);
        assert_eq!(chunks[1].meta.unique_id, "hello-world-0-1");
    }

    #[test]
    fn test_char_offsets_for_non_ascii() {
        let text = "# Étude\n\nçà";
        let tokens = tokenize(text);
        let opts = SplitOptions::default();
        let ctx = SplitContext::new(text, &tokens, &opts);

        let chunks = assembled(text, &[(0, 0, text.len())]);
        let chunks = MetadataAttacher::new(ctx).attach(chunks);

        assert_eq!(chunks[0].meta.end_char, text.chars().count());
        assert_eq!(chunks[0].meta.unique_id, "étude-0");
    }
}
