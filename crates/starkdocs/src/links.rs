//! Source links for ingested chunks.

use starkdocs_chunker::slugify;
use starkdocs_core::{SourceLinkResolver, ROOT_TITLE};

/// Resolves `{base_url}/{document path without extension}#{slug(title)}`.
///
/// Chunks titled [`ROOT_TITLE`] link to the page itself.
pub struct BaseUrlResolver {
    base_url: String,
}

impl BaseUrlResolver {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url }
    }
}

impl SourceLinkResolver for BaseUrlResolver {
    fn resolve(&self, document: &str, title: &str) -> Option<String> {
        let normalized = document.replace('\\', "/");
        let page = normalized.trim_start_matches("./").trim_start_matches('/');
        let page = page
            .rsplit_once('.')
            .filter(|(_, ext)| !ext.contains('/'))
            .map_or(page, |(stem, _)| stem);
        if page.is_empty() {
            return None;
        }

        let mut link = format!("{}/{}", self.base_url, page);
        if title != ROOT_TITLE {
            let anchor = slugify(title);
            if !anchor.is_empty() {
                link.push('#');
                link.push_str(&anchor);
            }
        }
        Some(link)
    }
}
