//! Document ingestion: split, hash, link and hand chunks to a sink.

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;
use starkdocs_core::{
    content_hash, ChunkSink, Document, DocumentSplitter, IngestedChunk, SinkError, SinkReport,
    SourceLinkResolver,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// File extensions treated as markdown.
const MARKDOWN_EXTENSIONS: &[&str] = &["md", "markdown"];

/// A markdown file found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Document name: the path relative to the walked directory, `/`-separated
    pub name: String,
    pub path: PathBuf,
}

/// Totals of one ingestion run.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct IngestSummary {
    pub documents: u64,
    pub chunks: u64,
    pub skipped: u64,
    pub report: SinkReport,
}

/// Turns documents into [`IngestedChunk`]s.
pub struct DocumentIngester {
    splitter: Arc<dyn DocumentSplitter>,
    resolver: Option<Arc<dyn SourceLinkResolver>>,
}

impl DocumentIngester {
    pub fn new(splitter: Arc<dyn DocumentSplitter>) -> Self {
        Self {
            splitter,
            resolver: None,
        }
    }

    /// Attach source links resolved by `resolver`.
    #[must_use]
    pub fn with_resolver(mut self, resolver: Arc<dyn SourceLinkResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Split `document` and enrich every chunk.
    pub fn prepare(&self, document: &Document) -> Vec<IngestedChunk> {
        let ingested_at = Utc::now();
        self.splitter
            .split(&document.content)
            .into_iter()
            .map(|chunk| IngestedChunk {
                document: document.name.clone(),
                content_hash: content_hash(&chunk.content),
                source_link: self
                    .resolver
                    .as_ref()
                    .and_then(|r| r.resolve(&document.name, &chunk.meta.title)),
                ingested_at,
                chunk,
            })
            .collect()
    }

    /// Prepare `document` and write it to `sink`.
    pub async fn ingest(
        &self,
        document: &Document,
        sink: &dyn ChunkSink,
    ) -> Result<SinkReport, SinkError> {
        let chunks = self.prepare(document);
        debug!(
            "{} produced {} chunks with {}",
            document.name,
            chunks.len(),
            self.splitter.name()
        );
        sink.write(&document.name, &chunks).await
    }

    /// Read and ingest every file, then flush the sink.
    ///
    /// Unreadable files are logged and skipped.
    pub async fn ingest_files(
        &self,
        files: &[SourceFile],
        sink: &dyn ChunkSink,
    ) -> Result<IngestSummary> {
        let mut summary = IngestSummary::default();

        for file in files {
            let content = match tokio::fs::read_to_string(&file.path).await {
                Ok(content) => content,
                Err(e) => {
                    warn!("Failed to read {:?}: {}", file.path, e);
                    summary.skipped += 1;
                    continue;
                }
            };

            let document = Document::new(file.name.clone(), content);
            let report = self
                .ingest(&document, sink)
                .await
                .with_context(|| format!("Failed to write chunks of {}", file.name))?;

            let chunks = report.inserted + report.updated + report.unchanged;
            info!("Ingested {} ({} chunks)", file.name, chunks);
            summary.documents += 1;
            summary.chunks += chunks;
            summary.report.absorb(report);
        }

        sink.flush()
            .await
            .with_context(|| format!("Failed to flush {} sink", sink.name()))?;
        Ok(summary)
    }
}

/// Collect markdown files from files and directories, in a stable order.
pub fn collect_sources(paths: &[PathBuf]) -> Result<Vec<SourceFile>> {
    let mut sources = Vec::new();

    for path in paths {
        if path.is_file() {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .with_context(|| format!("Not a file name: {}", path.display()))?;
            sources.push(SourceFile {
                name,
                path: path.clone(),
            });
            continue;
        }
        if !path.is_dir() {
            anyhow::bail!("Path does not exist: {}", path.display());
        }

        for entry in WalkDir::new(path).follow_links(false).sort_by_file_name() {
            let entry = entry.context("Failed to read directory entry")?;
            if !entry.file_type().is_file() || !is_markdown(entry.path()) {
                continue;
            }
            let relative = entry
                .path()
                .strip_prefix(path)
                .with_context(|| format!("{} is outside {}", entry.path().display(), path.display()))?;
            let name = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            sources.push(SourceFile {
                name,
                path: entry.path().to_path_buf(),
            });
        }
    }

    info!("Found {} markdown documents", sources.len());
    Ok(sources)
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            MARKDOWN_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}
