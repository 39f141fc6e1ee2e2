//! JSON-lines chunk writer.

use async_trait::async_trait;
use starkdocs_core::{ChunkSink, IngestedChunk, SinkError, SinkReport};
use std::path::{Path, PathBuf};
use tokio::fs::{self, File, OpenOptions};
use tokio::io::{AsyncWriteExt, BufWriter};
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Writes every chunk as one JSON object per line.
///
/// The file has no memory of earlier runs, so every chunk written counts as
/// inserted.
pub struct JsonlSink {
    path: PathBuf,
    writer: Mutex<BufWriter<File>>,
}

impl JsonlSink {
    /// Create (or truncate) the output file, creating parent directories.
    pub async fn create(path: impl Into<PathBuf>) -> Result<Self, SinkError> {
        Self::open(path.into(), false).await
    }

    /// Open the output file for appending, creating it if needed.
    pub async fn append(path: impl Into<PathBuf>) -> Result<Self, SinkError> {
        Self::open(path.into(), true).await
    }

    async fn open(path: PathBuf, append: bool) -> Result<Self, SinkError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|e| {
                SinkError::Init(format!("Failed to create output directory {parent:?}: {e}"))
            })?;
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .append(append)
            .truncate(!append)
            .open(&path)
            .await
            .map_err(|e| SinkError::Init(format!("Failed to open {path:?}: {e}")))?;

        info!("Writing chunks to {:?}", path);
        Ok(Self {
            path,
            writer: Mutex::new(BufWriter::new(file)),
        })
    }

    /// Get the output path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ChunkSink for JsonlSink {
    fn name(&self) -> &str {
        "jsonl"
    }

    async fn write(
        &self,
        document: &str,
        chunks: &[IngestedChunk],
    ) -> Result<SinkReport, SinkError> {
        let mut buf = Vec::new();
        for chunk in chunks {
            serde_json::to_writer(&mut buf, chunk)?;
            buf.push(b'\n');
        }

        let mut writer = self.writer.lock().await;
        writer.write_all(&buf).await?;

        debug!("Wrote {} chunks for {}", chunks.len(), document);
        Ok(SinkReport {
            inserted: chunks.len() as u64,
            ..SinkReport::default()
        })
    }

    async fn flush(&self) -> Result<(), SinkError> {
        let mut writer = self.writer.lock().await;
        writer.flush().await?;
        Ok(())
    }
}
