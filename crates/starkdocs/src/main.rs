//! # starkdocs CLI
//!
//! Command-line ingester for Cairo and Starknet documentation.
//!
//! Markdown pages are split into section-aware chunks, hashed for change
//! detection, linked back to their public URL and written as JSON lines for
//! the embedding stage.
//!
//! ## Commands
//!
//! - `starkdocs split <FILE>` - Print the chunks of one document
//! - `starkdocs ingest <PATH>... --output <FILE>` - Chunk files and directories to JSON lines
//! - `starkdocs config show|init|path` - Inspect configuration
//!
//! ## Examples
//!
//! ```bash
//! # Inspect how a page is chunked
//! starkdocs split src/ch02-01-variables.md --max-chars 1024
//!
//! # Ingest a whole book
//! starkdocs ingest cairo-book/src --output chunks.jsonl --id-prefix cairo-book
//!
//! # Get JSON output
//! starkdocs --format json split README.md
//! ```

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use starkdocs_chunker::MarkdownSplitter;
use starkdocs_core::{Chunk, ChunkSink};
use starkdocs_store::JsonlSink;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

mod config;
mod ingest;
mod links;

use config::Config;
use ingest::{collect_sources, DocumentIngester};
use links::BaseUrlResolver;

#[derive(Parser)]
#[command(name = "starkdocs")]
#[command(about = "Chunk Cairo and Starknet documentation for retrieval")]
#[command(version)]
struct Cli {
    /// Path to config file (default: ~/.config/starkdocs/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (text, json)
    #[arg(short, long, global = true, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Split one markdown file and print its chunks
    Split {
        /// Markdown file
        file: PathBuf,

        #[command(flatten)]
        chunking: ChunkingArgs,
    },

    /// Chunk markdown files and directories into a JSON-lines file
    Ingest {
        /// Files or directories to ingest
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,

        /// Append to the output file instead of replacing it
        #[arg(long)]
        append: bool,

        /// Public docs root for source links (overrides config)
        #[arg(long)]
        base_url: Option<String>,

        #[command(flatten)]
        chunking: ChunkingArgs,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Command-line overrides for the `[chunking]` config section.
#[derive(Args, Debug, Default)]
struct ChunkingArgs {
    /// Maximum chunk size in characters, before overlap
    #[arg(long)]
    max_chars: Option<usize>,

    /// Minimum chunk size in characters
    #[arg(long)]
    min_chars: Option<usize>,

    /// Overlap in characters
    #[arg(long)]
    overlap: Option<usize>,

    /// Header levels that start a section (e.g. 1,2,3)
    #[arg(long, value_delimiter = ',')]
    header_levels: Option<Vec<u8>>,

    /// Prefix for chunk ids
    #[arg(long)]
    id_prefix: Option<String>,

    /// Keep surrounding whitespace in chunk content
    #[arg(long)]
    no_trim: bool,

    /// Allow chunk boundaries inside fenced code blocks
    #[arg(long)]
    no_preserve_code_blocks: bool,
}

impl ChunkingArgs {
    fn apply(self, config: &mut Config) {
        let options = &mut config.chunking;
        if let Some(max_chars) = self.max_chars {
            options.max_chars = max_chars;
        }
        if let Some(min_chars) = self.min_chars {
            options.min_chars = min_chars;
        }
        if let Some(overlap) = self.overlap {
            options.overlap = overlap;
        }
        if let Some(levels) = self.header_levels {
            options.header_levels = levels;
        }
        if let Some(prefix) = self.id_prefix {
            options.id_prefix = prefix;
        }
        if self.no_trim {
            options.trim = false;
        }
        if self.no_preserve_code_blocks {
            options.preserve_code_blocks = false;
        }
    }
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Print sample configuration file
    Init,
    /// Show config file path
    Path,
}

/// Output structure for `split`.
#[derive(Serialize)]
struct SplitOutput<'a> {
    document: String,
    chunks: &'a [Chunk],
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load config from file or CLI-specified path
    let mut config = if let Some(ref path) = cli.config {
        Config::load_from(Some(path.clone()))
            .context(format!("Failed to load config from {}", path.display()))?
    } else {
        Config::load().context("Failed to load config")?
    };

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        config.logging.tracing_level()?
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    match cli.command {
        Commands::Split { file, chunking } => {
            chunking.apply(&mut config);
            let splitter =
                MarkdownSplitter::new(config.chunking).context("Invalid chunking options")?;

            let markdown = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let chunks = splitter.split_to_chunks(&markdown);

            match cli.format {
                OutputFormat::Json => {
                    let output = SplitOutput {
                        document: file.display().to_string(),
                        chunks: &chunks,
                    };
                    println!("{}", serde_json::to_string_pretty(&output)?);
                }
                OutputFormat::Text => {
                    println!("{} chunks from {}\n", chunks.len(), file.display());
                    for chunk in &chunks {
                        let meta = &chunk.meta;
                        println!(
                            "[{}] {} (chars {}-{}, {} chars)",
                            meta.unique_id,
                            meta.header_path.join(" > "),
                            meta.start_char,
                            meta.end_char,
                            chunk.content.chars().count()
                        );
                        println!("   {}", truncate(&chunk.content, 100));
                        println!();
                    }
                }
            }
        }

        Commands::Ingest {
            paths,
            output,
            append,
            base_url,
            chunking,
        } => {
            chunking.apply(&mut config);
            if base_url.is_some() {
                config.sources.base_url = base_url;
            }

            let splitter =
                MarkdownSplitter::new(config.chunking).context("Invalid chunking options")?;
            let mut ingester = DocumentIngester::new(Arc::new(splitter));
            if let Some(base_url) = config.sources.base_url {
                ingester = ingester.with_resolver(Arc::new(BaseUrlResolver::new(base_url)));
            }

            let files = collect_sources(&paths)?;
            if files.is_empty() {
                anyhow::bail!("No markdown files found");
            }

            let sink = if append {
                JsonlSink::append(&output).await
            } else {
                JsonlSink::create(&output).await
            }
            .context("Failed to open output")?;

            let summary = ingester.ingest_files(&files, &sink).await?;
            info!(
                "Wrote {} chunks from {} documents to {} via {} sink",
                summary.chunks,
                summary.documents,
                output.display(),
                sink.name()
            );

            match cli.format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&summary)?);
                }
                OutputFormat::Text => {
                    println!("Ingested {} documents", summary.documents);
                    println!("  Chunks:  {}", summary.chunks);
                    if summary.skipped > 0 {
                        println!("  Skipped: {}", summary.skipped);
                    }
                    println!("  Output:  {}", output.display());
                }
            }
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => match cli.format {
                OutputFormat::Json => {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&config)
                            .context("Failed to serialize config")?
                    );
                }
                OutputFormat::Text => {
                    println!(
                        "{}",
                        toml::to_string_pretty(&config).context("Failed to serialize config")?
                    );
                }
            },
            ConfigAction::Init => {
                println!("{}", Config::sample_toml());
            }
            ConfigAction::Path => {
                if let Some(path) = Config::config_path() {
                    println!("{}", path.display());
                } else {
                    println!("Could not determine config directory");
                }
            }
        },
    }

    Ok(())
}

/// Truncate a string to `max_chars` characters, adding ellipsis if needed.
fn truncate(s: &str, max_chars: usize) -> String {
    let s = s.replace('\n', " ");
    if s.chars().count() <= max_chars {
        s
    } else {
        let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
