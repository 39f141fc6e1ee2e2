//! Error types for starkdocs.

use thiserror::Error;

/// Main error type for starkdocs operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Splitting failed or was misconfigured
    #[error("chunking error: {0}")]
    Chunking(#[from] ChunkError),

    /// Writing chunks downstream failed
    #[error("sink error: {0}")]
    Sink(#[from] SinkError),

    /// I/O error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),
}

/// Chunking errors.
#[derive(Error, Debug)]
pub enum ChunkError {
    /// A splitter option violates its constraint. Raised at construction time.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Chunk sink errors.
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("sink initialization failed: {0}")]
    Init(String),

    #[error("write failed: {0}")]
    Write(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Result type alias for starkdocs operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    // ========== ChunkError Tests ==========

    #[test]
    fn test_chunk_error_invalid_config_display() {
        let err = ChunkError::InvalidConfig("max_chars must be greater than 0".to_string());
        assert_eq!(
            err.to_string(),
            "invalid configuration: max_chars must be greater than 0"
        );
    }

    // ========== SinkError Tests ==========

    #[test]
    fn test_sink_error_write_display() {
        let err = SinkError::Write("disk full".to_string());
        assert_eq!(err.to_string(), "write failed: disk full");
    }

    #[test]
    fn test_sink_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err: SinkError = io_err.into();
        assert!(matches!(err, SinkError::Io(_)));
        assert!(err.to_string().contains("read-only"));
    }

    // ========== Main Error Tests ==========

    #[test]
    fn test_error_from_chunk_error() {
        let chunk_err = ChunkError::InvalidConfig("header_levels must not be empty".to_string());
        let err: Error = chunk_err.into();
        assert!(matches!(err, Error::Chunking(_)));
        assert!(err.to_string().contains("header_levels"));
    }

    #[test]
    fn test_error_from_sink_error() {
        let sink_err = SinkError::Init("missing directory".to_string());
        let err: Error = sink_err.into();
        assert!(matches!(err, Error::Sink(_)));
        assert!(err.to_string().contains("missing directory"));
    }

    #[test]
    fn test_error_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_error_config_display() {
        let err = Error::Config("invalid path".to_string());
        assert_eq!(err.to_string(), "config error: invalid path");
    }

    #[test]
    fn test_error_chain_io_to_sink_to_main() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "chunks.jsonl not found");
        let sink_err: SinkError = io_err.into();
        let main_err: Error = sink_err.into();

        assert!(matches!(main_err, Error::Sink(SinkError::Io(_))));
        assert!(main_err.to_string().contains("sink error"));
    }

    #[test]
    fn test_chunk_error_debug() {
        let err = ChunkError::InvalidConfig("negative size".to_string());
        let debug_str = format!("{:?}", err);
        assert!(debug_str.contains("InvalidConfig"));
    }
}
