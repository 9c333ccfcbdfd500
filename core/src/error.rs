use std::path::PathBuf;
use thiserror::Error;

/// Result type for rawbids operations
pub type Result<T> = std::result::Result<T, RawbidsError>;

/// Error types for rawbids operations
///
/// Only fatal conditions live here. Recoverable conditions (a category
/// pattern matching zero raw files, a field map with no discoverable
/// paired image) are surfaced as warnings and never abort the run.
#[derive(Error, Debug)]
pub enum RawbidsError {
    /// Raw data directory does not exist
    #[error("raw data root is not a directory: {}", .0.display())]
    InvalidRawRoot(PathBuf),

    /// External converter returned a nonzero exit status
    #[error("conversion failed for {} (exit status {})", .input.display(), .status)]
    ConversionFailed { input: PathBuf, status: i32 },

    /// External converter could not be spawned
    #[error("failed to run converter {}: {}", .binary.display(), .source)]
    ConverterUnavailable {
        binary: PathBuf,
        source: std::io::Error,
    },

    /// Sidecar metadata document is not a JSON object
    #[error("sidecar is not a JSON object: {}", .0.display())]
    MalformedSidecar(PathBuf),

    /// Glob pattern construction error
    #[error("bad glob pattern: {0}")]
    PatternError(#[from] glob::PatternError),

    /// Sidecar (de)serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// I/O error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
