use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("failed to load \"{title}\" from {}: {source}", .path.display())]
    Load {
        title: String,
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("duplicate title \"{title}\" ({} and {})", .first.display(), .second.display())]
    DuplicateTitle {
        title: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("no texts found in {}", .0.display())]
    EmptyCorpus(PathBuf),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid JSON in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("no usable {resource}: {reasons}")]
    Exhausted { resource: String, reasons: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for analysis operations
pub type Result<T> = std::result::Result<T, AnalysisError>;
