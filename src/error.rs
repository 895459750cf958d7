use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipeLensError {
    #[error("Unknown source for patterns: {0}")]
    UnknownSource(String),

    #[error("Missing key in common patterns: '{0}'")]
    MissingCommonPatterns(String),

    #[error("Failed to read pattern config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse pattern config {path}: {source}")]
    ConfigSyntax {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("Invalid pattern config: {0}")]
    ConfigStructure(String),

    #[error("Invalid regex pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PipeLensError>;
