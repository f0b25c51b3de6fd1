//! Error types for condition translation and backend configuration

use std::path::PathBuf;
use thiserror::Error;

/// Translation error type.
///
/// Every variant is fatal for the query being translated; no partial SQL is
/// ever returned alongside one of these.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranslateError {
    /// A full-text phrase contains rule-style wildcards, which MATCH cannot express
    #[error("Wildcards in SQLite full text search are not supported: {phrase}")]
    UnsupportedFtsWildcard { phrase: String },

    /// More than one MATCH clause ended up in a single query
    #[error(
        "Match operator ({count}) is allowed only once in SQLite, restructure the rule:\n{query}"
    )]
    MultipleFtsClauses { count: usize, query: String },

    /// A map item value did not fit any supported predicate shape
    #[error("Backend does not support map values of type {kind}")]
    UnsupportedValueType { kind: String },
}

/// Result type for translation operations
pub type Result<T> = std::result::Result<T, TranslateError>;

/// Configuration loading error type
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file was not valid TOML for the backend
    #[error("Invalid backend config: {0}")]
    Parse(#[from] toml::de::Error),
}
