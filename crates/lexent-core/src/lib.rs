//! Lexent Core - Shared error types and configuration
//!
//! This crate defines the pieces every other Lexent crate depends on:
//! - Common error types and the `Result` alias
//! - Configuration management (TOML file + environment overrides)

pub mod config;

pub use config::{
    AppConfig, ConfigError, ExtractionConfig, LexiconConfig, LoggingConfig, TaggerConfig,
    TaggerKind,
};

use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Core error types for Lexent operations
#[derive(Error, Debug)]
pub enum LexentError {
    #[error("Document not found: {0}")]
    NotFound(String),

    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Tagger error: {0}")]
    Tagger(String),

    #[error("Tagger {tagger} timed out after {millis}ms")]
    Timeout { tagger: String, millis: u64 },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<ConfigError> for LexentError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LexentError>;
