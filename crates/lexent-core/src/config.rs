//! Lexent Configuration Management
//!
//! Handles configuration from config files and environment variables,
//! with defaults that work out of the box for the built-in tagger.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Extraction pipeline configuration
    pub extraction: ExtractionConfig,

    /// Span tagger configuration
    pub tagger: TaggerConfig,

    /// Extra vocabulary merged into the built-in lexicon
    pub lexicon: LexiconConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env_override()
    }

    /// Load from a TOML file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::FileReadError {
            path: path.clone(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path,
            message: e.to_string(),
        })
    }

    /// Load from an optional file, then apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let base = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        base.with_env_override()
    }

    /// Merge with environment variables (env takes precedence)
    pub fn with_env_override(self) -> Result<Self, ConfigError> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Tagger
        if let Some(kind) = lookup("LEXENT_TAGGER") {
            self.tagger.kind = kind.parse()?;
        }
        if let Some(endpoint) = lookup("LEXENT_TAGGER_ENDPOINT") {
            self.tagger.endpoint = Some(endpoint);
        }
        if let Some(timeout) = lookup("LEXENT_TAGGER_TIMEOUT_MS") {
            self.tagger.timeout_ms = parse_number("LEXENT_TAGGER_TIMEOUT_MS", timeout)?;
        }

        // Extraction
        if let Some(max_chars) = lookup("LEXENT_MAX_CHUNK_CHARS") {
            self.extraction.max_chunk_chars = parse_number("LEXENT_MAX_CHUNK_CHARS", max_chars)?;
        }

        // Logging
        if let Some(level) = lookup("LOG_LEVEL") {
            self.logging.level = level;
        }

        Ok(self)
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            value,
        })
}

/// Extraction pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Upper bound on the size of a tagged chunk (characters)
    pub max_chunk_chars: usize,

    /// Run the regex fallback scan over the full text
    pub enable_fallback: bool,

    /// Split organization spans merged through repeated "of"
    pub enable_split: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_chunk_chars: 512,
            enable_fallback: true,
            enable_split: true,
        }
    }
}

/// Span tagger configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TaggerConfig {
    /// Which tagger backs the pipeline
    pub kind: TaggerKind,

    /// Endpoint for the HTTP tagger
    pub endpoint: Option<String>,

    /// Per-chunk tagger timeout in milliseconds
    pub timeout_ms: u64,

    /// Maximum chunks tagged concurrently
    pub max_concurrency: usize,
}

impl Default for TaggerConfig {
    fn default() -> Self {
        Self {
            kind: TaggerKind::Heuristic,
            endpoint: None,
            timeout_ms: 5_000,
            max_concurrency: 4,
        }
    }
}

/// Supported tagger backends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaggerKind {
    #[default]
    Heuristic,
    Http,
}

impl std::str::FromStr for TaggerKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "heuristic" => Ok(Self::Heuristic),
            "http" => Ok(Self::Http),
            _ => Err(ConfigError::InvalidValue {
                key: "LEXENT_TAGGER".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for TaggerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Heuristic => write!(f, "heuristic"),
            Self::Http => write!(f, "http"),
        }
    }
}

/// Additional lexicon terms (lowercase, merged into the defaults)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LexiconConfig {
    pub extra_junk_terms: Vec<String>,
    pub extra_address_terms: Vec<String>,
    pub extra_organization_keywords: Vec<String>,
    pub extra_location_terms: Vec<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// JSON format for logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}
