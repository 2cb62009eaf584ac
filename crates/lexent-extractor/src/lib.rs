//! Lexent Extractor - Person and organization extraction for legal text
//!
//! Combines statistical span taggers with deterministic heuristics:
//! - Segmenter: bounded, sentence-level chunks for the taggers
//! - Tagger adapter: pools spans from one or more oracles per chunk
//! - Validator: ordered rule list deciding which spans are plausible names
//! - Fallback: regex recovery of company mentions the taggers miss
//! - Split: repairs organization spans merged through repeated "of"
//! - Dedup: substring collapsing and cross-category resolution

use serde::{Deserialize, Serialize};

pub mod dedup;
pub mod fallback;
pub mod heuristic;
pub mod http;
pub mod identifiers;
pub mod lexicon;
pub mod pipeline;
pub mod segment;
pub mod source;
pub mod split;
pub mod tagger;
pub mod validator;

pub use pipeline::HybridExtractor;
pub use tagger::{SpanTagger, TaggedSpan};

// ============================================================================
// Labels and categories
// ============================================================================

/// Label space every oracle output is mapped into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpanLabel {
    Person,
    Organization,
    Other,
}

impl SpanLabel {
    /// Map an oracle's native label (`PER`, `B-ORG`, `ORGANIZATION`, ...)
    pub fn from_native(label: &str) -> Self {
        let label = label.trim().to_uppercase();
        let bare = match label.split_once('-') {
            Some((prefix, rest)) if matches!(prefix, "B" | "I" | "E" | "S" | "L" | "U") => rest,
            _ => label.as_str(),
        };

        match bare {
            "PER" | "PERSON" => Self::Person,
            "ORG" | "ORGANIZATION" | "ORGANISATION" | "COMPANY" => Self::Organization,
            _ => Self::Other,
        }
    }

    /// The entity category, if the label names one
    pub fn category(&self) -> Option<Category> {
        match self {
            Self::Person => Some(Category::Person),
            Self::Organization => Some(Category::Organization),
            Self::Other => None,
        }
    }
}

/// Category of an accepted entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Person,
    Organization,
}

impl Category {
    /// Get the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Person => "person",
            Self::Organization => "organization",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<Category> for SpanLabel {
    fn from(category: Category) -> Self {
        match category {
            Category::Person => Self::Person,
            Category::Organization => Self::Organization,
        }
    }
}

/// Which stage produced a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    Tagger,
    FallbackRegex,
    Split,
}

// ============================================================================
// Spans and candidates
// ============================================================================

/// A labeled span reported by a tagger for one chunk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSpan {
    pub text: String,
    pub label: SpanLabel,
    pub source_chunk: String,
}

impl RawSpan {
    pub fn new(text: impl Into<String>, label: SpanLabel, source_chunk: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            label,
            source_chunk: source_chunk.into(),
        }
    }
}

/// A span that survived validation or pattern recovery
///
/// The text is always trimmed, non-empty, free of control characters and
/// carries at least one uppercase-initial token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Candidate {
    text: String,
    category: Category,
    origin: Origin,
}

impl Candidate {
    /// Build a candidate, or `None` if the text is malformed
    pub fn new(text: &str, category: Category, origin: Origin) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() || text.chars().any(char::is_control) {
            return None;
        }

        let has_upper_token = text
            .split_whitespace()
            .any(|token| token.chars().next().is_some_and(char::is_uppercase));
        if !has_upper_token {
            return None;
        }

        Some(Self {
            text: text.to_string(),
            category,
            origin,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }
}

// ============================================================================
// Result
// ============================================================================

/// Final deduplicated entities of one document, each list sorted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySet {
    pub people: Vec<String>,
    pub organizations: Vec<String>,
}

impl EntitySet {
    pub fn is_empty(&self) -> bool {
        self.people.is_empty() && self.organizations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.people.len() + self.organizations.len()
    }
}
