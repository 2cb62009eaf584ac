//! Span tagger adapter
//!
//! Oracles come in two shapes:
//! - `SpanTagger`: returns labeled spans directly (remote services)
//! - `TokenTagger`: returns one IOB tag per token, collapsed into spans by
//!   `IobSpanTagger`
//!
//! `TaggerAdapter` runs every configured oracle on a chunk, bounds each call
//! with a timeout and maps native labels into `SpanLabel`. A failing oracle
//! costs recall for that chunk and nothing else.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::heuristic::HeuristicTokenTagger;
use crate::http::HttpSpanTagger;
use crate::lexicon::Lexicon;
use crate::{RawSpan, SpanLabel};
use lexent_core::{LexentError, Result, TaggerConfig, TaggerKind};

// ============================================================================
// Oracle interfaces
// ============================================================================

/// A span reported by an oracle, label in the oracle's own vocabulary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedSpan {
    #[serde(alias = "word")]
    pub text: String,
    #[serde(alias = "entity_group", alias = "entity")]
    pub label: String,
}

impl TaggedSpan {
    pub fn new(text: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            label: label.into(),
        }
    }
}

/// Trait for span-labeling oracles
///
/// Implementations are loaded once and shared across chunks, so they must
/// support concurrent read-only use.
#[async_trait]
pub trait SpanTagger: Send + Sync {
    /// Identifier used in logs
    fn name(&self) -> &str;

    /// Label the entity spans of one chunk
    async fn tag(&self, text: &str) -> Result<Vec<TaggedSpan>>;
}

/// A token with its IOB tag (`B-PER`, `I-ORG`, `O`, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedToken {
    pub text: String,
    pub tag: String,
}

impl TaggedToken {
    pub fn new(text: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tag: tag.into(),
        }
    }
}

/// Trait for token-level sequence taggers
pub trait TokenTagger: Send + Sync {
    fn name(&self) -> &str;

    fn tag_tokens(&self, text: &str) -> Result<Vec<TaggedToken>>;
}

// ============================================================================
// IOB collapsing
// ============================================================================

/// Parsed form of one IOB/IOBES tag
#[derive(Debug, Clone, PartialEq, Eq)]
enum IobTag {
    Begin(String),
    Inside(String),
    End(String),
    Single(String),
    Outside,
}

impl IobTag {
    fn parse(tag: &str) -> Self {
        let tag = tag.trim().to_uppercase();
        if tag.is_empty() || tag == "O" {
            return Self::Outside;
        }

        match tag.split_once('-') {
            Some(("B", category)) => Self::Begin(category.to_string()),
            Some(("I", category)) => Self::Inside(category.to_string()),
            Some(("E" | "L", category)) => Self::End(category.to_string()),
            Some(("S" | "U", category)) => Self::Single(category.to_string()),
            // Bare category labels continue a run of the same category
            _ => Self::Inside(tag),
        }
    }
}

/// Collapse per-token tags into contiguous spans
///
/// A begin tag opens a span, an inside tag of the same category extends it,
/// anything else closes it. An inside tag without a matching open span
/// starts a new one.
pub fn collapse_iob(tokens: &[TaggedToken]) -> Vec<TaggedSpan> {
    let mut spans = Vec::new();
    let mut open: Option<(Vec<&str>, String)> = None;

    for token in tokens {
        match IobTag::parse(&token.tag) {
            IobTag::Outside => close(&mut open, &mut spans),
            IobTag::Begin(category) => {
                close(&mut open, &mut spans);
                open = Some((vec![token.text.as_str()], category));
            }
            IobTag::Single(category) => {
                close(&mut open, &mut spans);
                spans.push(TaggedSpan::new(token.text.clone(), category));
            }
            IobTag::Inside(category) => extend(&mut open, &mut spans, &token.text, category),
            IobTag::End(category) => {
                extend(&mut open, &mut spans, &token.text, category);
                close(&mut open, &mut spans);
            }
        }
    }

    close(&mut open, &mut spans);
    spans
}

type OpenSpan<'a> = Option<(Vec<&'a str>, String)>;

fn close(open: &mut OpenSpan<'_>, spans: &mut Vec<TaggedSpan>) {
    if let Some((words, category)) = open.take() {
        spans.push(TaggedSpan::new(words.join(" "), category));
    }
}

fn extend<'a>(
    open: &mut OpenSpan<'a>,
    spans: &mut Vec<TaggedSpan>,
    word: &'a str,
    category: String,
) {
    match open.as_mut() {
        Some((words, current)) if *current == category => words.push(word),
        _ => {
            close(open, spans);
            *open = Some((vec![word], category));
        }
    }
}

/// Adapts a `TokenTagger` into a `SpanTagger`
pub struct IobSpanTagger<T> {
    inner: T,
}

impl<T: TokenTagger> IobSpanTagger<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<T: TokenTagger> SpanTagger for IobSpanTagger<T> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn tag(&self, text: &str) -> Result<Vec<TaggedSpan>> {
        let tokens = self.inner.tag_tokens(text)?;
        Ok(collapse_iob(&tokens))
    }
}

// ============================================================================
// Normalization
// ============================================================================

/// Normalize span text: fold typographic characters, collapse whitespace,
/// strip surrounding punctuation
pub fn normalize_span_text(text: &str) -> String {
    let folded: String = text
        .chars()
        .map(|c| match c {
            '\u{2018}' | '\u{2019}' | '\u{201B}' => '\'',
            '\u{201C}' | '\u{201D}' => '"',
            '\u{2010}'..='\u{2015}' => '-',
            c if c.is_whitespace() => ' ',
            c => c,
        })
        .collect();

    let collapsed = folded.split_whitespace().collect::<Vec<_>>().join(" ");

    collapsed
        .trim_matches(|c: char| matches!(c, ',' | ';' | ':' | '"' | '\'' | '(' | ')' | '[' | ']'))
        .trim_end_matches('.')
        .trim()
        .to_string()
}

// ============================================================================
// Adapter
// ============================================================================

/// Runs the configured oracles on one chunk and pools their spans
#[derive(Clone)]
pub struct TaggerAdapter {
    taggers: Vec<Arc<dyn SpanTagger>>,
    timeout: Duration,
}

impl TaggerAdapter {
    pub fn new(taggers: Vec<Arc<dyn SpanTagger>>, timeout: Duration) -> Self {
        Self { taggers, timeout }
    }

    /// Number of configured oracles
    pub fn len(&self) -> usize {
        self.taggers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.taggers.is_empty()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Same oracles, different timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Spans of every oracle for `chunk`, in oracle order
    pub async fn spans(&self, chunk: &str) -> Vec<RawSpan> {
        let runs = self
            .taggers
            .iter()
            .map(|tagger| self.run(tagger.as_ref(), chunk));

        futures::future::join_all(runs)
            .await
            .into_iter()
            .flatten()
            .collect()
    }

    async fn run(&self, tagger: &dyn SpanTagger, chunk: &str) -> Vec<RawSpan> {
        let outcome = match tokio::time::timeout(self.timeout, tagger.tag(chunk)).await {
            Ok(result) => result,
            Err(_) => Err(LexentError::Timeout {
                tagger: tagger.name().to_string(),
                millis: self.timeout.as_millis() as u64,
            }),
        };

        let tagged = match outcome {
            Ok(tagged) => tagged,
            Err(e) => {
                warn!(tagger = tagger.name(), error = %e, "Tagger failed, chunk skipped");
                return Vec::new();
            }
        };

        debug!(tagger = tagger.name(), spans = tagged.len(), "Chunk tagged");

        tagged
            .into_iter()
            .filter_map(|span| {
                let text = normalize_span_text(&span.text);
                (!text.is_empty())
                    .then(|| RawSpan::new(text, SpanLabel::from_native(&span.label), chunk))
            })
            .collect()
    }
}

// ============================================================================
// Factory function
// ============================================================================

/// Create the oracle described by `config`
pub fn create_tagger(config: &TaggerConfig, lexicon: Arc<Lexicon>) -> Result<Arc<dyn SpanTagger>> {
    match config.kind {
        TaggerKind::Heuristic => Ok(Arc::new(IobSpanTagger::new(
            HeuristicTokenTagger::with_lexicon(lexicon),
        ))),
        TaggerKind::Http => {
            let endpoint = config.endpoint.as_deref().ok_or_else(|| {
                LexentError::Config("tagger.endpoint is required for the http tagger".to_string())
            })?;
            Ok(Arc::new(HttpSpanTagger::new(endpoint)))
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
