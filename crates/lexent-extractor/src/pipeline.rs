//! Hybrid extraction pipeline
//!
//! Segmenter -> tagger adapter -> validator per chunk, then fallback
//! patterns over the full text, split repair and a single deduplication
//! pass over the pooled candidates.

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::stream::{self, StreamExt};

use crate::dedup::{deduplicate, CandidatePool};
use crate::fallback::FallbackMatcher;
use crate::lexicon::Lexicon;
use crate::segment::segment;
use crate::split;
use crate::tagger::{SpanTagger, TaggerAdapter};
use crate::validator::Validator;
use crate::{Candidate, EntitySet, RawSpan};
use lexent_core::{AppConfig, ExtractionConfig};

const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);
const DEFAULT_CONCURRENCY: usize = 4;

/// Person and organization extractor over injected tagger oracles
///
/// Holds no per-document state: every `extract` call owns its pool, so one
/// extractor can serve documents back to back or from several tasks.
#[derive(Clone)]
pub struct HybridExtractor {
    /// Oracles, bounded by the per-call timeout
    adapter: TaggerAdapter,

    /// Span and candidate rules
    validator: Validator,

    /// Full-text organization patterns
    fallback: FallbackMatcher,

    /// Pipeline switches and chunk size
    config: ExtractionConfig,

    /// Chunks tagged at once
    max_concurrency: usize,
}

impl HybridExtractor {
    /// Create an extractor with default validator and timeouts
    pub fn new(taggers: Vec<Arc<dyn SpanTagger>>) -> Self {
        Self {
            adapter: TaggerAdapter::new(taggers, DEFAULT_TIMEOUT),
            validator: Validator::new(),
            fallback: FallbackMatcher::new(),
            config: ExtractionConfig::default(),
            max_concurrency: DEFAULT_CONCURRENCY,
        }
    }

    /// Create from application config
    ///
    /// The lexicon extras from `config` feed the validator; taggers are
    /// passed in already initialized.
    pub fn from_config(config: &AppConfig, taggers: Vec<Arc<dyn SpanTagger>>) -> Self {
        Self::new(taggers)
            .with_validator(Validator::with_lexicon(Lexicon::with_config(&config.lexicon)))
            .with_extraction_config(config.extraction.clone())
            .with_timeout(Duration::from_millis(config.tagger.timeout_ms))
            .with_max_concurrency(config.tagger.max_concurrency)
    }

    /// Set the validator
    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = validator;
        self
    }

    pub fn with_extraction_config(mut self, config: ExtractionConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the per-oracle, per-chunk timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.adapter = self.adapter.with_timeout(timeout);
        self
    }

    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    /// Extract the deduplicated people and organizations of `text`
    ///
    /// Never fails: oracle errors cost recall for their chunk and are
    /// logged.
    pub async fn extract(&self, text: &str) -> EntitySet {
        let start_time = Instant::now();

        let pool = self.candidates(text).await;
        let entities = deduplicate(&pool, &self.validator);

        tracing::info!(
            candidates = pool.len(),
            people = entities.people.len(),
            organizations = entities.organizations.len(),
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "Extraction completed"
        );

        entities
    }

    /// Pool the candidates of `text` without deduplicating them
    pub async fn candidates(&self, text: &str) -> CandidatePool {
        // 1. Tag chunks with bounded parallelism, keeping chunk order
        let chunks: Vec<&str> = segment(text, self.config.max_chunk_chars).collect();
        let spans: Vec<Vec<RawSpan>> = stream::iter(chunks.iter().map(|c| self.adapter.spans(c)))
            .buffered(self.max_concurrency)
            .collect()
            .await;
        tracing::debug!(chunks = chunks.len(), "Chunks tagged");

        // 2. Validate tagger spans
        let mut candidates: Vec<Candidate> = Vec::new();
        for span in spans.iter().flatten() {
            match self.validator.validate(span) {
                Some(candidate) => {
                    tracing::debug!(
                        text = candidate.text(),
                        category = %candidate.category(),
                        "Span kept"
                    );
                    candidates.push(candidate);
                }
                None => {
                    tracing::debug!(text = %span.text, label = ?span.label, "Span discarded");
                }
            }
        }

        // 3. Recover organizations the taggers missed
        if self.config.enable_fallback {
            candidates.extend(self.fallback.scan(text));
        }

        // 4. Repair over-merged organizations
        let mut pool = CandidatePool::new();
        for candidate in candidates {
            if self.config.enable_split {
                pool.extend(split::expand(candidate));
            } else {
                pool.push(candidate);
            }
        }

        pool
    }
}
