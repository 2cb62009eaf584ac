//! Remote span tagger
//!
//! Talks to a tagging service over HTTP. The service receives one chunk per
//! request and answers with its spans:
//!
//! ```text
//! POST <endpoint>   {"text": "Anita Verma joined Tata Steel"}
//! 200 OK            [{"text": "Anita Verma", "label": "PER"}, ...]
//! ```
//!
//! Token-classification servers that answer with `word`/`entity_group`
//! fields are accepted as well.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::tagger::{SpanTagger, TaggedSpan};
use lexent_core::{LexentError, Result};

/// HTTP tagging service client
pub struct HttpSpanTagger {
    client: Client,
    endpoint: String,
}

#[derive(Debug, Serialize)]
struct TagRequest<'a> {
    text: &'a str,
}

impl HttpSpanTagger {
    /// Create a new client for `endpoint`
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl SpanTagger for HttpSpanTagger {
    fn name(&self) -> &str {
        "http"
    }

    async fn tag(&self, text: &str) -> Result<Vec<TaggedSpan>> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&TagRequest { text })
            .send()
            .await
            .map_err(|e| LexentError::Tagger(format!("Request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(LexentError::Tagger(format!(
                "Tagger service error {status}: {error_text}"
            )));
        }

        response
            .json()
            .await
            .map_err(|e| LexentError::Tagger(format!("Failed to parse tagger response: {e}")))
    }
}
