//! Vocabularies used by the validator and the deduplicator
//!
//! All terms are stored lowercase. Tokens are compared after lowercasing
//! and stripping surrounding punctuation, so "Ltd." matches "ltd".

use std::collections::HashSet;

use lexent_core::LexiconConfig;

/// Word lists backing the heuristic rules
#[derive(Debug, Clone)]
pub struct Lexicon {
    junk_terms: HashSet<String>,
    address_terms: HashSet<String>,
    address_phrases: Vec<String>,
    narrative_verbs: HashSet<String>,
    organization_keywords: HashSet<String>,
    legal_suffixes: HashSet<String>,
    location_terms: HashSet<String>,
}

impl Lexicon {
    /// Create a lexicon with the built-in vocabularies
    pub fn new() -> Self {
        let mut lexicon = Self {
            junk_terms: HashSet::new(),
            address_terms: HashSet::new(),
            address_phrases: Vec::new(),
            narrative_verbs: HashSet::new(),
            organization_keywords: HashSet::new(),
            legal_suffixes: HashSet::new(),
            location_terms: HashSet::new(),
        };

        lexicon.init_rejection_terms();
        lexicon.init_organization_terms();
        lexicon
    }

    /// Built-in vocabularies plus the configured extra terms
    pub fn with_config(config: &LexiconConfig) -> Self {
        let mut lexicon = Self::new();
        extend(&mut lexicon.junk_terms, config.extra_junk_terms.as_slice());
        extend(&mut lexicon.address_terms, config.extra_address_terms.as_slice());
        extend(
            &mut lexicon.organization_keywords,
            config.extra_organization_keywords.as_slice(),
        );
        extend(&mut lexicon.location_terms, config.extra_location_terms.as_slice());
        lexicon
    }

    fn init_rejection_terms(&mut self) {
        // Field labels and identifiers that taggers mistake for names
        extend(
            &mut self.junk_terms,
            &[
                "mobile", "email", "pan", "gstin", "ifsc", "ref", "fax", "pin", "phone", "tel",
                "cell", "contact", "address", "dated", "sd",
            ],
        );

        extend(
            &mut self.address_terms,
            &[
                "road", "tower", "towers", "block", "sector", "floor", "bhawan", "bhavan", "nagar",
                "bazaar", "bazar", "market", "near", "street", "lane", "phase", "apartments",
                "apartment", "residency", "complex", "building", "marg", "chowk", "colony",
                "enclave", "plot", "flat", "lines", "valley", "park",
            ],
        );
        self.address_phrases.push("post office".to_string());

        extend(
            &mut self.narrative_verbs,
            &[
                "said", "added", "told", "stated", "says", "asked", "claimed", "alleged",
                "informed", "submitted", "replied", "noted", "deposed", "averred",
            ],
        );

        extend(
            &mut self.location_terms,
            &[
                "chowk", "bazar", "bazaar", "nagar", "district", "tehsil", "taluka", "village",
                "mandal", "road", "colony", "sector", "ward", "gali", "mohalla", "pradesh", "state",
            ],
        );
    }

    fn init_organization_terms(&mut self) {
        extend(
            &mut self.organization_keywords,
            &[
                "ministry", "department", "board", "institute", "council", "commission",
                "university", "trust", "association", "bank", "agency", "court", "tribunal",
                "authority", "society", "committee", "corporation", "government", "police",
                "school", "college", "hospital", "foundation", "federation", "union",
            ],
        );

        extend(
            &mut self.legal_suffixes,
            &[
                "ltd", "limited", "llp", "pvt", "private", "inc", "corp", "corporation", "company",
                "co",
            ],
        );
    }

    pub fn is_junk(&self, text: &str) -> bool {
        self.junk_terms.contains(&text.trim().to_lowercase())
    }

    /// Any token or phrase of `text` names an address component
    pub fn has_address_term(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        let found = self.address_phrases.iter().any(|p| lower.contains(p.as_str()))
            || tokens(&lower).any(|t| self.address_terms.contains(t));
        found
    }

    pub fn has_narrative_verb(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        let found = tokens(&lower).any(|t| self.narrative_verbs.contains(t));
        found
    }

    /// Contains an organization keyword or a legal-entity suffix
    pub fn has_organization_marker(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        let found = tokens(&lower)
            .any(|t| self.organization_keywords.contains(t) || self.legal_suffixes.contains(t));
        found
    }

    pub fn is_legal_suffix(&self, token: &str) -> bool {
        self.legal_suffixes.contains(&normalize_token(token))
    }

    /// Single-token form of `has_organization_marker`
    pub fn is_organization_word(&self, token: &str) -> bool {
        let token = normalize_token(token);
        self.organization_keywords.contains(&token) || self.legal_suffixes.contains(&token)
    }

    pub fn has_location_term(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        let found = tokens(&lower).any(|t| self.location_terms.contains(t));
        found
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::new()
    }
}

fn extend<S: AsRef<str>>(set: &mut HashSet<String>, terms: &[S]) {
    set.extend(terms.iter().map(|t| t.as_ref().trim().to_lowercase()));
}

/// Whitespace tokens with surrounding punctuation removed
fn tokens(text: &str) -> impl Iterator<Item = &str> {
    text.split_whitespace()
        .map(|t| t.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|t| !t.is_empty())
}

fn normalize_token(token: &str) -> String {
    token
        .trim_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase()
}
