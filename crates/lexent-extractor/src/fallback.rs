//! Fallback organization patterns
//!
//! Runs over the full, unchunked text and recovers company mentions the
//! taggers tend to miss. Results are purely additive.

use regex::Regex;
use tracing::debug;

use crate::{Candidate, Category, Origin};

/// Legal suffixes that close a "M/s." firm name
const FIRM_SUFFIXES: &[&str] = &[
    "pvt", "private", "llp", "limited", "ltd", "corporation", "company", "co", "inc",
];

/// Lowercase words that may sit inside an unsuffixed firm name
const FIRM_CONNECTORS: &[&str] = &["&", "and", "of"];

/// Tokens searched for a firm suffix after "M/s."
const FIRM_WINDOW: usize = 8;

/// Words that open a sentence rather than a name
const LEADING_WORDS: &[&str] = &[
    "the", "a", "an", "and", "by", "from", "to", "in", "on", "at", "for", "with", "of", "since",
    "that", "this", "whereas", "hereby", "m/s", "messrs",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PatternKind {
    /// Marker followed by a firm name, resolved by token scan
    Messrs,
    /// Capitalized run ending in a trigger word, the whole match is the name
    Suffixed,
}

#[derive(Debug, Clone)]
struct NamedPattern {
    name: &'static str,
    regex: Regex,
    kind: PatternKind,
}

/// Regex scanner for organization mentions
#[derive(Debug, Clone)]
pub struct FallbackMatcher {
    patterns: Vec<NamedPattern>,
}

impl FallbackMatcher {
    /// Create a matcher with the built-in patterns
    pub fn new() -> Self {
        let mut matcher = Self {
            patterns: Vec::new(),
        };

        matcher.add_pattern("messrs", r"(?i)\b(?:m/s|messrs)\b\.?", PatternKind::Messrs);

        // 1-5 capitalized tokens on one line, then the trigger word
        matcher.add_pattern(
            "corporate_suffix",
            r"\b(?:[A-Z][\w&.'-]*[ \t]+){1,5}(?:Enterprises|Industries|Technologies|Consultants|Corporation|Group|Exports|Services|Systems)\b",
            PatternKind::Suffixed,
        );
        matcher.add_pattern(
            "facility_name",
            r"\b(?:[A-Z][\w&.'-]*[ \t]+){1,5}(?:Cement|Factory|House|Corporation|Industries|Group)\b",
            PatternKind::Suffixed,
        );

        matcher
    }

    fn add_pattern(&mut self, name: &'static str, pattern: &str, kind: PatternKind) {
        if let Ok(regex) = Regex::new(pattern) {
            self.patterns.push(NamedPattern { name, regex, kind });
        }
    }

    /// Names of the active patterns
    pub fn pattern_names(&self) -> Vec<&'static str> {
        self.patterns.iter().map(|p| p.name).collect()
    }

    /// Scan `text` for organization mentions
    pub fn scan(&self, text: &str) -> Vec<Candidate> {
        let mut candidates = Vec::new();

        for pattern in &self.patterns {
            for mat in pattern.regex.find_iter(text) {
                let name = match pattern.kind {
                    PatternKind::Messrs => firm_name(&text[mat.end()..]),
                    PatternKind::Suffixed => strip_leading_words(mat.as_str()),
                };

                let Some(name) = name else { continue };
                if let Some(candidate) =
                    Candidate::new(name, Category::Organization, Origin::FallbackRegex)
                {
                    debug!(pattern = pattern.name, text = candidate.text(), "Fallback match");
                    candidates.push(candidate);
                }
            }
        }

        candidates
    }
}

impl Default for FallbackMatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Firm name following a "M/s." marker
///
/// Runs up to and including a legal suffix within the token window, taking
/// any suffixes that directly follow it ("Co. Ltd", "Pvt. Ltd."). Without a
/// suffix the name is the capitalized run before the sentence ends.
fn firm_name(rest: &str) -> Option<&str> {
    let rest = rest.trim_start();
    let line_end = rest.find(['\n', ';']).unwrap_or(rest.len());
    let line = &rest[..line_end];

    let tokens: Vec<(usize, &str)> = token_spans(line).take(FIRM_WINDOW).collect();
    for (i, (start, token)) in tokens.iter().enumerate() {
        let word = bare(token);
        if !FIRM_SUFFIXES.contains(&word.as_str()) {
            continue;
        }

        let mut end = start + token.len();
        for (next_start, next) in &tokens[i + 1..] {
            if !FIRM_SUFFIXES.contains(&bare(next).as_str()) {
                break;
            }
            end = next_start + next.len();
        }
        return non_empty(trim_trailing(&line[..end]));
    }

    let sentence = &line[..sentence_end(line)];
    non_empty(trim_trailing(&sentence[..capitalized_run_end(sentence)]))
}

/// End of the leading run of capitalized tokens, bridging connectors
fn capitalized_run_end(text: &str) -> usize {
    let mut end = 0;

    for (start, token) in token_spans(text) {
        match token.chars().find(|c| c.is_alphanumeric()) {
            Some(c) if c.is_uppercase() || c.is_numeric() => end = start + token.len(),
            _ if FIRM_CONNECTORS.contains(&bare(token).as_str()) => continue,
            _ => break,
        }
    }

    end
}

/// Tokens of `text` with their byte offsets
fn token_spans(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.split_whitespace()
        .map(move |token| (token.as_ptr() as usize - text.as_ptr() as usize, token))
}

fn sentence_end(line: &str) -> usize {
    let mut chars = line.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        let at_break = chars.peek().map_or(true, |(_, next)| next.is_whitespace());
        if matches!(c, '.' | '!' | '?') && at_break {
            return i;
        }
    }
    line.len()
}

/// Drop sentence-initial function words and "M/s" from a suffixed match
fn strip_leading_words(text: &str) -> Option<&str> {
    let mut rest = text.trim();

    while let Some((first, tail)) = rest.split_once(char::is_whitespace) {
        if !LEADING_WORDS.contains(&bare(first).as_str()) {
            break;
        }
        rest = tail.trim_start();
    }

    // A trigger word alone is not a name
    if rest.split_whitespace().count() < 2 {
        return None;
    }
    Some(rest)
}

fn bare(token: &str) -> String {
    token
        .trim_end_matches(|c: char| matches!(c, '.' | ',' | ':' | ')'))
        .to_lowercase()
}

fn trim_trailing(text: &str) -> &str {
    text.trim_end_matches(|c: char| c.is_whitespace() || matches!(c, ',' | '.' | ':' | '-' | ')'))
}

fn non_empty(text: &str) -> Option<&str> {
    (!text.is_empty()).then_some(text)
}
