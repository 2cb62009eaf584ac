//! Built-in token tagger
//!
//! A capitalization-driven IOB tagger that needs no model files. It marks
//! runs of capitalized tokens and labels each run from the words around and
//! inside it:
//! - after an honorific or party role ("Shri", "Smt.", "Petitioner"): PER
//! - after "M/s." or containing an organization word: ORG
//! - containing address vocabulary: LOC
//! - containing statute vocabulary ("Act", "Section"): MISC
//!
//! Person runs are split at connectors ("Anita Verma and Rajesh Sharma"),
//! organization runs keep them ("Bank of India"). The output is noisy by
//! design of the pipeline: the validator and deduplicator clean it up.

use std::sync::Arc;

use crate::lexicon::Lexicon;
use crate::tagger::{TaggedToken, TokenTagger};
use lexent_core::Result;

const HONORIFICS: &[&str] = &[
    "mr", "mrs", "ms", "miss", "dr", "shri", "sri", "smt", "shrimati", "sh", "kumari", "kum",
    "late", "adv", "prof",
];

/// Party and office words that introduce a person
const ROLE_WORDS: &[&str] = &[
    "deponent", "witness", "petitioner", "respondent", "applicant", "plaintiff", "defendant",
    "appellant", "accused", "complainant", "advocate", "notary", "magistrate", "judge",
    "director", "proprietor", "partner",
];

const MESSRS: &[&str] = &["m/s", "messrs"];

/// Capitalized words that never start a name
const FUNCTION_WORDS: &[&str] = &[
    "the", "a", "an", "this", "that", "these", "those", "in", "on", "at", "by", "for", "from",
    "to", "with", "of", "and", "whereas", "hereby", "he", "she", "it", "they", "we", "i", "his",
    "her", "their", "our", "my", "your", "as", "if", "but", "since", "after", "before", "under",
    "between", "dated", "signed", "sd", "verified", "solemnly",
];

const CONNECTORS: &[&str] = &["of", "and", "&", "for"];

/// Business words that mark an organization even without a legal suffix
const CORPORATE_WORDS: &[&str] = &[
    "services", "enterprises", "industries", "technologies", "consultants", "consultancy",
    "group", "exports", "systems", "traders", "motors", "steel", "cement", "pharma",
    "pharmaceuticals", "infra", "finance", "solutions", "associates", "holdings", "ventures",
    "labs", "factory", "mills",
];

const STATUTE_WORDS: &[&str] = &[
    "act", "code", "rules", "regulation", "regulations", "section", "article", "schedule",
    "clause", "order", "amendment",
];

const LEADING_PUNCT: &[char] = &['(', '[', '"', '\''];
const TRAILING_PUNCT: &[char] = &[',', ';', ':', ')', ']', '"', '\'', '!', '?'];

/// Capitalization-driven IOB tagger
#[derive(Debug, Clone)]
pub struct HeuristicTokenTagger {
    lexicon: Arc<Lexicon>,
}

impl HeuristicTokenTagger {
    pub fn new() -> Self {
        Self::with_lexicon(Arc::new(Lexicon::new()))
    }

    pub fn with_lexicon(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }

    fn run_label(&self, words: &[&str], cue: Option<Cue>) -> &'static str {
        let text = words.join(" ");

        if self.lexicon.has_address_term(&text) {
            "LOC"
        } else if words.iter().any(|w| in_list(STATUTE_WORDS, w)) {
            "MISC"
        } else if cue == Some(Cue::Organization) || words.iter().any(|w| self.is_business_word(w)) {
            "ORG"
        } else {
            "PER"
        }
    }

    fn is_business_word(&self, word: &str) -> bool {
        self.lexicon.is_organization_word(word) || in_list(CORPORATE_WORDS, word)
    }

    /// Cut a person-cued run at its first connector
    ///
    /// "Shri Anita Verma of Reliance Industries" names a person and an
    /// employer. The run is kept whole only when the head already reads as a
    /// business ("Petitioner State Bank of India").
    fn person_run_end(&self, pieces: &[Piece<'_>], start: usize, end: usize) -> usize {
        let Some(connector) = (start..end).find(|&k| in_list(CONNECTORS, pieces[k].text())) else {
            return end;
        };

        if pieces[start..connector].iter().any(|p| self.is_business_word(p.text())) {
            end
        } else {
            connector
        }
    }
}

impl Default for HeuristicTokenTagger {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cue {
    Person,
    Organization,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Piece<'a> {
    Word(&'a str),
    Punct(&'a str),
}

impl<'a> Piece<'a> {
    fn text(&self) -> &'a str {
        match self {
            Self::Word(t) | Self::Punct(t) => t,
        }
    }
}

impl TokenTagger for HeuristicTokenTagger {
    fn name(&self) -> &str {
        "heuristic"
    }

    fn tag_tokens(&self, text: &str) -> Result<Vec<TaggedToken>> {
        let pieces = split_pieces(text);
        let mut tags = vec!["O".to_string(); pieces.len()];
        let mut cue = None;
        let mut i = 0;

        while i < pieces.len() {
            let word = match pieces[i] {
                Piece::Punct(_) => {
                    cue = None;
                    i += 1;
                    continue;
                }
                Piece::Word(word) => word,
            };

            if in_list(HONORIFICS, word) || in_list(ROLE_WORDS, word) {
                cue = Some(Cue::Person);
                i += 1;
                continue;
            }
            if in_list(MESSRS, word) {
                cue = Some(Cue::Organization);
                i += 1;
                continue;
            }
            if !is_name_word(word) {
                cue = None;
                i += 1;
                continue;
            }

            let mut end = run_end(&pieces, i);
            if cue == Some(Cue::Person) {
                end = self.person_run_end(&pieces, i, end);
            }
            let words: Vec<&str> = pieces[i..end].iter().map(Piece::text).collect();
            let label = self.run_label(&words, cue);
            let split_connectors = label == "PER";

            let mut inside = false;
            for (offset, word) in words.iter().enumerate() {
                let tag = &mut tags[i + offset];
                if split_connectors && in_list(CONNECTORS, word) {
                    inside = false;
                } else if inside {
                    *tag = format!("I-{label}");
                } else {
                    *tag = format!("B-{label}");
                    inside = true;
                }
            }

            cue = None;
            i = end;
        }

        Ok(pieces
            .iter()
            .zip(tags)
            .map(|(piece, tag)| TaggedToken::new(piece.text(), tag))
            .collect())
    }
}

/// End (exclusive) of the capitalized run starting at `start`
fn run_end(pieces: &[Piece<'_>], start: usize) -> usize {
    let mut end = start + 1;

    while end < pieces.len() {
        match pieces[end] {
            Piece::Word(w) if is_name_word(w) => end += 1,
            Piece::Word(w) if in_list(CONNECTORS, w) => match pieces.get(end + 1) {
                Some(Piece::Word(next)) if is_name_word(next) => end += 2,
                _ => break,
            },
            _ => break,
        }
    }

    end
}

/// Split on whitespace, peeling surrounding punctuation into separate pieces
fn split_pieces(text: &str) -> Vec<Piece<'_>> {
    let mut pieces = Vec::new();

    for raw in text.split_whitespace() {
        let core_start = raw.len() - raw.trim_start_matches(LEADING_PUNCT).len();
        let core_end = raw.trim_end_matches(TRAILING_PUNCT).len().max(core_start);

        if core_start > 0 {
            pieces.push(Piece::Punct(&raw[..core_start]));
        }
        if core_end > core_start {
            pieces.push(Piece::Word(&raw[core_start..core_end]));
        }
        if core_end < raw.len() {
            pieces.push(Piece::Punct(&raw[core_end..]));
        }
    }

    pieces
}

fn is_name_word(word: &str) -> bool {
    word.chars().next().is_some_and(char::is_uppercase)
        && !in_list(FUNCTION_WORDS, word)
        && !in_list(HONORIFICS, word)
        && !in_list(ROLE_WORDS, word)
        && !in_list(MESSRS, word)
}

fn in_list(list: &[&str], word: &str) -> bool {
    let word = word.trim_end_matches('.').to_lowercase();
    list.contains(&word.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tagger::collapse_iob;

    fn spans(text: &str) -> Vec<(String, String)> {
        let tokens = HeuristicTokenTagger::new().tag_tokens(text).unwrap();
        collapse_iob(&tokens)
            .into_iter()
            .map(|s| (s.text, s.label))
            .collect()
    }

    fn pair(text: &str, label: &str) -> (String, String) {
        (text.to_string(), label.to_string())
    }

    #[test]
    fn test_honorific_person() {
        assert_eq!(
            spans("I, Smt. Anita Verma, wife of Shri Rajesh Sharma, hereby declare"),
            vec![pair("Anita Verma", "PER"), pair("Rajesh Sharma", "PER")]
        );
    }

    #[test]
    fn test_honorific_person_of_organization() {
        assert_eq!(
            spans("Shri Anita Verma of Reliance Industries said so."),
            vec![pair("Anita Verma", "PER"), pair("Reliance Industries", "ORG")]
        );
        assert_eq!(
            spans("The deponent Kavita Rao of State Bank of India states"),
            vec![pair("Kavita Rao", "PER"), pair("State Bank of India", "ORG")]
        );
    }

    #[test]
    fn test_role_cued_organization_kept_whole() {
        assert_eq!(
            spans("Petitioner State Bank of India filed"),
            vec![pair("State Bank of India", "ORG")]
        );
    }

    #[test]
    fn test_persons_split_at_connector() {
        assert_eq!(
            spans("witnessed by Anita Verma and Rajesh Sharma today"),
            vec![pair("Anita Verma", "PER"), pair("Rajesh Sharma", "PER")]
        );
    }

    #[test]
    fn test_organizations() {
        assert_eq!(
            spans("She joined Tata Consultancy Services in Pune"),
            vec![pair("Tata Consultancy Services", "ORG"), pair("Pune", "PER")]
        );
        assert_eq!(
            spans("account with State Bank of India, Andheri branch"),
            vec![pair("State Bank of India", "ORG"), pair("Andheri", "PER")]
        );
        assert_eq!(
            spans("supplied by M/s. Sharma Traders"),
            vec![pair("Sharma Traders", "ORG")]
        );
    }

    #[test]
    fn test_address_and_statute_runs() {
        assert_eq!(
            spans("Near Tower Road, Mumbai 400001"),
            vec![pair("Near Tower Road", "LOC"), pair("Mumbai", "PER")]
        );
        assert_eq!(
            spans("under Section 80C of the Income Tax Act"),
            vec![pair("Section", "MISC"), pair("Income Tax Act", "MISC")]
        );
    }

    #[test]
    fn test_sentence_initial_function_word() {
        assert_eq!(
            spans("The Deponent Kavita Rao states"),
            vec![pair("Kavita Rao", "PER")]
        );
    }

    #[test]
    fn test_split_pieces_keeps_inner_punctuation() {
        let pieces = split_pieces("(M/s. Pvt. Ltd.),");
        assert_eq!(
            pieces,
            vec![
                Piece::Punct("("),
                Piece::Word("M/s."),
                Piece::Word("Pvt."),
                Piece::Word("Ltd."),
                Piece::Punct("),"),
            ]
        );
        assert!(split_pieces("  ").is_empty());
    }
}
