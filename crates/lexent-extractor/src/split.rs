//! Over-merged organization repair
//!
//! Taggers sometimes fuse adjacent organizations into one span joined by a
//! second "of": "Department of Revenue of Ministry of Finance". Every second
//! connective is treated as the seam between two names.

use crate::{Candidate, Category, Origin};

const CONNECTIVE: &str = "of";

/// Split `text` at every second "of"
///
/// The connective at each seam is dropped. Text with fewer than two
/// connectives comes back unchanged as the only element.
pub fn split(text: &str) -> Vec<String> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let mut rest = tokens.as_slice();
    let mut parts = Vec::new();

    while let Some(seam) = second_connective(rest) {
        parts.push(rest[..seam].join(" "));
        rest = &rest[seam + 1..];
    }

    if parts.is_empty() {
        return vec![text.to_string()];
    }

    if !rest.is_empty() {
        parts.push(rest.join(" "));
    }
    parts
}

fn second_connective(tokens: &[&str]) -> Option<usize> {
    tokens
        .iter()
        .enumerate()
        .filter(|(_, token)| **token == CONNECTIVE)
        .map(|(i, _)| i)
        .nth(1)
}

/// Replace an over-merged organization with its parts
///
/// Persons and organizations that do not split are returned as is.
pub fn expand(candidate: Candidate) -> Vec<Candidate> {
    if candidate.category() != Category::Organization {
        return vec![candidate];
    }

    let parts = split(candidate.text());
    if parts.len() == 1 && parts[0] == candidate.text() {
        return vec![candidate];
    }

    parts
        .iter()
        .filter_map(|part| Candidate::new(part, Category::Organization, Origin::Split))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_double_of() {
        assert_eq!(
            split("Department of Revenue of Ministry of Finance"),
            vec!["Department of Revenue", "Ministry of Finance"]
        );
    }

    #[test]
    fn test_split_repeats() {
        assert_eq!(
            split("Bank of India of Board of Trade of State of Goa"),
            vec!["Bank of India", "Board of Trade", "State of Goa"]
        );
    }

    #[test]
    fn test_no_split_is_identity() {
        assert_eq!(split("Ministry of Finance"), vec!["Ministry of Finance"]);
        assert_eq!(split("Tata  Steel"), vec!["Tata  Steel"]);
        // Only the lowercase connective counts
        assert_eq!(split("Bank Of India of Goa"), vec!["Bank Of India of Goa"]);
    }

    #[test]
    fn test_trailing_connective() {
        assert_eq!(split("Bank of India of"), vec!["Bank of India"]);
    }

    #[test]
    fn test_expand_candidates() {
        let merged = Candidate::new(
            "Department of Revenue of Ministry of Finance",
            Category::Organization,
            Origin::Tagger,
        )
        .unwrap();
        let parts = expand(merged);
        assert_eq!(parts.len(), 2);
        assert!(parts.iter().all(|c| c.origin() == Origin::Split));
        assert_eq!(parts[1].text(), "Ministry of Finance");

        let single =
            Candidate::new("Ministry of Finance", Category::Organization, Origin::Tagger).unwrap();
        assert_eq!(expand(single.clone()), vec![single]);

        let person = Candidate::new("Rao of Pune of Goa", Category::Person, Origin::Tagger).unwrap();
        assert_eq!(expand(person.clone()), vec![person]);
    }
}
