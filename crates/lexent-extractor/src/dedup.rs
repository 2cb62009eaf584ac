//! Candidate pooling and deduplication

use std::cmp::Reverse;
use std::collections::HashSet;

use tracing::debug;

use crate::validator::Validator;
use crate::{Candidate, Category, EntitySet};

/// Candidates gathered during one extraction call, in insertion order
#[derive(Debug, Clone, Default)]
pub struct CandidatePool {
    people: Vec<Candidate>,
    organizations: Vec<Candidate>,
}

impl CandidatePool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, candidate: Candidate) {
        match candidate.category() {
            Category::Person => self.people.push(candidate),
            Category::Organization => self.organizations.push(candidate),
        }
    }

    pub fn people(&self) -> &[Candidate] {
        &self.people
    }

    pub fn organizations(&self) -> &[Candidate] {
        &self.organizations
    }

    pub fn len(&self) -> usize {
        self.people.len() + self.organizations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty() && self.organizations.is_empty()
    }
}

impl Extend<Candidate> for CandidatePool {
    fn extend<I: IntoIterator<Item = Candidate>>(&mut self, iter: I) {
        for candidate in iter {
            self.push(candidate);
        }
    }
}

/// Collapse a pool into the final entity set
///
/// 1. Longest texts first (pool order breaks ties); a text is dropped when
///    an already kept text of the same category contains it.
/// 2. Texts kept in both categories stay persons only.
/// 3. Survivors are re-validated; persons must also be free of location
///    vocabulary.
pub fn deduplicate(pool: &CandidatePool, validator: &Validator) -> EntitySet {
    let people = collapse(pool.people());
    let person_set: HashSet<&str> = people.iter().copied().collect();

    let mut organizations: Vec<String> = collapse(pool.organizations())
        .into_iter()
        .filter(|text| !person_set.contains(text))
        .filter(|text| validator.is_probable(text, Category::Organization))
        .map(str::to_string)
        .collect();

    let mut people: Vec<String> = people
        .into_iter()
        .filter(|text| {
            validator.is_probable(text, Category::Person)
                && !validator.lexicon().has_location_term(text)
        })
        .map(str::to_string)
        .collect();

    people.sort();
    organizations.sort();

    debug!(
        pooled = pool.len(),
        people = people.len(),
        organizations = organizations.len(),
        "Pool deduplicated"
    );

    EntitySet {
        people,
        organizations,
    }
}

/// Substring collapse within one category
///
/// Containment is plain, case-sensitive `contains`, so an unrelated name
/// that happens to be embedded in a longer one is dropped too.
fn collapse(candidates: &[Candidate]) -> Vec<&str> {
    let mut texts: Vec<&str> = candidates.iter().map(Candidate::text).collect();
    // Stable sort keeps pool order among equal lengths
    texts.sort_by_key(|text| Reverse(text.chars().count()));

    let mut kept: Vec<&str> = Vec::with_capacity(texts.len());
    for text in texts {
        if !kept.iter().any(|longer| longer.contains(text)) {
            kept.push(text);
        }
    }
    kept
}
