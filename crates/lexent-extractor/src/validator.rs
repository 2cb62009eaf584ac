//! Candidate validation
//!
//! Validation is an ordered list of named rules. Each rule is scoped to a
//! label and returns a verdict; the first verdict other than `Continue`
//! decides. Keeping the rules as data makes the precedence auditable
//! (`lexent rules`) and each rule testable on its own.

use std::sync::Arc;

use serde::Serialize;
use tracing::trace;

use crate::lexicon::Lexicon;
use crate::{Candidate, Category, Origin, RawSpan, SpanLabel};

// ============================================================================
// Rule engine types
// ============================================================================

/// Outcome of a single rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Accept,
    Reject,
    Continue,
}

/// Labels a rule applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleScope {
    Any,
    Person,
    Organization,
}

impl RuleScope {
    fn covers(&self, label: SpanLabel) -> bool {
        match self {
            Self::Any => true,
            Self::Person => label == SpanLabel::Person,
            Self::Organization => label == SpanLabel::Organization,
        }
    }
}

impl std::fmt::Display for RuleScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Any => write!(f, "any"),
            Self::Person => write!(f, "person"),
            Self::Organization => write!(f, "organization"),
        }
    }
}

/// Pre-split view of the text under validation
#[derive(Debug)]
pub struct SpanView<'a> {
    pub text: &'a str,
    pub label: SpanLabel,
    pub tokens: Vec<&'a str>,
}

impl<'a> SpanView<'a> {
    pub fn new(text: &'a str, label: SpanLabel) -> Self {
        let text = text.trim();
        Self {
            text,
            label,
            tokens: text.split_whitespace().collect(),
        }
    }

    /// Tokens whose first letter is uppercase
    pub fn capitalized_tokens(&self) -> usize {
        self.tokens.iter().filter(|t| is_capitalized(t)).count()
    }
}

type Check = fn(&SpanView<'_>, &Lexicon) -> Verdict;

/// A named, scoped validation rule
#[derive(Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub scope: RuleScope,
    check: Check,
}

impl Rule {
    pub fn new(name: &'static str, scope: RuleScope, check: Check) -> Self {
        Self { name, scope, check }
    }

    pub fn evaluate(&self, view: &SpanView<'_>, lexicon: &Lexicon) -> Verdict {
        if !self.scope.covers(view.label) {
            return Verdict::Continue;
        }
        (self.check)(view, lexicon)
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("scope", &self.scope)
            .finish()
    }
}

/// The deciding rule and its verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Decision {
    pub rule: &'static str,
    pub verdict: Verdict,
}

// ============================================================================
// Default rules
// ============================================================================

fn reject_if(condition: bool) -> Verdict {
    if condition {
        Verdict::Reject
    } else {
        Verdict::Continue
    }
}

fn junk_term(view: &SpanView<'_>, lexicon: &Lexicon) -> Verdict {
    reject_if(lexicon.is_junk(view.text))
}

fn too_short(view: &SpanView<'_>, _: &Lexicon) -> Verdict {
    reject_if(view.text.chars().count() < 3)
}

fn long_digit_run(view: &SpanView<'_>, _: &Lexicon) -> Verdict {
    let mut run = 0;
    for c in view.text.chars() {
        run = if c.is_ascii_digit() { run + 1 } else { 0 };
        if run >= 5 {
            return Verdict::Reject;
        }
    }
    Verdict::Continue
}

fn no_capitalized_word(view: &SpanView<'_>, _: &Lexicon) -> Verdict {
    let chars: Vec<char> = view.text.chars().collect();
    let proper = chars
        .windows(2)
        .any(|pair| pair[0].is_uppercase() && pair[1].is_lowercase());
    reject_if(!proper)
}

fn address_vocabulary(view: &SpanView<'_>, lexicon: &Lexicon) -> Verdict {
    reject_if(lexicon.has_address_term(view.text))
}

fn narrative_verb(view: &SpanView<'_>, lexicon: &Lexicon) -> Verdict {
    reject_if(lexicon.has_narrative_verb(view.text))
}

fn organization_marker(view: &SpanView<'_>, lexicon: &Lexicon) -> Verdict {
    if lexicon.has_organization_marker(view.text) {
        Verdict::Accept
    } else {
        Verdict::Continue
    }
}

fn multiword_capitalized(view: &SpanView<'_>, _: &Lexicon) -> Verdict {
    if view.tokens.len() >= 2 && view.capitalized_tokens() >= 2 {
        Verdict::Accept
    } else {
        Verdict::Reject
    }
}

fn all_uppercase(view: &SpanView<'_>, _: &Lexicon) -> Verdict {
    let has_letters = view.text.chars().any(char::is_alphabetic);
    reject_if(has_letters && !view.text.chars().any(char::is_lowercase))
}

fn numeric(view: &SpanView<'_>, _: &Lexicon) -> Verdict {
    reject_if(!view.text.chars().any(char::is_alphabetic))
}

fn full_name(view: &SpanView<'_>, lexicon: &Lexicon) -> Verdict {
    multiword_capitalized(view, lexicon)
}

fn unlabeled(_: &SpanView<'_>, _: &Lexicon) -> Verdict {
    Verdict::Reject
}

/// The built-in rules in precedence order
pub fn default_rules() -> Vec<Rule> {
    vec![
        Rule::new("junk_term", RuleScope::Any, junk_term),
        Rule::new("too_short", RuleScope::Any, too_short),
        Rule::new("long_digit_run", RuleScope::Any, long_digit_run),
        Rule::new("no_capitalized_word", RuleScope::Any, no_capitalized_word),
        Rule::new("address_vocabulary", RuleScope::Organization, address_vocabulary),
        Rule::new("narrative_verb", RuleScope::Organization, narrative_verb),
        Rule::new("organization_marker", RuleScope::Organization, organization_marker),
        Rule::new("multiword_capitalized", RuleScope::Organization, multiword_capitalized),
        Rule::new("all_uppercase", RuleScope::Person, all_uppercase),
        Rule::new("numeric", RuleScope::Person, numeric),
        Rule::new("full_name", RuleScope::Person, full_name),
        Rule::new("unlabeled", RuleScope::Any, unlabeled),
    ]
}

// ============================================================================
// Validator
// ============================================================================

/// Decides whether raw spans are plausible person or organization names
#[derive(Debug, Clone)]
pub struct Validator {
    rules: Vec<Rule>,
    lexicon: Arc<Lexicon>,
}

impl Validator {
    /// Create a validator with the default rules and lexicon
    pub fn new() -> Self {
        Self::with_lexicon(Lexicon::new())
    }

    pub fn with_lexicon(lexicon: impl Into<Arc<Lexicon>>) -> Self {
        Self {
            rules: default_rules(),
            lexicon: lexicon.into(),
        }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn lexicon(&self) -> &Arc<Lexicon> {
        &self.lexicon
    }

    /// Run the rules on `text` as if it carried `label`
    pub fn decide(&self, text: &str, label: SpanLabel) -> Decision {
        let view = SpanView::new(text, label);

        for rule in &self.rules {
            match rule.evaluate(&view, &self.lexicon) {
                Verdict::Continue => continue,
                verdict => {
                    trace!(rule = rule.name, ?verdict, text = view.text, "Rule decided");
                    return Decision {
                        rule: rule.name,
                        verdict,
                    };
                }
            }
        }

        Decision {
            rule: "exhausted",
            verdict: Verdict::Reject,
        }
    }

    /// Promote a raw span into a candidate, or discard it
    pub fn validate(&self, span: &RawSpan) -> Option<Candidate> {
        let category = span.label.category()?;
        match self.decide(&span.text, span.label).verdict {
            Verdict::Accept => Candidate::new(&span.text, category, Origin::Tagger),
            _ => None,
        }
    }

    /// Whether `text` passes the rules of `category`
    pub fn is_probable(&self, text: &str, category: Category) -> bool {
        self.decide(text, category.into()).verdict == Verdict::Accept
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

/// First letter of the token is uppercase
pub(crate) fn is_capitalized(token: &str) -> bool {
    token
        .chars()
        .find(|c| c.is_alphabetic())
        .is_some_and(char::is_uppercase)
}

// ============================================================================
// Tests
// ============================================================================
