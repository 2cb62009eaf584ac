//! End-to-end extraction tests
//!
//! Drive `HybridExtractor` through scripted, failing and slow oracles as
//! well as the built-in heuristic tagger.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use lexent_core::{LexentError, Result, TaggerConfig};
use lexent_extractor::lexicon::Lexicon;
use lexent_extractor::source::{DocumentSource, MemorySource};
use lexent_extractor::tagger::create_tagger;
use lexent_extractor::{EntitySet, HybridExtractor, SpanTagger, TaggedSpan};
use proptest::prelude::*;

const AFFIDAVIT: &str = "The deponent Anita Verma is employed with Tata Consultancy Services.\n\
                         Address: Near Tower Road, Mumbai 400001";

const SUPPLY_NOTICE: &str =
    "The goods were supplied by M/s. Bharat Cement Pvt Ltd under the agreement dated 12.03.2023.";

// =============================================================================
// Oracles
// =============================================================================

/// Reports each scripted span found in the chunk
struct ScriptedTagger(Vec<TaggedSpan>);

impl ScriptedTagger {
    fn new(spans: &[(&str, &str)]) -> Self {
        Self(spans.iter().map(|(t, l)| TaggedSpan::new(*t, *l)).collect())
    }
}

#[async_trait]
impl SpanTagger for ScriptedTagger {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn tag(&self, text: &str) -> Result<Vec<TaggedSpan>> {
        Ok(self
            .0
            .iter()
            .filter(|span| text.contains(span.text.as_str()))
            .cloned()
            .collect())
    }
}

struct FailingTagger;

#[async_trait]
impl SpanTagger for FailingTagger {
    fn name(&self) -> &str {
        "failing"
    }

    async fn tag(&self, _text: &str) -> Result<Vec<TaggedSpan>> {
        Err(LexentError::Tagger("model not loaded".to_string()))
    }
}

struct SlowTagger;

#[async_trait]
impl SpanTagger for SlowTagger {
    fn name(&self) -> &str {
        "slow"
    }

    async fn tag(&self, text: &str) -> Result<Vec<TaggedSpan>> {
        tokio::time::sleep(Duration::from_secs(10)).await;
        Ok(vec![TaggedSpan::new(text, "ORG")])
    }
}

fn extractor_with(tagger: impl SpanTagger + 'static) -> HybridExtractor {
    let tagger: Arc<dyn SpanTagger> = Arc::new(tagger);
    HybridExtractor::new(vec![tagger])
}

fn heuristic_extractor() -> HybridExtractor {
    let tagger = create_tagger(&TaggerConfig::default(), Arc::new(Lexicon::new())).unwrap();
    HybridExtractor::new(vec![tagger])
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

// =============================================================================
// End-to-end behavior
// =============================================================================

#[tokio::test]
async fn test_affidavit_with_scripted_tagger() {
    let extractor = extractor_with(ScriptedTagger::new(&[
        ("Anita Verma", "PER"),
        ("Tata Consultancy Services", "ORG"),
        ("Tower Road", "ORG"),
        ("Mumbai", "LOC"),
    ]));

    let entities = extractor.extract(AFFIDAVIT).await;

    assert_eq!(entities.people, strings(&["Anita Verma"]));
    assert_eq!(entities.organizations, strings(&["Tata Consultancy Services"]));
}

#[tokio::test]
async fn test_affidavit_with_heuristic_tagger() {
    let entities = heuristic_extractor().extract(AFFIDAVIT).await;

    assert_eq!(entities.people, strings(&["Anita Verma"]));
    assert_eq!(entities.organizations, strings(&["Tata Consultancy Services"]));
}

#[tokio::test]
async fn test_fallback_recovers_missed_company() {
    let extractor = extractor_with(ScriptedTagger::new(&[]));
    let entities = extractor.extract(SUPPLY_NOTICE).await;

    assert!(entities.people.is_empty());
    assert_eq!(entities.organizations, strings(&["Bharat Cement Pvt Ltd"]));
}

#[tokio::test]
async fn test_failing_oracle_degrades_to_fallback() {
    let entities = extractor_with(FailingTagger).extract(SUPPLY_NOTICE).await;
    assert_eq!(entities.organizations, strings(&["Bharat Cement Pvt Ltd"]));
}

#[tokio::test]
async fn test_timed_out_oracle_degrades_to_fallback() {
    let extractor = extractor_with(SlowTagger).with_timeout(Duration::from_millis(50));
    let entities = extractor.extract(SUPPLY_NOTICE).await;

    assert!(entities.people.is_empty());
    assert_eq!(entities.organizations, strings(&["Bharat Cement Pvt Ltd"]));
}

#[tokio::test]
async fn test_one_failing_oracle_among_several() {
    let failing: Arc<dyn SpanTagger> = Arc::new(FailingTagger);
    let scripted: Arc<dyn SpanTagger> =
        Arc::new(ScriptedTagger::new(&[("Rajesh Sharma", "B-PER"), ("Sharma", "PER")]));
    let extractor = HybridExtractor::new(vec![failing, scripted]);

    let entities = extractor
        .extract("Witness: Shri Rajesh Sharma. Signed by Sharma.")
        .await;
    assert_eq!(entities.people, strings(&["Rajesh Sharma"]));
}

#[tokio::test]
async fn test_merged_organization_is_split() {
    let extractor = extractor_with(ScriptedTagger::new(&[(
        "Department of Revenue of Ministry of Finance",
        "ORG",
    )]));

    let entities = extractor
        .extract("A letter from the Department of Revenue of Ministry of Finance was received.")
        .await;
    assert_eq!(
        entities.organizations,
        strings(&["Department of Revenue", "Ministry of Finance"])
    );
}

#[tokio::test]
async fn test_name_in_both_categories_stays_person() {
    let extractor = extractor_with(ScriptedTagger::new(&[
        ("Kavita Rao", "PER"),
        ("Kavita Rao", "ORG"),
    ]));

    let entities = extractor.extract("Statement of Kavita Rao recorded.").await;
    assert_eq!(entities.people, strings(&["Kavita Rao"]));
    assert!(entities.organizations.is_empty());
}

#[tokio::test]
async fn test_sentence_ending_in_legal_suffix() {
    let entities = heuristic_extractor()
        .extract("The deponent works at Tata Steel Ltd. Rajesh Sharma signed the notice.")
        .await;

    assert_eq!(entities.people, strings(&["Rajesh Sharma"]));
    assert_eq!(entities.organizations, strings(&["Tata Steel Ltd"]));
}

#[tokio::test]
async fn test_person_of_organization() {
    let entities = heuristic_extractor()
        .extract("Shri Anita Verma of Reliance Industries said so.")
        .await;

    assert_eq!(entities.people, strings(&["Anita Verma"]));
    assert_eq!(entities.organizations, strings(&["Reliance Industries"]));
}

#[tokio::test]
async fn test_extraction_is_idempotent() {
    let extractor = heuristic_extractor();
    let text = format!("{AFFIDAVIT}\n{SUPPLY_NOTICE}\nWitness: Shri Rajesh Sharma of State Bank of India");

    let first = extractor.extract(&text).await;
    let second = extractor.extract(&text).await;
    assert_eq!(first, second);
    assert!(!first.is_empty());
}

#[tokio::test]
async fn test_batch_over_memory_source() {
    let source = MemorySource::new()
        .with_document("001-affidavit", AFFIDAVIT)
        .with_document("002-notice", SUPPLY_NOTICE);
    let extractor = heuristic_extractor();

    let mut results = Vec::new();
    for id in source.document_ids().unwrap() {
        let text = source.read(&id).unwrap();
        results.push(extractor.extract(&text).await);
    }

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].people, strings(&["Anita Verma"]));
    assert!(results[1]
        .organizations
        .contains(&"Bharat Cement Pvt Ltd".to_string()));
}

// =============================================================================
// Output invariants
// =============================================================================

const VOCABULARY: &[&str] = &[
    "Anita", "Verma", "Rajesh", "Sharma", "Kavita", "Rao", "Shri", "Smt.", "M/s.", "Bharat",
    "Cement", "Pvt", "Ltd", "Tata", "Consultancy", "Services", "Ministry", "of", "Finance",
    "Department", "Revenue", "Bank", "India", "State", "Road", "Tower", "Nagar", "Mumbai", "and",
    "the", "with", "employed", "by", "said", "Mobile", "400001", ",", ".", ";", "\n",
];

fn document() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(VOCABULARY), 0..60).prop_map(|words| words.join(" "))
}

fn check_invariants(entities: &EntitySet) -> std::result::Result<(), TestCaseError> {
    for list in [&entities.people, &entities.organizations] {
        prop_assert!(list.windows(2).all(|pair| pair[0] < pair[1]));
        for (i, a) in list.iter().enumerate() {
            prop_assert!(!a.trim().is_empty());
            for (j, b) in list.iter().enumerate() {
                if i != j {
                    prop_assert!(!a.contains(b.as_str()), "{a:?} contains {b:?}");
                }
            }
        }
    }

    for person in &entities.people {
        prop_assert!(!entities.organizations.contains(person));
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn output_invariants_hold(text in document()) {
        let extractor = heuristic_extractor();
        let entities = tokio_test::block_on(extractor.extract(&text));
        check_invariants(&entities)?;

        let again = tokio_test::block_on(extractor.extract(&text));
        prop_assert_eq!(entities, again);
    }
}
