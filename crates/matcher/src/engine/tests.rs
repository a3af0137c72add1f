use super::*;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use canonical::{NormalizationConfig, TransliterationError};

use crate::config::TokenMatchMode;
use crate::metrics::{set_dedup_metrics, DedupMetrics};

fn engine() -> DuplicateDecisionEngine {
    DuplicateDecisionEngine::new(DedupConfig::default()).expect("default config is valid")
}

fn engine_with(config: DedupConfig) -> DuplicateDecisionEngine {
    DuplicateDecisionEngine::new(config).expect("config is valid")
}

#[test]
fn tax_id_match_short_circuits() {
    let candidates = vec![
        CompanyCandidate::new("c-1", "İstanbul Tekstil"),
        CompanyCandidate::new("c-2", "Totally Different Holding").with_tax_id("1234567890"),
    ];
    let result = engine().check("İstanbul Tekstil A.Ş.", Some("1234567890"), None, &candidates);

    assert!(result.is_duplicate);
    assert_eq!(result.match_type, MatchType::ExactTaxId);
    assert_eq!(result.confidence, 1.0);
    assert_eq!(result.matched_candidate_id.as_deref(), Some("c-2"));
    assert_eq!(result.recommendation, Recommendation::HardBlock);
    assert_eq!(result.message, "Company with same Tax ID already exists");
}

#[test]
fn tax_id_takes_precedence_over_registration() {
    let candidates = vec![
        CompanyCandidate::new("reg", "Acme").with_registration_number("R-1"),
        CompanyCandidate::new("tax", "Zeta").with_tax_id("T-1"),
    ];
    let result = engine().check("Acme", Some("T-1"), Some("R-1"), &candidates);
    assert_eq!(result.match_type, MatchType::ExactTaxId);
    assert_eq!(result.matched_candidate_id.as_deref(), Some("tax"));
}

#[test]
fn registration_number_match() {
    let candidates = vec![CompanyCandidate::new("c-1", "Zeta Mills").with_registration_number("R-42")];
    let result = engine().check("Acme", Some("T-9"), Some(" R-42 "), &candidates);
    assert_eq!(result.match_type, MatchType::ExactRegistration);
    assert_eq!(result.confidence, 1.0);
    assert_eq!(result.recommendation, Recommendation::HardBlock);
    assert_eq!(
        result.message,
        "Company with same Registration Number already exists"
    );
}

#[test]
fn blank_identifiers_never_match() {
    let candidates = vec![CompanyCandidate::new("c-1", "Zeta").with_tax_id("  ")];
    let result = engine().check("Acme Widgets", Some(" "), Some(""), &candidates);
    assert_eq!(result.match_type, MatchType::None);
}

#[test]
fn identifier_matches_candidate_without_name() {
    let candidate = CompanyCandidate {
        id: "c-1".into(),
        tax_id: Some("555".into()),
        ..Default::default()
    };
    let result = engine().check("Acme", Some("555"), None, &[candidate]);
    assert_eq!(result.match_type, MatchType::ExactTaxId);
    assert_eq!(result.matched_candidate_name, None);
}

#[test]
fn short_query_is_not_scored() {
    let candidates = vec![CompanyCandidate::new("c-1", "AB")];
    let result = engine().check(" AB ", None, None, &candidates);
    assert!(!result.is_duplicate);
    assert_eq!(result.match_type, MatchType::None);
    assert_eq!(result.confidence, 0.0);
    assert_eq!(result.recommendation, Recommendation::Proceed);
}

#[test]
fn fuzzy_duplicate_across_script_and_suffix() {
    let candidates = vec![
        CompanyCandidate::new("c-1", "Akkayalar Tekstil"),
        CompanyCandidate::new("c-2", "istanbul tekstil"),
    ];
    let result = engine().check("İstanbul Tekstil A.Ş.", None, None, &candidates);
    assert!(result.is_duplicate);
    assert_eq!(result.match_type, MatchType::FuzzyName);
    assert_eq!(result.matched_candidate_id.as_deref(), Some("c-2"));
    assert_eq!(result.matched_candidate_name.as_deref(), Some("istanbul tekstil"));
    assert_eq!(result.confidence, 1.0);
    assert_eq!(result.message, "Similar company name found (100% match)");
    assert_eq!(result.recommendation, Recommendation::LikelyDuplicate);
    assert!(result.explanation.is_none());
}

#[test]
fn generic_word_alone_is_not_a_duplicate() {
    let candidates = vec![CompanyCandidate::new("c-1", "Akkayalar Tekstil")];
    let result = engine().check("Akme Tekstil", None, None, &candidates);
    assert!(!result.is_duplicate);
    assert_eq!(result.match_type, MatchType::None);
    assert_eq!(result.confidence, 0.0);
    assert_eq!(result.recommendation, Recommendation::Proceed);
    assert_eq!(result.matched_candidate_id, None);
}

#[test]
fn partial_overlap_reports_best_confidence_without_match() {
    // unique tokens {acme, widgets} vs {acme, gadgets}: jaccard 1/3, overlap 1/2
    let candidates = vec![CompanyCandidate::new("c-1", "Acme Gadgets")];
    let result = engine().check("Acme Widgets", None, None, &candidates);
    assert!(!result.is_duplicate);
    assert_eq!(result.match_type, MatchType::None);
    assert!(result.confidence > 0.0 && result.confidence < 0.8);
    assert_eq!(result.message, "Possibly similar company found (53% match)");
    assert_eq!(result.recommendation, Recommendation::ProceedWithCaution);
}

#[test]
fn legal_name_can_carry_the_match() {
    let candidates =
        vec![CompanyCandidate::new("c-1", "AKM Brand").with_legal_name("Akme Tekstil Sanayi A.Ş.")];
    let result = engine().check("Akme Tekstil", None, None, &candidates);
    assert!(result.is_duplicate);
    assert_eq!(result.match_type, MatchType::FuzzyName);
    assert_eq!(result.matched_candidate_name.as_deref(), Some("AKM Brand"));
}

#[test]
fn candidates_without_name_are_skipped() {
    let candidates = vec![
        CompanyCandidate {
            id: "nameless".into(),
            ..Default::default()
        },
        CompanyCandidate::new("blank", "   "),
        CompanyCandidate::new("c-1", "Acme Widgets"),
    ];
    let result = engine().check("Acme Widgets", None, None, &candidates);
    assert_eq!(result.match_type, MatchType::FuzzyName);
    assert_eq!(result.matched_candidate_id.as_deref(), Some("c-1"));
}

#[test]
fn ties_go_to_the_earlier_candidate() {
    let candidates = vec![
        CompanyCandidate::new("first", "Acme Widgets GmbH"),
        CompanyCandidate::new("second", "ACME WIDGETS"),
    ];
    let result = engine().check("Acme Widgets", None, None, &candidates);
    assert_eq!(result.matched_candidate_id.as_deref(), Some("first"));
}

#[test]
fn empty_candidate_list_yields_none() {
    let result = engine().check("Acme Widgets", None, None, &[]);
    assert_eq!(result.match_type, MatchType::None);
    assert_eq!(result.recommendation, Recommendation::Proceed);
}

#[test]
fn candidate_cap_limits_fuzzy_scoring_only() {
    let config = DedupConfig {
        max_candidates: Some(1),
        ..Default::default()
    };
    let candidates = vec![
        CompanyCandidate::new("c-1", "Zeta Mills"),
        CompanyCandidate::new("c-2", "Acme Widgets").with_tax_id("T-2"),
    ];
    let engine = engine_with(config);

    let fuzzy = engine.check("Acme Widgets", None, None, &candidates);
    assert_eq!(fuzzy.match_type, MatchType::None);

    let exact = engine.check("Acme Widgets", Some("T-2"), None, &candidates);
    assert_eq!(exact.match_type, MatchType::ExactTaxId);
}

#[test]
fn explanation_attached_when_enabled() {
    let config = DedupConfig {
        explain: true,
        ..Default::default()
    };
    let candidates = vec![CompanyCandidate::new("c-1", "istanbul tekstil")];
    let result = engine_with(config).check("İstanbul Tekstil A.Ş.", None, None, &candidates);
    let explanation = result.explanation.expect("explanation requested");
    assert_eq!(explanation.jaccard_score, 1.0);
    assert!(explanation.to_string().starts_with("Jaccard: 1.00"));
}

#[test]
fn approximate_token_matching_catches_typos() {
    let candidates = vec![CompanyCandidate::new("c-1", "Acmee Bilisim")];

    let exact = engine().check("Acme Bilişim", None, None, &candidates);
    assert!(!exact.is_duplicate);

    let config = DedupConfig {
        token_match: TokenMatchMode::Approximate {
            min_token_similarity: 0.75,
        },
        ..Default::default()
    };
    let approximate = engine_with(config).check("Acme Bilişim", None, None, &candidates);
    assert!(approximate.is_duplicate);
    assert_eq!(approximate.match_type, MatchType::FuzzyName);
}

#[test]
fn parallel_and_sequential_scoring_agree() {
    let candidates: Vec<CompanyCandidate> = (0..200)
        .map(|i| CompanyCandidate::new(format!("c-{i}"), format!("Company {i} Widgets")))
        .chain(std::iter::once(CompanyCandidate::new(
            "target",
            "Acme Widgets Europe",
        )))
        .collect();

    let sequential = engine_with(DedupConfig {
        parallel_min_candidates: usize::MAX,
        ..Default::default()
    });
    let parallel = engine_with(DedupConfig {
        parallel_min_candidates: 1,
        ..Default::default()
    });

    let a = sequential.check("Acme Widgets Europe", None, None, &candidates);
    let b = parallel.check("Acme Widgets Europe", None, None, &candidates);
    assert_eq!(a, b);
    assert_eq!(a.matched_candidate_id.as_deref(), Some("target"));
}

#[test]
fn invalid_config_rejected_at_construction() {
    let config = DedupConfig {
        fuzzy_search_min_length: 3,
        normalization: NormalizationConfig {
            version: 0,
            ..Default::default()
        },
        ..Default::default()
    };
    assert!(matches!(
        DuplicateDecisionEngine::new(config),
        Err(MatchError::Canonical(_))
    ));
}

#[test]
fn custom_transliterator_is_used() {
    let translit: Arc<dyn Transliterator> =
        Arc::new(|text: &str| -> Result<String, TransliterationError> {
            Ok(text.to_lowercase().replace('ß', "ss"))
        });
    let engine =
        DuplicateDecisionEngine::with_transliterator(DedupConfig::default(), translit)
            .expect("valid config");
    let candidates = vec![CompanyCandidate::new("c-1", "Grosshandel Weber")];
    let result = engine.check("Großhandel Weber GmbH", None, None, &candidates);
    assert_eq!(result.match_type, MatchType::FuzzyName);
}

#[test]
fn request_wrapper_matches_direct_call() {
    let request = DuplicateCheckRequest {
        name: "İstanbul Tekstil A.Ş.".into(),
        tax_id: None,
        registration_number: None,
        candidates: vec![CompanyCandidate::new("c-1", "istanbul tekstil")],
    };
    let engine = engine();
    assert_eq!(
        engine.check_request(&request),
        engine.check(&request.name, None, None, &request.candidates)
    );
}

struct RecordingMetrics {
    events: Mutex<Vec<(MatchType, usize)>>,
}

impl DedupMetrics for RecordingMetrics {
    fn record_check(&self, match_type: MatchType, _latency: Duration, scored_candidates: usize) {
        self.events
            .lock()
            .unwrap()
            .push((match_type, scored_candidates));
    }
}

#[test]
fn metrics_recorder_observes_checks() {
    let metrics = Arc::new(RecordingMetrics {
        events: Mutex::new(Vec::new()),
    });
    set_dedup_metrics(Some(metrics.clone()));

    let candidates = vec![
        CompanyCandidate::new("c-1", "Metrics Probe Alpha"),
        CompanyCandidate::new("c-2", "Metrics Probe Beta"),
    ];
    engine().check("Metrics Probe Alpha", None, None, &candidates);
    set_dedup_metrics(None);

    // other tests may run checks concurrently, so look for ours
    let events = metrics.events.lock().unwrap();
    assert!(events
        .iter()
        .any(|(match_type, scored)| *match_type == MatchType::FuzzyName && *scored == 2));
}
