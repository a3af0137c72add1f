//! Workspace umbrella crate for firmdedup.
//!
//! Re-exports the company-name canonical layer and the duplicate decision
//! engine so callers can depend on a single crate, and adds the YAML/env
//! configuration loader shared by the `firmdedup` binary and embedding
//! services.
//!
//! ```
//! use firmdedup::{CompanyCandidate, DedupFileConfig, MatchType};
//!
//! let engine = DedupFileConfig::default().build_engine().expect("valid config");
//! let candidates = vec![CompanyCandidate::new("c-1", "Acme Widgets")
//!     .with_tax_id("1234567890")];
//!
//! let result = engine.check("Completely Different", Some("1234567890"), None, &candidates);
//! assert_eq!(result.match_type, MatchType::ExactTaxId);
//! ```

pub mod config;

pub use canonical::{
    filter_common, fingerprint_normalized, normalize, tokenize, AsciiFolding, CanonicalError,
    CommonWords, Degradation, NormalizationConfig, NormalizedText, TextNormalizer, TokenSet,
    TransliterationError, Transliterator,
};
pub use matcher::{
    character_similarity, jaccard, set_dedup_metrics, token_overlap, CompanyCandidate,
    ConfidenceBands, DedupConfig, DedupMetrics, DuplicateCheckRequest, DuplicateCheckResult,
    DuplicateDecisionEngine, DuplicateRules, MatchError, MatchType, Recommendation, ScoreWeights,
    SimilarityResult, SimilarityScorer, TokenMatchMode,
};

pub use crate::config::{ConfigLoadError, DedupFileConfig, MatcherYamlConfig, ENV_PREFIX};

/// Run a single duplicate check with a freshly built engine.
///
/// Services checking more than one request should build a
/// [`DuplicateDecisionEngine`] once and reuse it.
pub fn check_duplicate(
    config: &DedupConfig,
    request: &DuplicateCheckRequest,
) -> Result<DuplicateCheckResult, MatchError> {
    let engine = DuplicateDecisionEngine::new(config.clone())?;
    Ok(engine.check_request(request))
}
