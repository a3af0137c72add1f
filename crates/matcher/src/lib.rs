//! # Company Duplicate Matcher (`matcher`)
//!
//! ## Purpose
//!
//! `matcher` decides whether a company about to be registered already exists
//! among a list of candidates supplied by the caller. It does no storage
//! lookups of its own: the caller narrows candidates (trigram search,
//! identifier lookup) and hands them over together with the query.
//!
//! ## Decision order
//!
//! 1. Same tax id as any candidate: `EXACT_TAX_ID`, hard block
//! 2. Same registration number: `EXACT_REGISTRATION`, hard block
//! 3. Query name shorter than `fuzzy_search_min_length`: `NONE`
//! 4. Otherwise every named candidate is scored by [`SimilarityScorer`] and
//!    the highest-confidence one decides between `FUZZY_NAME` and `NONE`
//!
//! ## Core Types
//!
//! - [`DedupConfig`]: thresholds, weights, bands and the embedded
//!   [`canonical::NormalizationConfig`]
//! - [`CompanyCandidate`]: id, name, optional legal name and identifiers
//! - [`SimilarityResult`]: per-pair score breakdown
//! - [`DuplicateCheckResult`]: verdict, confidence, message, recommendation
//! - [`DuplicateDecisionEngine`]: validated configuration plus scorer
//!
//! ## Example Usage
//!
//! ```
//! use matcher::{CompanyCandidate, DedupConfig, DuplicateDecisionEngine, MatchType};
//!
//! let engine = DuplicateDecisionEngine::new(DedupConfig::default()).expect("valid config");
//! let candidates = vec![
//!     CompanyCandidate::new("c-1", "Akkayalar Tekstil"),
//!     CompanyCandidate::new("c-2", "istanbul tekstil"),
//! ];
//!
//! let result = engine.check("İstanbul Tekstil A.Ş.", None, None, &candidates);
//! assert!(result.is_duplicate);
//! assert_eq!(result.match_type, MatchType::FuzzyName);
//! assert_eq!(result.matched_candidate_id.as_deref(), Some("c-2"));
//! ```
//!
//! ## Observability
//!
//! Each check runs inside a `matcher.check` span and ends with a
//! `dedup_decision` event. Install a [`DedupMetrics`] implementation via
//! [`set_dedup_metrics`] to record latency and outcomes; this is typically
//! done once during service startup.

pub mod config;
pub mod engine;
pub mod metrics;
pub mod similarity;
pub mod types;

pub use crate::config::{
    ConfidenceBands, DedupConfig, DuplicateRules, ScoreWeights, TokenMatchMode,
};
pub use crate::engine::DuplicateDecisionEngine;
pub use crate::metrics::{set_dedup_metrics, DedupMetrics};
pub use crate::similarity::{
    character_similarity, edit_similarity, jaccard, token_overlap, PreparedName,
    SimilarityResult, SimilarityScorer,
};
pub use crate::types::{
    CompanyCandidate, DuplicateCheckRequest, DuplicateCheckResult, MatchError, MatchType,
    Recommendation,
};
