use std::sync::Arc;
use std::time::Instant;

use canonical::{TextNormalizer, Transliterator};
use rayon::prelude::*;
use tracing::{debug, info, warn, Level};

use crate::config::DedupConfig;
use crate::metrics::metrics_recorder;
use crate::similarity::{PreparedName, SimilarityResult, SimilarityScorer};
use crate::types::{
    non_blank, CompanyCandidate, DuplicateCheckRequest, DuplicateCheckResult, MatchError,
    MatchType, Recommendation,
};

#[cfg(test)]
mod tests;

const TAX_ID_MESSAGE: &str = "Company with same Tax ID already exists";
const REGISTRATION_MESSAGE: &str = "Company with same Registration Number already exists";
const TOO_SHORT_MESSAGE: &str = "Company name too short for similarity check";
const NO_DUPLICATE_MESSAGE: &str = "No similar company found";

/// A candidate that went through fuzzy scoring.
#[derive(Debug, Clone)]
struct ScoredCandidate<'a> {
    index: usize,
    candidate: &'a CompanyCandidate,
    result: SimilarityResult,
}

/// Decides whether a new company duplicates one of the supplied candidates.
///
/// Checks run in a fixed order and stop at the first hit: tax id, then
/// registration number, then fuzzy name similarity. The engine holds only
/// immutable configuration and can be shared across threads.
#[derive(Debug, Clone)]
pub struct DuplicateDecisionEngine {
    config: DedupConfig,
    scorer: SimilarityScorer,
}

impl DuplicateDecisionEngine {
    /// Validate `config` and build an engine using the default transliterator.
    pub fn new(config: DedupConfig) -> Result<Self, MatchError> {
        config.validate()?;
        let scorer = SimilarityScorer::new(&config);
        Ok(Self { config, scorer })
    }

    pub fn with_transliterator(
        config: DedupConfig,
        transliterator: Arc<dyn Transliterator>,
    ) -> Result<Self, MatchError> {
        config.validate()?;
        let normalizer = TextNormalizer::with_transliterator(&config.normalization, transliterator);
        let scorer = SimilarityScorer::with_normalizer(normalizer, &config);
        Ok(Self { config, scorer })
    }

    pub fn config(&self) -> &DedupConfig {
        &self.config
    }

    pub fn scorer(&self) -> &SimilarityScorer {
        &self.scorer
    }

    pub fn check_request(&self, request: &DuplicateCheckRequest) -> DuplicateCheckResult {
        self.check(
            &request.name,
            request.tax_id.as_deref(),
            request.registration_number.as_deref(),
            &request.candidates,
        )
    }

    /// Run one duplicate check.
    ///
    /// Identifiers are compared trimmed and exactly, across every candidate.
    /// Fuzzy scoring only looks at the first `max_candidates` candidates and
    /// skips candidates without a name.
    pub fn check(
        &self,
        query_name: &str,
        tax_id: Option<&str>,
        registration_number: Option<&str>,
        candidates: &[CompanyCandidate],
    ) -> DuplicateCheckResult {
        let start = Instant::now();
        let span = tracing::span!(
            Level::INFO,
            "matcher.check",
            candidates = candidates.len()
        );
        let _guard = span.enter();

        let (result, scored) = self.decide(query_name, tax_id, registration_number, candidates);

        let latency = start.elapsed();
        info!(
            match_type = %result.match_type,
            is_duplicate = result.is_duplicate,
            confidence = result.confidence,
            matched_candidate_id = ?result.matched_candidate_id,
            scored_candidates = scored,
            elapsed_micros = latency.as_micros(),
            "dedup_decision"
        );

        if let Some(recorder) = metrics_recorder() {
            recorder.record_check(result.match_type, latency, scored);
        }

        result
    }

    /// Returns the decision and the number of fuzzy-scored candidates.
    fn decide(
        &self,
        query_name: &str,
        tax_id: Option<&str>,
        registration_number: Option<&str>,
        candidates: &[CompanyCandidate],
    ) -> (DuplicateCheckResult, usize) {
        if let Some(tax_id) = non_blank(tax_id) {
            let hit = candidates
                .iter()
                .find(|c| non_blank(c.tax_id.as_deref()) == Some(tax_id));
            if let Some(candidate) = hit {
                return (
                    identifier_match(MatchType::ExactTaxId, candidate, TAX_ID_MESSAGE),
                    0,
                );
            }
        }

        if let Some(registration_number) = non_blank(registration_number) {
            let hit = candidates.iter().find(|c| {
                non_blank(c.registration_number.as_deref()) == Some(registration_number)
            });
            if let Some(candidate) = hit {
                return (
                    identifier_match(MatchType::ExactRegistration, candidate, REGISTRATION_MESSAGE),
                    0,
                );
            }
        }

        if query_name.trim().chars().count() < self.config.fuzzy_search_min_length {
            debug!(
                min_length = self.config.fuzzy_search_min_length,
                "query name too short for fuzzy matching"
            );
            return (
                no_match(0.0, TOO_SHORT_MESSAGE, Recommendation::Proceed, None),
                0,
            );
        }

        let candidates = self.capped(candidates);
        let scored = self.score_all(query_name, candidates);
        let best = best_candidate(&scored);
        let explanation = best
            .filter(|_| self.config.explain)
            .map(|b| b.result.clone());

        let result = match best {
            Some(best) if best.result.is_duplicate => {
                let confidence = best.result.confidence;
                DuplicateCheckResult {
                    is_duplicate: true,
                    match_type: MatchType::FuzzyName,
                    matched_candidate_id: Some(best.candidate.id.clone()),
                    matched_candidate_name: best.candidate.name.clone(),
                    confidence,
                    message: format!(
                        "Similar company name found ({:.0}% match)",
                        confidence * 100.0
                    ),
                    recommendation: self.band(confidence),
                    explanation,
                }
            }
            // Not a duplicate, so never banded above a cautionary proceed.
            Some(best) if best.result.confidence > 0.0 => {
                let confidence = best.result.confidence;
                no_match(
                    confidence,
                    format!(
                        "Possibly similar company found ({:.0}% match)",
                        confidence * 100.0
                    ),
                    Recommendation::ProceedWithCaution,
                    explanation,
                )
            }
            _ => no_match(
                0.0,
                NO_DUPLICATE_MESSAGE,
                Recommendation::Proceed,
                explanation,
            ),
        };
        (result, scored.len())
    }

    fn capped<'a>(&self, candidates: &'a [CompanyCandidate]) -> &'a [CompanyCandidate] {
        match self.config.max_candidates {
            Some(limit) if candidates.len() > limit => {
                warn!(
                    supplied = candidates.len(),
                    limit, "candidate list truncated for fuzzy scoring"
                );
                &candidates[..limit]
            }
            _ => candidates,
        }
    }

    fn score_all<'a>(
        &self,
        query_name: &str,
        candidates: &'a [CompanyCandidate],
    ) -> Vec<ScoredCandidate<'a>> {
        let query = self.scorer.prepare(query_name);
        let score_one = |(index, candidate): (usize, &'a CompanyCandidate)| {
            self.score_candidate(&query, index, candidate)
        };

        if candidates.len() >= self.config.parallel_min_candidates {
            candidates
                .par_iter()
                .enumerate()
                .filter_map(score_one)
                .collect()
        } else {
            candidates.iter().enumerate().filter_map(score_one).collect()
        }
    }

    /// Scores the candidate's name and, when present, its legal name; the
    /// higher confidence represents the candidate.
    fn score_candidate<'a>(
        &self,
        query: &PreparedName,
        index: usize,
        candidate: &'a CompanyCandidate,
    ) -> Option<ScoredCandidate<'a>> {
        let Some(name) = candidate.usable_name() else {
            warn!(candidate_id = %candidate.id, "skipping candidate without a name");
            return None;
        };

        let mut result = self.scorer.score_prepared(query, &self.scorer.prepare(name));
        if let Some(legal_name) = candidate.usable_legal_name() {
            let legal = self
                .scorer
                .score_prepared(query, &self.scorer.prepare(legal_name));
            if legal.confidence > result.confidence {
                result = legal;
            }
        }

        debug!(
            candidate_id = %candidate.id,
            confidence = result.confidence,
            jaccard = result.jaccard_score,
            token_overlap = result.token_overlap,
            character_similarity = result.character_similarity,
            is_duplicate = result.is_duplicate,
            "candidate_scored"
        );

        Some(ScoredCandidate {
            index,
            candidate,
            result,
        })
    }

    fn band(&self, confidence: f64) -> Recommendation {
        let bands = &self.config.confidence_bands;
        if confidence >= bands.very_similar {
            Recommendation::LikelyDuplicate
        } else if confidence >= bands.similar {
            Recommendation::Verify
        } else {
            Recommendation::ProceedWithCaution
        }
    }
}

/// Highest confidence wins; ties go to the earlier candidate.
fn best_candidate<'s, 'a>(scored: &'s [ScoredCandidate<'a>]) -> Option<&'s ScoredCandidate<'a>> {
    scored.iter().fold(None, |best, next| match best {
        Some(current)
            if current.result.confidence > next.result.confidence
                || (current.result.confidence == next.result.confidence
                    && current.index <= next.index) =>
        {
            Some(current)
        }
        _ => Some(next),
    })
}

fn identifier_match(
    match_type: MatchType,
    candidate: &CompanyCandidate,
    message: &str,
) -> DuplicateCheckResult {
    DuplicateCheckResult {
        is_duplicate: true,
        match_type,
        matched_candidate_id: Some(candidate.id.clone()),
        matched_candidate_name: candidate.name.clone(),
        confidence: 1.0,
        message: message.to_string(),
        recommendation: Recommendation::HardBlock,
        explanation: None,
    }
}

fn no_match(
    confidence: f64,
    message: impl Into<String>,
    recommendation: Recommendation,
    explanation: Option<SimilarityResult>,
) -> DuplicateCheckResult {
    DuplicateCheckResult {
        is_duplicate: false,
        match_type: MatchType::None,
        matched_candidate_id: None,
        matched_candidate_name: None,
        confidence,
        message: message.into(),
        recommendation,
        explanation,
    }
}
