use canonical::NormalizationConfig;
use serde::{Deserialize, Serialize};

use crate::types::MatchError;

/// Confidence thresholds used to pick a recommendation for fuzzy results.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ConfidenceBands {
    /// At or above: "very similar, likely duplicate".
    pub very_similar: f64,
    /// At or above: "similar, please verify".
    pub similar: f64,
}

impl Default for ConfidenceBands {
    fn default() -> Self {
        Self {
            very_similar: 0.9,
            similar: 0.8,
        }
    }
}

/// Weights of the three similarity signals in the confidence score.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScoreWeights {
    pub jaccard: f64,
    pub token_overlap: f64,
    pub character: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            jaccard: 0.4,
            token_overlap: 0.3,
            character: 0.3,
        }
    }
}

impl ScoreWeights {
    fn sum(&self) -> f64 {
        self.jaccard + self.token_overlap + self.character
    }
}

/// Per-candidate duplicate rules.
///
/// A candidate is a duplicate when any of these holds:
///
/// - `jaccard >= exact_jaccard`
/// - `token_overlap >= typo_overlap && character >= typo_character`
/// - `token_overlap >= minor_typo_overlap && character >= minor_typo_character`
///
/// Character similarity is only computed once `token_overlap` reaches
/// `character_gate`; below it the character score is `0.0`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DuplicateRules {
    pub character_gate: f64,
    pub exact_jaccard: f64,
    pub typo_overlap: f64,
    pub typo_character: f64,
    pub minor_typo_overlap: f64,
    pub minor_typo_character: f64,
}

impl Default for DuplicateRules {
    fn default() -> Self {
        Self {
            character_gate: 0.5,
            exact_jaccard: 1.0,
            typo_overlap: 0.8,
            typo_character: 0.90,
            minor_typo_overlap: 0.6,
            minor_typo_character: 0.95,
        }
    }
}

/// How two discriminative tokens are considered "shared".
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum TokenMatchMode {
    /// Tokens count as shared only when byte-identical.
    #[default]
    Exact,
    /// Tokens are paired greedily by normalized Levenshtein similarity;
    /// a pair counts as shared when its similarity is at least
    /// `min_token_similarity`. Lets "acme" and "acmee" share a token.
    Approximate { min_token_similarity: f64 },
}

/// Decision-engine configuration.
///
/// Built once, validated by
/// [`DuplicateDecisionEngine::new`](crate::DuplicateDecisionEngine::new), and
/// shared read-only by every check.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DedupConfig {
    #[serde(default)]
    pub normalization: NormalizationConfig,
    /// Query names whose trimmed length (in chars) is below this are not
    /// fuzzy-matched.
    #[serde(default = "DedupConfig::default_fuzzy_search_min_length")]
    pub fuzzy_search_min_length: usize,
    #[serde(default)]
    pub confidence_bands: ConfidenceBands,
    #[serde(default)]
    pub weights: ScoreWeights,
    #[serde(default)]
    pub rules: DuplicateRules,
    #[serde(default)]
    pub token_match: TokenMatchMode,
    /// Only the first `max_candidates` candidates are considered.
    #[serde(default)]
    pub max_candidates: Option<usize>,
    /// Candidate lists at least this long are scored on the rayon pool.
    #[serde(default = "DedupConfig::default_parallel_min_candidates")]
    pub parallel_min_candidates: usize,
    /// Attach the best candidate's [`SimilarityResult`](crate::SimilarityResult)
    /// to fuzzy results.
    #[serde(default)]
    pub explain: bool,
}

impl DedupConfig {
    pub(crate) fn default_fuzzy_search_min_length() -> usize {
        3
    }

    pub(crate) fn default_parallel_min_candidates() -> usize {
        64
    }

    pub fn validate(&self) -> Result<(), MatchError> {
        self.normalization.validate()?;

        let unit = |name: &str, value: f64| -> Result<(), MatchError> {
            if (0.0..=1.0).contains(&value) {
                Ok(())
            } else {
                Err(MatchError::InvalidConfig(format!(
                    "{name} must be between 0.0 and 1.0, got {value}"
                )))
            }
        };

        unit("confidence_bands.very_similar", self.confidence_bands.very_similar)?;
        unit("confidence_bands.similar", self.confidence_bands.similar)?;
        if self.confidence_bands.similar > self.confidence_bands.very_similar {
            return Err(MatchError::InvalidConfig(
                "confidence_bands.similar must not exceed confidence_bands.very_similar".into(),
            ));
        }

        unit("weights.jaccard", self.weights.jaccard)?;
        unit("weights.token_overlap", self.weights.token_overlap)?;
        unit("weights.character", self.weights.character)?;
        if (self.weights.sum() - 1.0).abs() > 1e-6 {
            return Err(MatchError::InvalidConfig(format!(
                "weights must sum to 1.0, got {}",
                self.weights.sum()
            )));
        }

        let rules = &self.rules;
        unit("rules.character_gate", rules.character_gate)?;
        unit("rules.exact_jaccard", rules.exact_jaccard)?;
        unit("rules.typo_overlap", rules.typo_overlap)?;
        unit("rules.typo_character", rules.typo_character)?;
        unit("rules.minor_typo_overlap", rules.minor_typo_overlap)?;
        unit("rules.minor_typo_character", rules.minor_typo_character)?;

        if let TokenMatchMode::Approximate {
            min_token_similarity,
        } = self.token_match
        {
            unit("token_match.min_token_similarity", min_token_similarity)?;
            if min_token_similarity == 0.0 {
                return Err(MatchError::InvalidConfig(
                    "token_match.min_token_similarity must be greater than 0.0".into(),
                ));
            }
        }

        if self.max_candidates == Some(0) {
            return Err(MatchError::InvalidConfig(
                "max_candidates must be greater than zero".into(),
            ));
        }
        if self.parallel_min_candidates == 0 {
            return Err(MatchError::InvalidConfig(
                "parallel_min_candidates must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            normalization: NormalizationConfig::default(),
            fuzzy_search_min_length: Self::default_fuzzy_search_min_length(),
            confidence_bands: ConfidenceBands::default(),
            weights: ScoreWeights::default(),
            rules: DuplicateRules::default(),
            token_match: TokenMatchMode::default(),
            max_candidates: None,
            parallel_min_candidates: Self::default_parallel_min_candidates(),
            explain: false,
        }
    }
}
