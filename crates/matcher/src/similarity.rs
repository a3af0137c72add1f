//! Name similarity scoring.
//!
//! Both names go through the canonical pipeline, get tokenized, and lose
//! their common words. The remaining discriminative tokens are compared
//! three ways:
//!
//! - **Jaccard**: `|A ∩ B| / |A ∪ B|`
//! - **Token overlap**: `|A ∩ B| / min(|A|, |B|)`
//! - **Character similarity**: `1 - lev(a, b) / max(len(a), len(b))` over the
//!   space-joined token sets, only computed when token overlap reaches the
//!   configured gate
//!
//! For both set ratios, two empty sets score `1.0` and exactly one empty set
//! scores `0.0`.

use std::fmt;

use canonical::{filter_common, TextNormalizer, TokenSet};
use serde::{Deserialize, Serialize};

use crate::config::{DedupConfig, DuplicateRules, ScoreWeights, TokenMatchMode};

/// Score breakdown for one query/candidate pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimilarityResult {
    pub jaccard_score: f64,
    pub token_overlap: f64,
    pub character_similarity: f64,
    /// Query tokens left after common-word filtering.
    pub unique_tokens_query: TokenSet,
    /// Candidate tokens left after common-word filtering.
    pub unique_tokens_candidate: TokenSet,
    /// Tokens shared by both names before common-word filtering.
    pub common_tokens: TokenSet,
    pub confidence: f64,
    pub is_duplicate: bool,
}

impl fmt::Display for SimilarityResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Jaccard: {:.2}, Token Overlap: {:.2}, Char Similarity: {:.2}, \
             Unique1: {}, Unique2: {}, Common: {}, Duplicate: {}",
            self.jaccard_score,
            self.token_overlap,
            self.character_similarity,
            self.unique_tokens_query,
            self.unique_tokens_candidate,
            self.common_tokens,
            self.is_duplicate
        )
    }
}

/// A name already normalized, tokenized and filtered.
///
/// The engine prepares the query once and scores it against every candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedName {
    tokens: TokenSet,
    unique: TokenSet,
}

impl PreparedName {
    pub fn tokens(&self) -> &TokenSet {
        &self.tokens
    }

    pub fn unique_tokens(&self) -> &TokenSet {
        &self.unique
    }
}

/// Scores company names against each other under one configuration.
#[derive(Debug, Clone)]
pub struct SimilarityScorer {
    normalizer: TextNormalizer,
    weights: ScoreWeights,
    rules: DuplicateRules,
    token_match: TokenMatchMode,
}

impl SimilarityScorer {
    pub fn new(config: &DedupConfig) -> Self {
        Self::with_normalizer(TextNormalizer::new(&config.normalization), config)
    }

    /// Scorer using a caller-built normalizer (e.g. a custom transliterator).
    pub fn with_normalizer(normalizer: TextNormalizer, config: &DedupConfig) -> Self {
        Self {
            normalizer,
            weights: config.weights,
            rules: config.rules,
            token_match: config.token_match,
        }
    }

    pub fn normalizer(&self) -> &TextNormalizer {
        &self.normalizer
    }

    pub fn prepare(&self, name: &str) -> PreparedName {
        let tokens = self.normalizer.tokens(name);
        let unique = filter_common(&tokens, self.normalizer.common_words());
        PreparedName { tokens, unique }
    }

    /// Scores two raw names.
    pub fn score(&self, query_name: &str, candidate_name: &str) -> SimilarityResult {
        self.score_prepared(&self.prepare(query_name), &self.prepare(candidate_name))
    }

    pub fn score_prepared(&self, query: &PreparedName, candidate: &PreparedName) -> SimilarityResult {
        let a = &query.unique;
        let b = &candidate.unique;

        let shared = match self.token_match {
            TokenMatchMode::Exact => a.intersection_len(b),
            TokenMatchMode::Approximate {
                min_token_similarity,
            } => approximate_shared(a, b, min_token_similarity),
        };
        let jaccard_score = set_ratio(shared, a.len(), b.len(), a.len() + b.len() - shared);
        let token_overlap = set_ratio(shared, a.len(), b.len(), a.len().min(b.len()));

        let character_similarity = if token_overlap >= self.rules.character_gate {
            character_similarity(a, b)
        } else {
            0.0
        };

        let confidence = (self.weights.jaccard * jaccard_score
            + self.weights.token_overlap * token_overlap
            + self.weights.character * character_similarity)
            .clamp(0.0, 1.0);

        let is_duplicate = self
            .rules
            .is_duplicate(jaccard_score, token_overlap, character_similarity);

        SimilarityResult {
            jaccard_score,
            token_overlap,
            character_similarity,
            unique_tokens_query: a.clone(),
            unique_tokens_candidate: b.clone(),
            common_tokens: query.tokens.intersection(&candidate.tokens),
            confidence,
            is_duplicate,
        }
    }
}

impl DuplicateRules {
    pub fn is_duplicate(&self, jaccard: f64, token_overlap: f64, character: f64) -> bool {
        jaccard >= self.exact_jaccard
            || (token_overlap >= self.typo_overlap && character >= self.typo_character)
            || (token_overlap >= self.minor_typo_overlap && character >= self.minor_typo_character)
    }
}

fn set_ratio(shared: usize, a_len: usize, b_len: usize, denominator: usize) -> f64 {
    match (a_len, b_len) {
        (0, 0) => 1.0,
        (0, _) | (_, 0) => 0.0,
        _ if denominator == 0 => 0.0,
        _ => shared as f64 / denominator as f64,
    }
}

/// `|A ∩ B| / |A ∪ B|` with exact token equality.
pub fn jaccard(a: &TokenSet, b: &TokenSet) -> f64 {
    let shared = a.intersection_len(b);
    set_ratio(shared, a.len(), b.len(), a.union_len(b))
}

/// `|A ∩ B| / min(|A|, |B|)` with exact token equality.
pub fn token_overlap(a: &TokenSet, b: &TokenSet) -> f64 {
    set_ratio(a.intersection_len(b), a.len(), b.len(), a.len().min(b.len()))
}

/// Normalized Levenshtein similarity of the space-joined token sets.
pub fn character_similarity(a: &TokenSet, b: &TokenSet) -> f64 {
    edit_similarity(&a.joined(), &b.joined())
}

/// `1 - lev(a, b) / max(len(a), len(b))` counted in chars; two empty
/// strings are identical.
pub fn edit_similarity(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(a, b)
}

/// Number of token pairs matched greedily, most similar first.
///
/// Every pair at or above `min_similarity` is a candidate; pairs are taken
/// in descending similarity (ties by token order) and each token is used at
/// most once.
fn approximate_shared(a: &TokenSet, b: &TokenSet, min_similarity: f64) -> usize {
    let left: Vec<&str> = a.iter().collect();
    let right: Vec<&str> = b.iter().collect();

    let mut pairs = Vec::new();
    for (i, x) in left.iter().enumerate() {
        for (j, y) in right.iter().enumerate() {
            let sim = if x == y { 1.0 } else { edit_similarity(x, y) };
            if sim >= min_similarity {
                pairs.push((sim, i, j));
            }
        }
    }
    pairs.sort_by(|p, q| q.0.total_cmp(&p.0).then(p.1.cmp(&q.1)).then(p.2.cmp(&q.2)));

    let mut used_left = vec![false; left.len()];
    let mut used_right = vec![false; right.len()];
    let mut matched = 0;
    for (_, i, j) in pairs {
        if used_left[i] || used_right[j] {
            continue;
        }
        used_left[i] = true;
        used_right[j] = true;
        matched += 1;
    }
    matched
}

#[cfg(test)]
mod tests {
    use super::*;
    use canonical::NormalizationConfig;

    fn set(tokens: &[&str]) -> TokenSet {
        tokens.iter().copied().collect()
    }

    fn scorer_with_common(words: &[&str]) -> SimilarityScorer {
        let config = DedupConfig {
            normalization: NormalizationConfig {
                common_words: words.iter().map(|w| w.to_string()).collect(),
                ..Default::default()
            },
            ..Default::default()
        };
        SimilarityScorer::new(&config)
    }

    #[test]
    fn jaccard_identity_and_empty_rules() {
        let a = set(&["acme", "mills"]);
        assert_eq!(jaccard(&a, &a), 1.0);
        assert_eq!(jaccard(&TokenSet::new(), &TokenSet::new()), 1.0);
        assert_eq!(jaccard(&a, &TokenSet::new()), 0.0);
        assert_eq!(jaccard(&TokenSet::new(), &a), 0.0);
    }

    #[test]
    fn set_ratios_are_symmetric() {
        let a = set(&["acme", "mills", "europe"]);
        let b = set(&["acme", "mills"]);
        assert_eq!(jaccard(&a, &b), jaccard(&b, &a));
        assert!((jaccard(&a, &b) - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(token_overlap(&a, &b), 1.0);
        assert_eq!(token_overlap(&a, &b), token_overlap(&b, &a));
    }

    #[test]
    fn edit_similarity_matches_formula() {
        assert_eq!(edit_similarity("", ""), 1.0);
        assert!((edit_similarity("acme", "acmee") - 0.8).abs() < 1e-12);
        assert!((edit_similarity("kitten", "sitting") - (1.0 - 3.0 / 7.0)).abs() < 1e-12);
    }

    #[test]
    fn different_companies_sharing_generic_word() {
        let scorer = scorer_with_common(&["tekstil"]);
        let result = scorer.score("Akme Tekstil", "Akkayalar Tekstil");
        assert_eq!(result.unique_tokens_query, set(&["akme"]));
        assert_eq!(result.unique_tokens_candidate, set(&["akkayalar"]));
        assert_eq!(result.jaccard_score, 0.0);
        assert_eq!(result.token_overlap, 0.0);
        assert_eq!(result.character_similarity, 0.0);
        assert_eq!(result.common_tokens, set(&["tekstil"]));
        assert!(!result.is_duplicate);
    }

    #[test]
    fn same_company_across_scripts_and_suffixes() {
        let scorer = scorer_with_common(&["tekstil"]);
        let result = scorer.score("İstanbul Tekstil A.Ş.", "istanbul tekstil");
        assert_eq!(result.unique_tokens_query, set(&["istanbul"]));
        assert_eq!(result.unique_tokens_candidate, set(&["istanbul"]));
        assert_eq!(result.jaccard_score, 1.0);
        assert_eq!(result.confidence, 1.0);
        assert!(result.is_duplicate);
    }

    #[test]
    fn character_similarity_gated_by_overlap() {
        let scorer = scorer_with_common(&[]);
        // overlap 1/2 reaches the gate
        let result = scorer.score("Acme Widgets", "Acme Gadgets Europe");
        assert_eq!(result.token_overlap, 0.5);
        assert!(result.character_similarity > 0.0);

        // overlap 1/3 stays below it
        let result = scorer.score("Acme Widgets Mills", "Acme Gadgets Europe");
        assert!(result.token_overlap < 0.5);
        assert_eq!(result.character_similarity, 0.0);
    }

    #[test]
    fn single_typo_is_not_caught_with_exact_tokens() {
        let scorer = scorer_with_common(&[]);
        let result = scorer.score("Acme", "Acmee");
        assert_eq!(result.token_overlap, 0.0);
        assert!(!result.is_duplicate);
    }

    #[test]
    fn approximate_tokens_catch_single_typo() {
        let config = DedupConfig {
            token_match: TokenMatchMode::Approximate {
                min_token_similarity: 0.75,
            },
            ..Default::default()
        };
        let scorer = SimilarityScorer::new(&config);
        let result = scorer.score("Acme Bilişim", "Acmee Bilisim");
        assert_eq!(result.token_overlap, 1.0);
        assert_eq!(result.jaccard_score, 1.0);
        assert!(result.is_duplicate);
    }

    #[test]
    fn approximate_pairs_each_token_once() {
        let a = set(&["acme"]);
        let b = set(&["acme", "acmee"]);
        assert_eq!(approximate_shared(&a, &b, 0.75), 1);
        assert_eq!(approximate_shared(&b, &b, 0.75), 2);
        assert_eq!(approximate_shared(&a, &set(&["zeta"]), 0.75), 0);
    }

    #[test]
    fn rules_cover_typo_bands() {
        let rules = DuplicateRules::default();
        assert!(rules.is_duplicate(1.0, 1.0, 1.0));
        assert!(rules.is_duplicate(0.5, 0.8, 0.91));
        assert!(rules.is_duplicate(0.4, 0.6, 0.96));
        assert!(!rules.is_duplicate(0.4, 0.6, 0.94));
        assert!(!rules.is_duplicate(0.5, 0.59, 0.99));
        assert!(!rules.is_duplicate(0.5, 0.79, 0.9));
    }

    #[test]
    fn explanation_line() {
        let scorer = scorer_with_common(&["tekstil"]);
        let text = scorer.score("Akme Tekstil", "Akkayalar Tekstil").to_string();
        assert_eq!(
            text,
            "Jaccard: 0.00, Token Overlap: 0.00, Char Similarity: 0.00, \
             Unique1: [akme], Unique2: [akkayalar], Common: [tekstil], Duplicate: false"
        );
    }

    #[test]
    fn confidence_stays_in_unit_range() {
        let scorer = scorer_with_common(&[]);
        for (q, c) in [
            ("Acme", "Acme"),
            ("Acme Mills", "Acme"),
            ("Zeta", "Acme"),
            ("", ""),
        ] {
            let result = scorer.score(q, c);
            assert!((0.0..=1.0).contains(&result.confidence), "{q} vs {c}");
        }
    }
}
