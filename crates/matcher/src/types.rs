use std::fmt;

use canonical::CanonicalError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::similarity::SimilarityResult;

/// A pre-selected existing record to compare the query against.
///
/// Supplied by the caller (typically from a trigram or identifier lookup);
/// the engine only reads it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CompanyCandidate {
    pub id: String,
    /// Trading name. A candidate without one is skipped for fuzzy scoring.
    #[serde(default)]
    pub name: Option<String>,
    /// Registered legal name, scored alongside `name` when present.
    #[serde(default)]
    pub legal_name: Option<String>,
    #[serde(default)]
    pub tax_id: Option<String>,
    #[serde(default)]
    pub registration_number: Option<String>,
}

impl CompanyCandidate {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn with_legal_name(mut self, legal_name: impl Into<String>) -> Self {
        self.legal_name = Some(legal_name.into());
        self
    }

    pub fn with_tax_id(mut self, tax_id: impl Into<String>) -> Self {
        self.tax_id = Some(tax_id.into());
        self
    }

    pub fn with_registration_number(mut self, registration_number: impl Into<String>) -> Self {
        self.registration_number = Some(registration_number.into());
        self
    }

    /// Trimmed non-blank name, if any.
    pub(crate) fn usable_name(&self) -> Option<&str> {
        non_blank(self.name.as_deref())
    }

    pub(crate) fn usable_legal_name(&self) -> Option<&str> {
        non_blank(self.legal_name.as_deref())
    }
}

pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// A query plus the candidates it should be checked against.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DuplicateCheckRequest {
    pub name: String,
    #[serde(default)]
    pub tax_id: Option<String>,
    #[serde(default)]
    pub registration_number: Option<String>,
    #[serde(default)]
    pub candidates: Vec<CompanyCandidate>,
}

/// Which rule produced the decision.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchType {
    ExactTaxId,
    ExactRegistration,
    FuzzyName,
    None,
}

impl MatchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchType::ExactTaxId => "EXACT_TAX_ID",
            MatchType::ExactRegistration => "EXACT_REGISTRATION",
            MatchType::FuzzyName => "FUZZY_NAME",
            MatchType::None => "NONE",
        }
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the caller should do with the new record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    /// An identifier already exists; creation must be refused.
    HardBlock,
    /// Confidence in the very-similar band.
    LikelyDuplicate,
    /// Confidence in the similar band.
    Verify,
    /// Some similarity below both bands.
    ProceedWithCaution,
    /// Nothing similar was found.
    Proceed,
}

impl Recommendation {
    pub fn message(&self) -> &'static str {
        match self {
            Recommendation::HardBlock => "cannot create: identifier already exists",
            Recommendation::LikelyDuplicate => {
                "very similar, likely duplicate, review before creating"
            }
            Recommendation::Verify => "similar, please verify",
            Recommendation::ProceedWithCaution => "possibly similar, proceed with caution",
            Recommendation::Proceed => "no similar company found",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Final verdict of a duplicate check.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DuplicateCheckResult {
    pub is_duplicate: bool,
    pub match_type: MatchType,
    pub matched_candidate_id: Option<String>,
    pub matched_candidate_name: Option<String>,
    /// `1.0` for identifier matches; the best fuzzy confidence otherwise.
    pub confidence: f64,
    pub message: String,
    pub recommendation: Recommendation,
    /// Similarity breakdown of the best candidate, when explanation is on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<SimilarityResult>,
}

/// Errors produced by the matching layer.
///
/// Only construction can fail; a check on a valid engine always yields a
/// [`DuplicateCheckResult`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MatchError {
    #[error("invalid match config: {0}")]
    InvalidConfig(String),
    #[error("canonical error: {0}")]
    Canonical(#[from] CanonicalError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn match_type_serializes_screaming_snake() {
        let json = serde_json::to_string(&MatchType::ExactTaxId).expect("serialize");
        assert_eq!(json, "\"EXACT_TAX_ID\"");
        assert_eq!(MatchType::FuzzyName.to_string(), "FUZZY_NAME");
        let parsed: MatchType = serde_json::from_str("\"NONE\"").expect("deserialize");
        assert_eq!(parsed, MatchType::None);
    }

    #[test]
    fn candidate_deserializes_with_missing_fields() {
        let candidate: CompanyCandidate =
            serde_json::from_str(r#"{"id":"c-1","name":"  "}"#).expect("deserialize");
        assert_eq!(candidate.usable_name(), None);
        assert_eq!(candidate.tax_id, None);
    }

    #[test]
    fn builder_sets_identifiers() {
        let candidate = CompanyCandidate::new("c-1", "Acme")
            .with_tax_id("123")
            .with_registration_number("R-9")
            .with_legal_name("Acme Holding A.Ş.");
        assert_eq!(candidate.usable_name(), Some("Acme"));
        assert_eq!(candidate.usable_legal_name(), Some("Acme Holding A.Ş."));
        assert_eq!(candidate.tax_id.as_deref(), Some("123"));
        assert_eq!(candidate.registration_number.as_deref(), Some("R-9"));
    }

    #[test]
    fn hard_block_message() {
        assert_eq!(
            Recommendation::HardBlock.to_string(),
            "cannot create: identifier already exists"
        );
    }
}
