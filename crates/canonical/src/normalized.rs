use std::fmt;

use crate::error::{CanonicalError, TransliterationError};
use crate::hash::fingerprint_normalized;
use crate::token::{tokenize, TokenSet};

/// Why a normalization result is not the product of the full pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Degradation {
    /// Transliteration failed; the suffix-stripped input was lowercased
    /// instead and the remaining stages ran on that.
    Transliteration(TransliterationError),
    /// The trimmed input exceeded `max_input_bytes`; only the leading
    /// `max_input_bytes` were normalized.
    Truncated(CanonicalError),
}

impl fmt::Display for Degradation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Degradation::Transliteration(err) => write!(f, "transliteration fallback: {err}"),
            Degradation::Truncated(err) => write!(f, "input truncated: {err}"),
        }
    }
}

/// Canonical comparable form of a company name.
///
/// Produced by [`TextNormalizer::normalize`](crate::TextNormalizer::normalize).
/// A degraded result is still usable for comparison;
/// [`degradation`](NormalizedText::degradation) tells the caller how it was
/// obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedText {
    text: String,
    version: u32,
    degradation: Option<Degradation>,
}

impl NormalizedText {
    pub(crate) fn clean(text: String, version: u32) -> Self {
        Self {
            text,
            version,
            degradation: None,
        }
    }

    pub(crate) fn degraded(text: String, version: u32, reason: Degradation) -> Self {
        Self {
            text,
            version,
            degradation: Some(reason),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Version of the rules that produced this text.
    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn is_degraded(&self) -> bool {
        self.degradation.is_some()
    }

    pub fn degradation(&self) -> Option<&Degradation> {
        self.degradation.as_ref()
    }

    pub fn tokens(&self) -> TokenSet {
        tokenize(&self.text)
    }

    /// Stable lookup key for exact normalized-name matching.
    pub fn fingerprint(&self) -> String {
        fingerprint_normalized(self.version, &self.text)
    }
}

impl AsRef<str> for NormalizedText {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for NormalizedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
