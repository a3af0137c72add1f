//! Configuration types for company-name normalization.
//!
//! [`NormalizationConfig`] is an immutable snapshot built once at startup and
//! passed by reference into [`TextNormalizer::new`](crate::TextNormalizer::new).
//! It is serde-friendly so it can be embedded in YAML/JSON configuration
//! files owned by the calling service.
//!
//! # Versioning
//!
//! The `version` field is folded into
//! [`NormalizedText::fingerprint`](crate::NormalizedText::fingerprint). Bump
//! it whenever a change to the suffix list or the toggles would change
//! normalized output, so previously stored fingerprints are not silently
//! compared against a different canonical form.
//!
//! # Examples
//!
//! ```rust
//! use canonical::NormalizationConfig;
//!
//! let config = NormalizationConfig::default();
//! assert_eq!(config.version, 1);
//! assert!(config.remove_company_suffixes);
//! assert!(config.company_suffixes.iter().any(|s| s == "GmbH"));
//! assert!(config.common_words.iter().any(|w| w == "tekstil"));
//! ```
//!
//! Overriding the lists for a single market:
//!
//! ```rust
//! use canonical::NormalizationConfig;
//!
//! let config = NormalizationConfig {
//!     company_suffixes: vec!["A.Ş.".into(), "Ltd. Şti.".into()],
//!     common_words: vec!["tekstil".into(), "sanayi".into()],
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};

use crate::error::CanonicalError;

/// Legal-form suffixes recognised out of the box.
///
/// Grouped by market: Turkish, English, German, French, Spanish, Italian.
/// Duplicates across markets are harmless; matching is longest-first.
pub const DEFAULT_COMPANY_SUFFIXES: &[&str] = &[
    // Turkish
    "A.Ş.", "A.S.", "AŞ", "AS", "Ltd.", "LTD.", "Şti.", "Sti.", "ŞTİ.", "STİ.", "Ltd. Şti.",
    "Ltd Şti", "LTD. ŞTİ.", "LTD ŞTİ",
    // English
    "Inc.", "INC.", "Inc", "LLC", "L.L.C.", "L.L.C", "Ltd", "Corp.", "CORP.", "Corp",
    "Corporation", "CORPORATION", "Co.", "CO.", "Co",
    // German
    "GmbH", "GMBH", "AG", "KG", "UG",
    // French
    "SA", "S.A.", "SARL", "S.A.R.L.", "SAS", "S.A.S.", "SNC", "S.N.C.",
    // Spanish
    "S.L.", "SL", "S.C.", "SC",
    // Italian
    "S.p.A.", "SpA", "SPA", "S.r.l.", "Srl", "SRL",
];

/// Generic industry and legal-form words that carry no identity.
pub const DEFAULT_COMMON_WORDS: &[&str] = &[
    // Turkish
    "tekstil", "kumaş", "fabric", "sanayi", "ticaret", "pazarlama", "ithalat", "ihracat",
    "yapi", "insaat", "makina", "otomotiv", "gida", "tarim", "enerji", "teknoloji",
    "yazilim", "danismanlik", "limited", "anonim", "sirket", "şirket", "kollektif",
    // English
    "textile", "manufacturing", "industry", "trade", "trading", "import", "export",
    "corporation", "company", "enterprises", "international", "global", "group",
    "holdings", "partners", "solutions", "services", "systems", "technologies", "software",
    // German
    "textil", "gewebe", "industrie", "handel", "handels", "gesellschaft", "unternehmen",
    "holding", "gruppe",
    // French
    "tissu", "commerce", "societe", "société", "entreprise", "groupe",
    // Spanish
    "tejido", "industria", "comercio", "internacional", "empresa", "compania", "compañia",
    "grupo",
    // Italian
    "tessile", "tessuto", "commercio", "internazionale", "societa", "società", "azienda",
    "gruppo",
];

/// Normalization settings for company names.
///
/// All toggles default to `true`. Empty `company_suffixes` or `common_words`
/// lists are valid and turn the corresponding step into a no-op.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct NormalizationConfig {
    /// Version of the normalization rules; must be >= 1.
    pub version: u32,

    /// Strip a trailing legal-form suffix ("A.Ş.", "GmbH", "Inc.") before
    /// any other transformation.
    pub remove_company_suffixes: bool,

    /// Decompose to NFD and drop combining marks after transliteration.
    pub remove_diacritics: bool,

    /// Lowercase after transliteration. Transliteration already lowercases,
    /// so this only matters for custom [`Transliterator`](crate::Transliterator)s
    /// that preserve case.
    pub lowercase: bool,

    /// Collapse whitespace runs to a single space and trim the ends.
    pub trim_whitespace: bool,

    /// Legal-form suffixes, matched case-insensitively, longest first.
    pub company_suffixes: Vec<String>,

    /// Generic words removed from token sets before comparison.
    pub common_words: Vec<String>,

    /// Inputs longer than this many bytes once trimmed are cut to fit and
    /// reported as [`Degradation::Truncated`](crate::Degradation::Truncated).
    pub max_input_bytes: Option<usize>,
}

impl Default for NormalizationConfig {
    fn default() -> Self {
        Self {
            version: 1,
            remove_company_suffixes: true,
            remove_diacritics: true,
            lowercase: true,
            trim_whitespace: true,
            company_suffixes: DEFAULT_COMPANY_SUFFIXES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            common_words: DEFAULT_COMMON_WORDS.iter().map(|s| s.to_string()).collect(),
            max_input_bytes: Some(4 * 1024),
        }
    }
}

impl NormalizationConfig {
    /// Configuration with every list empty: normalization still folds
    /// script, case, punctuation and whitespace but strips nothing.
    pub fn without_lists() -> Self {
        Self {
            company_suffixes: Vec::new(),
            common_words: Vec::new(),
            ..Self::default()
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), CanonicalError> {
        if self.version == 0 {
            return Err(CanonicalError::InvalidConfig(
                "normalization.version must be >= 1".into(),
            ));
        }
        if self.company_suffixes.iter().any(|s| s.trim().is_empty()) {
            return Err(CanonicalError::InvalidConfig(
                "normalization.company_suffixes must not contain blank entries".into(),
            ));
        }
        if self.common_words.iter().any(|w| w.trim().is_empty()) {
            return Err(CanonicalError::InvalidConfig(
                "normalization.common_words must not contain blank entries".into(),
            ));
        }
        if self.max_input_bytes == Some(0) {
            return Err(CanonicalError::InvalidConfig(
                "normalization.max_input_bytes must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}
