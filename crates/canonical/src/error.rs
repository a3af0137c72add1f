use thiserror::Error;

/// Errors raised inside the normalization pipeline.
///
/// None of these escape [`TextNormalizer::normalize`](crate::TextNormalizer::normalize);
/// they are recorded on the returned [`NormalizedText`](crate::NormalizedText)
/// as the reason for a degraded result. `InvalidConfig` is returned from
/// [`NormalizationConfig::validate`](crate::NormalizationConfig::validate).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CanonicalError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("input of {len} bytes exceeds limit of {limit} bytes")]
    InputTooLarge { len: usize, limit: usize },
    #[error("transliteration failed: {0}")]
    Transliteration(#[from] TransliterationError),
}

/// Failure reported by a [`Transliterator`](crate::Transliterator).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransliterationError {
    #[error("no ascii mapping for {0:?}")]
    Unmappable(char),
    #[error("{0}")]
    Other(String),
}
