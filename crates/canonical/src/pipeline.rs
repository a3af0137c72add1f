use std::sync::Arc;

use tracing::warn;
use unicode_categories::UnicodeCategories;
use unicode_normalization::UnicodeNormalization;

use crate::config::NormalizationConfig;
use crate::error::{CanonicalError, TransliterationError};
use crate::normalized::{Degradation, NormalizedText};
use crate::suffix::SuffixStripper;
use crate::token::{tokenize, CommonWords, TokenSet};
use crate::transliterate::{AsciiFolding, Transliterator};
use crate::whitespace::{collapse_whitespace, replace_punctuation};

/// Company-name normalizer built once from a [`NormalizationConfig`].
///
/// Construction sorts the suffix list and folds the suffix and common-word
/// lists through the same stages names go through, so per-call work is
/// limited to the input itself. The normalizer holds no mutable state and
/// can be shared across threads.
#[derive(Clone)]
pub struct TextNormalizer {
    config: NormalizationConfig,
    transliterator: Arc<dyn Transliterator>,
    suffixes: SuffixStripper,
    common_words: CommonWords,
}

impl std::fmt::Debug for TextNormalizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextNormalizer")
            .field("config", &self.config)
            .field("common_words", &self.common_words.len())
            .finish_non_exhaustive()
    }
}

impl TextNormalizer {
    /// Normalizer using [`AsciiFolding`] for transliteration.
    pub fn new(config: &NormalizationConfig) -> Self {
        Self::with_transliterator(config, Arc::new(AsciiFolding))
    }

    pub fn with_transliterator(
        config: &NormalizationConfig,
        transliterator: Arc<dyn Transliterator>,
    ) -> Self {
        let fold_entry = |text: &str| fold(config, transliterator.as_ref(), text).0;
        let suffixes = SuffixStripper::new(&config.company_suffixes, fold_entry);
        let common_words = CommonWords::with_folding(&config.common_words, fold_entry);
        Self {
            config: config.clone(),
            transliterator,
            suffixes,
            common_words,
        }
    }

    pub fn config(&self) -> &NormalizationConfig {
        &self.config
    }

    pub fn common_words(&self) -> &CommonWords {
        &self.common_words
    }

    /// Normalizes a raw company name.
    ///
    /// Stages, in order: suffix removal, transliteration (with lowercasing),
    /// diacritic removal, lowercasing, punctuation replacement, whitespace
    /// collapsing. Blank input yields empty text. This never fails: internal
    /// errors are logged and reported through
    /// [`NormalizedText::degradation`].
    ///
    /// Input whose trimmed length exceeds `max_input_bytes` is cut at a char
    /// boundary and normalized until the result no longer changes, so the
    /// output of an oversized input normalizes to itself as well.
    pub fn normalize(&self, raw: &str) -> NormalizedText {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return NormalizedText::clean(String::new(), self.config.version);
        }

        let oversized = self
            .config
            .max_input_bytes
            .filter(|limit| trimmed.len() > *limit);
        if let Some(limit) = oversized {
            let err = CanonicalError::InputTooLarge {
                len: trimmed.len(),
                limit,
            };
            warn!(error = %err, "normalize_input_truncated");
            return NormalizedText::degraded(
                self.fit_within(trimmed, limit),
                self.config.version,
                Degradation::Truncated(err),
            );
        }

        match self.run(raw) {
            (text, None) => NormalizedText::clean(text, self.config.version),
            (text, Some(err)) => {
                warn!(error = %err, input_len = raw.len(), "normalize_transliteration_fallback");
                NormalizedText::degraded(
                    text,
                    self.config.version,
                    Degradation::Transliteration(err),
                )
            }
        }
    }

    /// Normalizes and tokenizes a raw name.
    pub fn tokens(&self, raw: &str) -> TokenSet {
        tokenize(self.normalize(raw).as_str())
    }

    /// True when both names normalize to the same text.
    pub fn are_equivalent(&self, a: &str, b: &str) -> bool {
        self.normalize(a).as_str() == self.normalize(b).as_str()
    }

    fn run(&self, raw: &str) -> (String, Option<TransliterationError>) {
        let strip = self.config.remove_company_suffixes && !self.suffixes.is_empty();
        let stripped = if strip {
            self.suffixes.strip_raw(raw)
        } else {
            raw
        };

        let (folded, transliteration_err) =
            fold(&self.config, self.transliterator.as_ref(), stripped);

        let text = if strip {
            self.suffixes.strip_folded(&folded).to_string()
        } else {
            folded
        };
        (text, transliteration_err)
    }

    /// Cuts `text` to `limit` bytes and reruns the pipeline on its own output
    /// until it settles. Folding can grow the text past the limit again
    /// ("北" folds to "bei"), and a cut can expose a trailing suffix.
    fn fit_within(&self, text: &str, limit: usize) -> String {
        let mut current = self.run(truncate_to(text, limit)).0;
        for _ in 0..MAX_REFOLD_PASSES {
            let next = self.run(truncate_to(current.trim(), limit)).0;
            if next == current {
                break;
            }
            current = next;
        }
        current
    }
}

const MAX_REFOLD_PASSES: usize = 8;

/// Longest prefix of `text` that fits in `limit` bytes without splitting a char.
fn truncate_to(text: &str, limit: usize) -> &str {
    if text.len() <= limit {
        return text;
    }
    let mut end = limit;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// One-shot normalization with the default transliterator.
///
/// Builds a [`TextNormalizer`] per call; prefer holding a normalizer when
/// normalizing many names under one configuration.
///
/// ```rust
/// use canonical::{normalize, NormalizationConfig};
///
/// let cfg = NormalizationConfig::default();
/// assert_eq!(normalize("İstanbul Tekstil A.Ş.", &cfg).as_str(), "istanbul tekstil");
/// assert_eq!(normalize("Société Française SA", &cfg).as_str(), "societe francaise");
/// ```
pub fn normalize(raw: &str, config: &NormalizationConfig) -> NormalizedText {
    TextNormalizer::new(config).normalize(raw)
}

/// Stages 2 through 6. Transliteration failure falls back to lowercasing the
/// input and is reported alongside the result.
fn fold(
    config: &NormalizationConfig,
    transliterator: &dyn Transliterator,
    text: &str,
) -> (String, Option<TransliterationError>) {
    let (mut out, err) = match transliterator.transliterate(text) {
        Ok(folded) => (folded, None),
        Err(err) => (text.to_lowercase(), Some(err)),
    };

    if config.remove_diacritics {
        out = strip_diacritics(&out);
    }
    if config.lowercase {
        out = out.to_lowercase();
    }
    out = replace_punctuation(&out);
    if config.trim_whitespace {
        out = collapse_whitespace(&out);
    }
    (out, err)
}

/// Canonical decomposition (NFD) followed by dropping every mark (Mn, Mc, Me).
fn strip_diacritics(text: &str) -> String {
    text.nfd().filter(|ch| !ch.is_mark()).collect()
}
