//! Company-name canonical layer.
//!
//! Turns raw company names into a deterministic comparable form so that
//! "İstanbul Tekstil A.Ş." and "istanbul tekstil" end up as the same text.
//! The matcher crate builds its token sets and similarity scores on top of
//! this.
//!
//! ## Pipeline
//!
//! 1. Trailing legal-form suffix removal (longest first, case-insensitive)
//! 2. Transliteration to ASCII with lowercasing ([`Transliterator`])
//! 3. Diacritic removal: NFD decomposition, then every combining mark dropped
//! 4. Lowercasing
//! 5. Punctuation `. , ; : ! ? - _ ( ) [ ] { } " ' `` ` `` replaced by spaces
//! 6. Whitespace collapsed and trimmed
//!
//! Tokenization splits the result on whitespace, drops tokens shorter than
//! two characters and collapses duplicates. Common words ("tekstil",
//! "holding") can then be filtered out to leave the discriminative tokens.
//!
//! ## Failure model
//!
//! Normalization never returns an error. When a stage fails the result is
//! marked with a [`Degradation`] and a warning is logged:
//!
//! - transliteration failure lowercases the suffix-stripped input and keeps
//!   going with the remaining stages
//! - input longer than `max_input_bytes` after trimming is cut at a char
//!   boundary and normalized until the output is stable
//!
//! ## Determinism
//!
//! No I/O, no clock, no locale. Output depends only on the input, the
//! [`NormalizationConfig`] and the transliterator. Applying the pipeline to
//! its own output returns the same text.

mod config;
mod error;
mod hash;
mod normalized;
mod pipeline;
mod suffix;
mod token;
mod transliterate;
mod whitespace;

pub use crate::config::{NormalizationConfig, DEFAULT_COMMON_WORDS, DEFAULT_COMPANY_SUFFIXES};
pub use crate::error::{CanonicalError, TransliterationError};
pub use crate::hash::fingerprint_normalized;
pub use crate::normalized::{Degradation, NormalizedText};
pub use crate::pipeline::{normalize, TextNormalizer};
pub use crate::token::{filter_common, tokenize, CommonWords, TokenSet, MIN_TOKEN_CHARS};
pub use crate::transliterate::{AsciiFolding, Transliterator};
pub use crate::whitespace::{collapse_whitespace, replace_punctuation, PUNCTUATION};
