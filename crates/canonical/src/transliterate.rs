//! Script folding to lowercase ASCII.
//!
//! The pipeline depends on a single capability: turn arbitrary Unicode text
//! into a Latin/ASCII approximation. [`AsciiFolding`] provides it with the
//! `deunicode` tables; callers that need locale-specific rules can plug in
//! their own [`Transliterator`].
//!
//! `AsciiFolding` maps each `char` independently, so results do not depend
//! on neighbouring characters or on the host locale:
//!
//! ```rust
//! use canonical::{AsciiFolding, Transliterator};
//!
//! let folded = AsciiFolding.transliterate("İstanbul München Москва").unwrap();
//! assert_eq!(folded, "istanbul munchen moskva");
//! ```

use deunicode::deunicode_char;
use unicode_categories::UnicodeCategories;

use crate::error::TransliterationError;

/// Folds text in any script to a lowercase Latin/ASCII form.
pub trait Transliterator: Send + Sync {
    fn transliterate(&self, text: &str) -> Result<String, TransliterationError>;
}

impl<F> Transliterator for F
where
    F: Fn(&str) -> Result<String, TransliterationError> + Send + Sync,
{
    fn transliterate(&self, text: &str) -> Result<String, TransliterationError> {
        self(text)
    }
}

/// Table-driven ASCII folding backed by `deunicode`.
///
/// Fails with [`TransliterationError::Unmappable`] on the first character the
/// table has no entry for; the normalizer then falls back to plain
/// lowercasing for that input. Combining marks without an entry are dropped
/// instead, as the diacritic stage would drop them anyway.
#[derive(Debug, Clone, Copy, Default)]
pub struct AsciiFolding;

impl Transliterator for AsciiFolding {
    fn transliterate(&self, text: &str) -> Result<String, TransliterationError> {
        let mut out = String::with_capacity(text.len());
        for ch in text.chars() {
            if ch.is_ascii() {
                out.push(ch.to_ascii_lowercase());
                continue;
            }
            match deunicode_char(ch) {
                Some(folded) => out.extend(folded.chars().map(|c| c.to_ascii_lowercase())),
                // a mark carries no letter of its own
                None if ch.is_mark() => {}
                None => return Err(TransliterationError::Unmappable(ch)),
            }
        }
        Ok(out)
    }
}
