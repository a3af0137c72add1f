//! Punctuation and whitespace cleanup, the last two pipeline stages.
//!
//! Both helpers are deterministic and usable on their own when a caller only
//! needs part of the pipeline.
//!
//! ```rust
//! use canonical::{collapse_whitespace, replace_punctuation};
//!
//! let cleaned = collapse_whitespace(&replace_punctuation("acme (europe) - b.v."));
//! assert_eq!(cleaned, "acme europe b v");
//! ```

/// Characters replaced by a space in the punctuation stage.
///
/// Anything outside this set (`&`, `/`, `+`, ...) is kept; it usually ends up
/// in a one-character token that the tokenizer drops.
pub const PUNCTUATION: &[char] = &[
    '.', ',', ';', ':', '!', '?', '-', '_', '(', ')', '[', ']', '{', '}', '"', '\'', '`',
];

/// Replaces every character in [`PUNCTUATION`] with a single space.
pub fn replace_punctuation(text: &str) -> String {
    text.chars()
        .map(|ch| if PUNCTUATION.contains(&ch) { ' ' } else { ch })
        .collect()
}

/// Collapses repeated whitespace, trims edges, and normalizes newlines to
/// single spaces.
///
/// All Unicode whitespace counts as a delimiter, including the non-breaking
/// space that often sneaks in from copy-pasted registry extracts.
///
/// ```rust
/// use canonical::collapse_whitespace;
///
/// assert_eq!(collapse_whitespace("  acme \t\n tekstil  "), "acme tekstil");
/// assert_eq!(collapse_whitespace("acme\u{00A0}tekstil"), "acme tekstil");
/// assert_eq!(collapse_whitespace("   "), "");
/// ```
pub fn collapse_whitespace(text: &str) -> String {
    let mut normalized = String::with_capacity(text.len());
    for segment in text.split_whitespace() {
        if !normalized.is_empty() {
            normalized.push(' ');
        }
        normalized.push_str(segment);
    }
    normalized
}
