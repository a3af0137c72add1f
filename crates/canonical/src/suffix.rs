//! Trailing legal-form suffix removal.
//!
//! Suffixes are tried longest first and matched case-insensitively against
//! the end of the name. A match counts when it is separated from the rest of
//! the name by whitespace or a comma ("Acme, Inc."), or, for the configured
//! spellings of three or more characters, when it is written exactly as
//! configured and glued on at a lowercase-to-uppercase step ("AcmeGmbH").
//! It never counts inside a word ("Texas" keeps its "as", "Zinc" its "inc"),
//! and never when it would consume the whole name. Removal repeats until no
//! suffix matches, so "Acme Ltd. Co." loses both forms.
//!
//! The stripper keeps two lists: the configured spellings, applied to the
//! raw input, and their folded forms ("A.Ş." -> "a s"), applied to the
//! folded output. The second pass catches spellings the raw list does not
//! enumerate ("A. Ş.", "(Ltd)") and keeps normalization idempotent.

fn is_separator(ch: char) -> bool {
    ch.is_whitespace() || ch == ','
}

fn chars_eq_ignore_case(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

/// Byte offset where `suffix` starts if `text` ends with it, ignoring case.
fn find_suffix_ignore_case(text: &str, suffix: &str) -> Option<usize> {
    let mut text_chars = text.char_indices().rev();
    let mut start = text.len();
    for expected in suffix.chars().rev() {
        let (idx, actual) = text_chars.next()?;
        if !chars_eq_ignore_case(actual, expected) {
            return None;
        }
        start = idx;
    }
    Some(start)
}

/// Shortest configured suffix that may be glued to the name without a
/// separator.
const MIN_ATTACHED_SUFFIX_CHARS: usize = 3;

/// "AcmeGmbH": the suffix appears exactly as configured, starts uppercase and
/// follows a lowercase letter.
fn is_attached(head: &str, found: &str, suffix: &str) -> bool {
    found == suffix
        && suffix.chars().count() >= MIN_ATTACHED_SUFFIX_CHARS
        && suffix.chars().next().is_some_and(char::is_uppercase)
        && head.chars().next_back().is_some_and(char::is_lowercase)
}

fn sorted_longest_first(mut list: Vec<String>) -> Vec<String> {
    list.retain(|s| !s.trim().is_empty());
    list.sort_by(|a, b| {
        b.chars()
            .count()
            .cmp(&a.chars().count())
            .then_with(|| a.cmp(b))
    });
    list.dedup();
    list
}

fn strip_with<'a>(text: &'a str, suffixes: &[String], allow_attached: bool) -> &'a str {
    let mut current = text;
    'restart: loop {
        let trimmed = current.trim_end();
        for suffix in suffixes {
            let Some(start) = find_suffix_ignore_case(trimmed, suffix) else {
                continue;
            };
            let head = &trimmed[..start];
            let separated = head.ends_with(is_separator);
            if !separated && !(allow_attached && is_attached(head, &trimmed[start..], suffix)) {
                continue;
            }
            let rest = head.trim_end_matches(is_separator);
            if rest.trim().is_empty() {
                continue;
            }
            current = rest;
            continue 'restart;
        }
        return current;
    }
}

#[derive(Debug, Clone)]
pub(crate) struct SuffixStripper {
    raw: Vec<String>,
    folded: Vec<String>,
}

impl SuffixStripper {
    /// `fold` must be the same folding the normalizer applies after
    /// suffix removal.
    pub(crate) fn new<F>(suffixes: &[String], fold: F) -> Self
    where
        F: Fn(&str) -> String,
    {
        let raw = sorted_longest_first(suffixes.to_vec());
        let folded = sorted_longest_first(raw.iter().map(|s| fold(s)).collect());
        Self { raw, folded }
    }

    pub(crate) fn strip_raw<'a>(&self, text: &'a str) -> &'a str {
        strip_with(text, &self.raw, true)
    }

    pub(crate) fn strip_folded<'a>(&self, text: &'a str) -> &'a str {
        strip_with(text, &self.folded, false)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}
