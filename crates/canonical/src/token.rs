use std::collections::{BTreeSet, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Tokens shorter than this many characters are noise ("&", "a", "x").
pub const MIN_TOKEN_CHARS: usize = 2;

/// A set of word tokens taken from normalized text.
///
/// Backed by an ordered set so iteration, joining and serialization are
/// deterministic; callers must not rely on the order for meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenSet(BTreeSet<String>);

impl TokenSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.0.contains(token)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Tokens present in both sets.
    pub fn intersection(&self, other: &TokenSet) -> TokenSet {
        self.0.intersection(&other.0).cloned().collect()
    }

    pub fn intersection_len(&self, other: &TokenSet) -> usize {
        self.0.intersection(&other.0).count()
    }

    pub fn union_len(&self, other: &TokenSet) -> usize {
        self.len() + other.len() - self.intersection_len(other)
    }

    /// Space-joined tokens in set order.
    pub fn joined(&self) -> String {
        let mut out = String::new();
        for token in &self.0 {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(token);
        }
        out
    }

    /// Drops every token whose lowercase form is a common word.
    pub fn without_common(&self, common: &CommonWords) -> TokenSet {
        if common.is_empty() {
            return self.clone();
        }
        self.iter()
            .filter(|token| !common.contains(token))
            .map(str::to_string)
            .collect()
    }
}

impl FromIterator<String> for TokenSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> FromIterator<&'a str> for TokenSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        Self(iter.into_iter().map(str::to_string).collect())
    }
}

impl fmt::Display for TokenSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.iter().collect::<Vec<_>>().join(", "))
    }
}

/// Splits normalized text on whitespace into a [`TokenSet`], dropping
/// tokens shorter than [`MIN_TOKEN_CHARS`].
///
/// ```rust
/// use canonical::tokenize;
///
/// let tokens = tokenize("acme b tekstil acme");
/// assert_eq!(tokens.len(), 2);
/// assert!(tokens.contains("acme"));
/// assert!(!tokens.contains("b"));
/// ```
pub fn tokenize(normalized: &str) -> TokenSet {
    normalized
        .split_whitespace()
        .filter(|token| token.chars().count() >= MIN_TOKEN_CHARS)
        .collect()
}

/// Lookup set of generic words excluded from discriminative comparison.
///
/// Every configured word is stored lowercased and, when a folding function
/// is supplied, in its folded form too ("kumaş" also matches "kumas").
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommonWords(HashSet<String>);

impl CommonWords {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::with_folding(words, |w| w.to_string())
    }

    pub fn with_folding<I, S, F>(words: I, fold: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: Fn(&str) -> String,
    {
        let mut set = HashSet::new();
        for word in words {
            let lower = word.as_ref().trim().to_lowercase();
            if lower.is_empty() {
                continue;
            }
            let folded = fold(&lower);
            if !folded.is_empty() {
                set.insert(folded);
            }
            set.insert(lower);
        }
        Self(set)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.0.contains(&token.to_lowercase())
    }
}

/// Returns the tokens whose lowercase form is not in `common`.
///
/// An empty `common` set is a no-op.
pub fn filter_common(tokens: &TokenSet, common: &CommonWords) -> TokenSet {
    tokens.without_common(common)
}
