//! Dotted path patterns.
//!
//! A pattern is a dotted path in which `*` stands for any run of
//! characters, dots included. Matching is against the whole candidate:
//!
//! - `*` matches every path.
//! - `*.green` matches `x.green` but neither `x.green.y` nor `green`.
//! - `a.*` matches everything below `a`.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;
use core::hash::{Hash, Hasher};

use jv_utils::hash::hash_one;
use regex::Regex;

use crate::error::ConfigError;

/// The wildcard character.
pub const WILDCARD: char = '*';

// -----------------------------------------------------------------------------
// MatchKind

/// The result of matching a path against a [`PatternSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MatchKind {
    None,
    /// Matched by a pattern containing `*`.
    Wildcard,
    /// Matched by a pattern without `*`.
    Exact,
}

impl MatchKind {
    #[inline]
    pub const fn is_match(self) -> bool {
        !matches!(self, Self::None)
    }
}

// -----------------------------------------------------------------------------
// Pattern

/// A single compiled pattern.
pub struct Pattern {
    raw: Box<str>,
    regex: Regex,
}

impl Pattern {
    /// Compiles a pattern.
    pub fn new(raw: &str) -> Result<Self, ConfigError> {
        let body = raw
            .split(WILDCARD)
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(".*");
        let regex = Regex::new(&format!("^(?s:{body})$")).map_err(|source| {
            ConfigError::InvalidPattern {
                pattern: String::from(raw),
                source,
            }
        })?;
        Ok(Self {
            raw: raw.into(),
            regex,
        })
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    #[inline]
    pub fn is_wildcard(&self) -> bool {
        self.raw.contains(WILDCARD)
    }

    /// Returns `true` if the pattern matches `candidate`.
    ///
    /// With `allow_prefix`, a pattern naming a descendant of `candidate`
    /// (`a.b.c` for `a.b`) also matches, so that the ancestors of an
    /// included path are kept.
    pub fn matches(&self, candidate: &str, allow_prefix: bool) -> bool {
        self.regex.is_match(candidate)
            || (allow_prefix
                && self
                    .raw
                    .strip_prefix(candidate)
                    .is_some_and(|rest| rest.starts_with('.')))
    }

    /// The kind of match this pattern yields.
    #[inline]
    pub fn kind(&self) -> MatchKind {
        if self.is_wildcard() {
            MatchKind::Wildcard
        } else {
            MatchKind::Exact
        }
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pattern").field(&self.raw).finish()
    }
}

// -----------------------------------------------------------------------------
// PatternSet

/// An immutable set of compiled patterns.
///
/// Cloning is cheap. Two sets are equal when they hold the same patterns;
/// the hash is computed once, so a set can key the pattern cache.
///
/// # Examples
///
/// ```
/// use jv_view::pattern::{MatchKind, PatternSet};
///
/// let set = PatternSet::compile(["*", "a"]).unwrap();
///
/// assert_eq!(set.evaluate("a", false), MatchKind::Exact);
/// assert_eq!(set.evaluate("b.c", false), MatchKind::Wildcard);
/// ```
#[derive(Clone)]
pub struct PatternSet {
    patterns: Arc<[Arc<Pattern>]>,
    fingerprint: u64,
}

impl PatternSet {
    /// A set without patterns, which matches nothing.
    pub fn empty() -> Self {
        Self::from_patterns(Vec::new())
    }

    /// Compiles every pattern of `raw`.
    pub fn compile<I, S>(raw: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = raw
            .into_iter()
            .map(|p| Pattern::new(p.as_ref()).map(Arc::new))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_patterns(patterns))
    }

    fn from_patterns(mut patterns: Vec<Arc<Pattern>>) -> Self {
        patterns.sort_by(|a, b| a.raw.cmp(&b.raw));
        patterns.dedup_by(|a, b| a.raw == b.raw);
        let fingerprint = hash_one(&patterns.iter().map(|p| &*p.raw).collect::<Vec<_>>());
        Self {
            patterns: patterns.into(),
            fingerprint,
        }
    }

    /// The union of several sets. Compiled patterns are shared, not rebuilt.
    pub fn union<'a>(sets: impl IntoIterator<Item = &'a PatternSet>) -> Self {
        let patterns = sets
            .into_iter()
            .flat_map(|set| set.patterns.iter().cloned())
            .collect();
        Self::from_patterns(patterns)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.patterns.iter().map(|p| p.as_str())
    }

    /// Matches `candidate` against every pattern.
    ///
    /// An exact match wins over a wildcard one, whatever the order of
    /// the patterns.
    pub fn evaluate(&self, candidate: &str, allow_prefix: bool) -> MatchKind {
        let mut result = MatchKind::None;
        for pattern in self.patterns.iter() {
            if pattern.matches(candidate, allow_prefix) {
                match pattern.kind() {
                    MatchKind::Exact => return MatchKind::Exact,
                    kind => result = kind,
                }
            }
        }
        result
    }
}

impl Default for PatternSet {
    #[inline]
    fn default() -> Self {
        Self::empty()
    }
}

impl PartialEq for PatternSet {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.patterns, &other.patterns)
            || (self.fingerprint == other.fingerprint && self.iter().eq(other.iter()))
    }
}

impl Eq for PatternSet {}

impl Hash for PatternSet {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.fingerprint);
    }
}

impl fmt::Debug for PatternSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(raw: &[&str]) -> PatternSet {
        PatternSet::compile(raw).unwrap()
    }

    #[test]
    fn exact_names() {
        let patterns = set(&["field1", "field2"]);
        assert_eq!(patterns.evaluate("field1", true), MatchKind::Exact);
        assert_eq!(patterns.evaluate("field2", true), MatchKind::Exact);
        assert_eq!(patterns.evaluate("field3", true), MatchKind::None);
    }

    #[test]
    fn star_matches_everything() {
        let patterns = set(&["*"]);
        for candidate in ["field1", "val1", "a.b.c", ""] {
            assert_eq!(patterns.evaluate(candidate, false), MatchKind::Wildcard);
        }
    }

    #[test]
    fn leading_wildcard_segment() {
        let patterns = set(&["*.green"]);
        assert_eq!(patterns.evaluate("x.green", false), MatchKind::Wildcard);
        assert_eq!(patterns.evaluate("field2.blue", false), MatchKind::None);
        assert_eq!(patterns.evaluate("x.green.y", false), MatchKind::None);
        assert_eq!(patterns.evaluate("green", false), MatchKind::None);
    }

    #[test]
    fn wildcard_on_both_ends() {
        let patterns = set(&["*.green.*"]);
        assert_eq!(patterns.evaluate("field1.green", true), MatchKind::None);
        assert_eq!(patterns.evaluate("field1.green.id", true), MatchKind::Wildcard);
        assert_eq!(patterns.evaluate("field1.blue.id", true), MatchKind::None);
        assert_eq!(patterns.evaluate("field2.green.name", true), MatchKind::Wildcard);
    }

    #[test]
    fn trailing_wildcard() {
        let patterns = set(&["a.*"]);
        assert!(patterns.evaluate("a.b", false).is_match());
        assert!(patterns.evaluate("a.b.c", false).is_match());
        assert!(!patterns.evaluate("ab", false).is_match());
    }

    #[test]
    fn descendants_keep_ancestors() {
        let patterns = set(&["sub.val", "list.item.name"]);
        assert_eq!(patterns.evaluate("sub", true), MatchKind::Exact);
        assert_eq!(patterns.evaluate("list.item", true), MatchKind::Exact);
        assert_eq!(patterns.evaluate("sub", false), MatchKind::None);
        // a shared prefix that is not a whole segment does not count
        assert_eq!(patterns.evaluate("su", true), MatchKind::None);
    }

    #[test]
    fn exact_wins_over_wildcard() {
        let patterns = set(&["*", "a", "b*"]);
        assert_eq!(patterns.evaluate("a", false), MatchKind::Exact);
        assert_eq!(patterns.evaluate("bc", false), MatchKind::Wildcard);
    }

    #[test]
    fn regex_characters_are_literal() {
        let patterns = set(&["a+b", "(x)"]);
        assert_eq!(patterns.evaluate("a+b", false), MatchKind::Exact);
        assert_eq!(patterns.evaluate("aab", false), MatchKind::None);
        assert_eq!(patterns.evaluate("(x)", false), MatchKind::Exact);
        assert_eq!(set(&["a.b"]).evaluate("axb", false), MatchKind::None);
    }

    #[test]
    fn equality_ignores_order_and_duplicates() {
        let a = set(&["x", "y", "x"]);
        let b = set(&["y", "x"]);
        assert_eq!(a, b);
        assert_eq!(hash_one(&a), hash_one(&b));
        assert_eq!(a.len(), 2);
        assert_ne!(a, set(&["x"]));
    }

    #[test]
    fn union_merges() {
        let union = PatternSet::union([&set(&["a", "b"]), &set(&["b", "c"])]);
        assert_eq!(union.iter().collect::<Vec<_>>(), ["a", "b", "c"]);
        assert!(PatternSet::empty().is_empty());
        assert_eq!(PatternSet::empty().evaluate("a", true), MatchKind::None);
    }
}
