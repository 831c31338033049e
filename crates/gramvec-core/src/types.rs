use std::collections::{BTreeSet, HashMap};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// An atomic unit of text: a word or a single character, depending on the
/// tokenizer that produced it.
pub type Token = String;

/// An ordered run of consecutive tokens.
///
/// The width is the number of tokens, so grams of different widths never
/// compare equal even when their rendered text matches.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Gram(Vec<Token>);

impl Gram {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self(tokens)
    }

    pub fn from_strs<S: AsRef<str>>(tokens: &[S]) -> Self {
        Self(tokens.iter().map(|t| t.as_ref().to_string()).collect())
    }

    pub fn width(&self) -> usize {
        self.0.len()
    }

    pub fn tokens(&self) -> &[Token] {
        &self.0
    }

    pub fn into_tokens(self) -> Vec<Token> {
        self.0
    }
}

impl fmt::Display for Gram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, t) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{t:?}")?;
        }
        if self.0.len() == 1 {
            f.write_str(",")?;
        }
        f.write_str(")")
    }
}

/// The set of gram widths extracted together into one feature space.
///
/// Always non-empty and free of zero; iteration is in ascending order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GramWidths(BTreeSet<usize>);

impl GramWidths {
    pub fn new<I: IntoIterator<Item = usize>>(widths: I) -> Result<Self, ConfigError> {
        let mut set = BTreeSet::new();
        for n in widths {
            if n == 0 {
                return Err(ConfigError::ZeroWidth);
            }
            set.insert(n);
        }
        if set.is_empty() {
            return Err(ConfigError::EmptyWidths);
        }
        Ok(Self(set))
    }

    /// Unigrams only.
    pub fn unigrams() -> Self {
        Self(BTreeSet::from([1]))
    }

    pub fn contains(&self, n: usize) -> bool {
        self.0.contains(&n)
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<usize> {
        self.0.iter().copied().collect()
    }
}

impl Default for GramWidths {
    fn default() -> Self {
        Self::unigrams()
    }
}

#[derive(Debug, Clone, Copy)]
struct Tally {
    count: u64,
    first_seen: usize,
}

/// Gram counts for exactly one document.
///
/// Besides the counts, the position at which each gram first appeared during
/// extraction is kept so that callers assigning indices can do so in a
/// reproducible order.
#[derive(Debug, Clone, Default)]
pub struct DocumentGramCounts {
    tallies: HashMap<Gram, Tally>,
}

impl DocumentGramCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one occurrence of `gram`.
    pub fn record(&mut self, gram: Gram) {
        let next = self.tallies.len();
        self.tallies
            .entry(gram)
            .and_modify(|t| t.count += 1)
            .or_insert(Tally {
                count: 1,
                first_seen: next,
            });
    }

    pub fn get(&self, gram: &Gram) -> Option<u64> {
        self.tallies.get(gram).map(|t| t.count)
    }

    /// Number of distinct grams.
    pub fn len(&self) -> usize {
        self.tallies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tallies.is_empty()
    }

    /// Sum of counts over every gram.
    pub fn total(&self) -> u64 {
        self.tallies.values().map(|t| t.count).sum()
    }

    /// Sum of counts over grams of width `n`.
    pub fn total_for_width(&self, n: usize) -> u64 {
        self.tallies
            .iter()
            .filter(|(g, _)| g.width() == n)
            .map(|(_, t)| t.count)
            .sum()
    }

    /// Iterates `(gram, count)` in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&Gram, u64)> {
        self.tallies.iter().map(|(g, t)| (g, t.count))
    }

    /// Grams in the order they were first recorded.
    pub fn in_first_seen_order(&self) -> Vec<(&Gram, u64)> {
        let mut out: Vec<(&Gram, Tally)> = self.tallies.iter().map(|(g, t)| (g, *t)).collect();
        out.sort_unstable_by_key(|(_, t)| t.first_seen);
        out.into_iter().map(|(g, t)| (g, t.count)).collect()
    }

    /// Grams sorted by descending count, ties broken by gram order.
    pub fn into_sorted(self) -> Vec<(Gram, u64)> {
        let mut out: Vec<(Gram, u64)> = self
            .tallies
            .into_iter()
            .map(|(g, t)| (g, t.count))
            .collect();
        out.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        out
    }
}

/// Equality compares counts only; first-seen positions are bookkeeping.
impl PartialEq for DocumentGramCounts {
    fn eq(&self, other: &Self) -> bool {
        self.tallies.len() == other.tallies.len()
            && self
                .tallies
                .iter()
                .all(|(g, t)| other.get(g) == Some(t.count))
    }
}

impl Eq for DocumentGramCounts {}

/// A dense row of per-index counts for one document.
///
/// Values are non-negative unless signed hashing produced them.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FeatureVector(Vec<i64>);

impl FeatureVector {
    pub fn zeros(len: usize) -> Self {
        Self(vec![0; len])
    }

    /// Adds `delta` at `index`. `index` must be below `len()`.
    pub fn add(&mut self, index: usize, delta: i64) {
        self.0[index] += delta;
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<i64> {
        self.0.get(index).copied()
    }

    pub fn as_slice(&self) -> &[i64] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<i64> {
        self.0
    }

    /// Non-zero `(index, value)` pairs in ascending index order.
    pub fn nonzero(&self) -> impl Iterator<Item = (usize, i64)> + '_ {
        self.0
            .iter()
            .enumerate()
            .filter(|(_, v)| **v != 0)
            .map(|(i, v)| (i, *v))
    }

    /// Number of non-zero positions.
    pub fn nnz(&self) -> usize {
        self.0.iter().filter(|v| **v != 0).count()
    }
}

impl From<Vec<i64>> for FeatureVector {
    fn from(values: Vec<i64>) -> Self {
        Self(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widths_reject_zero_and_empty() {
        assert_eq!(GramWidths::new([1, 0, 2]), Err(ConfigError::ZeroWidth));
        assert_eq!(GramWidths::new(Vec::new()), Err(ConfigError::EmptyWidths));
    }

    #[test]
    fn widths_dedup_and_sort() {
        let w = GramWidths::new([3, 1, 3, 2]).unwrap();
        assert_eq!(w.to_vec(), vec![1, 2, 3]);
        assert!(w.contains(2));
        assert!(!w.contains(4));
    }

    #[test]
    fn grams_of_different_width_are_distinct() {
        let uni = Gram::from_strs(&["text about"]);
        let bi = Gram::from_strs(&["text", "about"]);
        assert_ne!(uni, bi);
        assert_eq!(uni.width(), 1);
        assert_eq!(bi.width(), 2);
    }

    #[test]
    fn gram_display_looks_like_a_tuple() {
        assert_eq!(Gram::from_strs(&["a"]).to_string(), "(\"a\",)");
        assert_eq!(Gram::from_strs(&["a", "b"]).to_string(), "(\"a\", \"b\")");
    }

    #[test]
    fn counts_keep_first_seen_order() {
        let mut c = DocumentGramCounts::new();
        c.record(Gram::from_strs(&["b"]));
        c.record(Gram::from_strs(&["a"]));
        c.record(Gram::from_strs(&["b"]));
        let order: Vec<String> = c
            .in_first_seen_order()
            .into_iter()
            .map(|(g, _)| g.tokens()[0].clone())
            .collect();
        assert_eq!(order, vec!["b", "a"]);
        assert_eq!(c.get(&Gram::from_strs(&["b"])), Some(2));
        assert_eq!(c.total(), 3);
    }

    #[test]
    fn counts_equality_ignores_first_seen() {
        let mut x = DocumentGramCounts::new();
        x.record(Gram::from_strs(&["a"]));
        x.record(Gram::from_strs(&["b"]));
        let mut y = DocumentGramCounts::new();
        y.record(Gram::from_strs(&["b"]));
        y.record(Gram::from_strs(&["a"]));
        assert_eq!(x, y);
    }

    #[test]
    fn feature_vector_sparse_view() {
        let mut v = FeatureVector::zeros(5);
        v.add(1, 2);
        v.add(4, -1);
        assert_eq!(v.nonzero().collect::<Vec<_>>(), vec![(1, 2), (4, -1)]);
        assert_eq!(v.nnz(), 2);
        assert_eq!(v.len(), 5);
    }
}
