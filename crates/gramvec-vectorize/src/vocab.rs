use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use gramvec_core::export::{ExportToolInfo, VocabularyExportV1};
use gramvec_core::{extract, FeatureVector, Gram, GramWidths, Token};

use crate::vectorizer::{Strategy, Vectorizer, VectorizerProfile};

/// Append-only gram-to-index table.
///
/// Indices are dense from 0 in first-seen order and never change once
/// assigned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabulary {
    index: HashMap<Gram, usize>,
    grams: Vec<Gram>,
}

impl Vocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a vocabulary from grams listed in index order.
    ///
    /// Returns `None` if a gram repeats.
    pub fn from_grams(grams: Vec<Gram>) -> Option<Self> {
        let mut vocab = Self::new();
        for g in grams {
            let (_, inserted) = vocab.insert(g);
            if !inserted {
                return None;
            }
        }
        Some(vocab)
    }

    pub fn len(&self) -> usize {
        self.grams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grams.is_empty()
    }

    pub fn get(&self, gram: &Gram) -> Option<usize> {
        self.index.get(gram).copied()
    }

    pub fn contains(&self, gram: &Gram) -> bool {
        self.index.contains_key(gram)
    }

    pub fn gram(&self, index: usize) -> Option<&Gram> {
        self.grams.get(index)
    }

    /// Returns the gram's index, assigning the next free one if it is new.
    /// The flag is `true` when the gram was inserted by this call.
    pub fn insert(&mut self, gram: Gram) -> (usize, bool) {
        if let Some(&i) = self.index.get(&gram) {
            return (i, false);
        }
        let i = self.grams.len();
        self.grams.push(gram.clone());
        self.index.insert(gram, i);
        (i, true)
    }

    /// `(index, gram)` in ascending index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Gram)> {
        self.grams.iter().enumerate()
    }
}

/// Gram occurrences of one document split by vocabulary membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Coverage {
    pub in_vocabulary: u64,
    pub out_of_vocabulary: u64,
}

impl Coverage {
    pub fn total(&self) -> u64 {
        self.in_vocabulary + self.out_of_vocabulary
    }
}

/// Two-pass vectorizer: `fit` grows the vocabulary, `transform` counts into it.
///
/// The vocabulary sits behind a lock so one indexer can be shared between
/// threads; each `fit` holds the write lock for the whole document.
#[derive(Debug, Default)]
pub struct VocabularyIndexer {
    widths: GramWidths,
    vocabulary: RwLock<Vocabulary>,
}

impl VocabularyIndexer {
    pub fn new(widths: GramWidths) -> Self {
        Self {
            widths,
            vocabulary: RwLock::new(Vocabulary::new()),
        }
    }

    pub fn from_vocabulary(widths: GramWidths, vocabulary: Vocabulary) -> Self {
        Self {
            widths,
            vocabulary: RwLock::new(vocabulary),
        }
    }

    /// Restores a fitted indexer from its persisted mapping.
    pub fn from_export(bundle: VocabularyExportV1) -> Result<Self, gramvec_core::Error> {
        let widths = GramWidths::new(bundle.widths.iter().copied())?;
        let grams = bundle.into_grams()?;
        let len = grams.len();
        // into_grams already rejects duplicates.
        let vocabulary = Vocabulary::from_grams(grams).unwrap_or_default();
        debug_assert_eq!(vocabulary.len(), len);
        tracing::debug!(entries = len, widths = ?widths.to_vec(), "restored vocabulary");
        Ok(Self::from_vocabulary(widths, vocabulary))
    }

    pub fn export(&self, tool: ExportToolInfo) -> VocabularyExportV1 {
        let vocab = self.read();
        VocabularyExportV1::from_grams(tool, self.widths.to_vec(), vocab.grams.iter())
    }

    pub fn widths(&self) -> &GramWidths {
        &self.widths
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn index_of(&self, gram: &Gram) -> Option<usize> {
        self.read().get(gram)
    }

    /// Snapshot of the current vocabulary.
    pub fn vocabulary(&self) -> Vocabulary {
        self.read().clone()
    }

    /// Indexes every gram of `tokens` not seen before and returns how many
    /// were new. Existing indices are untouched.
    pub fn fit<S: AsRef<str>>(&self, tokens: &[S]) -> usize {
        let counts = extract(tokens, &self.widths);
        let mut vocab = self.write();
        let mut added = 0;
        for (gram, _) in counts.in_first_seen_order() {
            if vocab.contains(gram) {
                continue;
            }
            vocab.insert(gram.clone());
            added += 1;
        }
        tracing::debug!(added, total = vocab.len(), "fit document");
        added
    }

    /// Fits documents in the order given.
    pub fn fit_many<D, S>(&self, docs: &[D]) -> usize
    where
        D: AsRef<[S]>,
        S: AsRef<str>,
    {
        docs.iter().map(|d| self.fit(d.as_ref())).sum()
    }

    /// Counts the grams of `tokens` into a vector as long as the current
    /// vocabulary. Grams the vocabulary has never seen are dropped.
    pub fn transform<S: AsRef<str>>(&self, tokens: &[S]) -> FeatureVector {
        let counts = extract(tokens, &self.widths);
        let vocab = self.read();
        let mut out = FeatureVector::zeros(vocab.len());
        let mut dropped = 0u64;
        for (gram, c) in counts.iter() {
            match vocab.get(gram) {
                Some(i) => out.add(i, count_to_i64(c)),
                None => dropped += c,
            }
        }
        tracing::trace!(dim = out.len(), dropped, "transform document");
        out
    }

    pub fn fit_transform<S: AsRef<str>>(&self, tokens: &[S]) -> FeatureVector {
        self.fit(tokens);
        self.transform(tokens)
    }

    pub fn coverage<S: AsRef<str>>(&self, tokens: &[S]) -> Coverage {
        let counts = extract(tokens, &self.widths);
        let vocab = self.read();
        let mut cov = Coverage::default();
        for (gram, c) in counts.iter() {
            if vocab.contains(gram) {
                cov.in_vocabulary += c;
            } else {
                cov.out_of_vocabulary += c;
            }
        }
        cov
    }

    // Inserts are push-then-map with no fallible step between, so a poisoned
    // lock still guards a consistent table.
    fn read(&self) -> RwLockReadGuard<'_, Vocabulary> {
        self.vocabulary.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vocabulary> {
        self.vocabulary
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Vectorizer for VocabularyIndexer {
    fn profile(&self) -> VectorizerProfile {
        VectorizerProfile {
            strategy: Strategy::Vocabulary,
            widths: self.widths.to_vec(),
            dim: self.len(),
            signed: false,
        }
    }

    fn transform(&self, tokens: &[Token]) -> FeatureVector {
        VocabularyIndexer::transform(self, tokens)
    }
}

pub(crate) fn count_to_i64(c: u64) -> i64 {
    i64::try_from(c).unwrap_or(i64::MAX)
}
