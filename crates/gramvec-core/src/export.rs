use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::VocabularyError;
use crate::types::Gram;

pub const VOCABULARY_FORMAT_V1: &str = "gramvec.vocab.v1";

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportToolInfo {
    /// Name and version of the program that wrote the file.
    pub name: String,
    pub version: String,
}

/// A persisted gram-to-index mapping (version 1).
///
/// Entries may appear in any order on disk; restoring sorts them by index and
/// requires the indices to be exactly `0..entries.len()`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VocabularyExportV1 {
    pub format: String, // "gramvec.vocab.v1"
    pub tool: ExportToolInfo,
    /// Gram widths the vocabulary was fitted with.
    pub widths: Vec<usize>,
    pub entries: Vec<VocabularyEntryV1>,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VocabularyEntryV1 {
    pub index: usize,
    pub tokens: Vec<String>,
}

impl VocabularyExportV1 {
    /// Builds an export from grams listed in index order.
    pub fn from_grams<'a, I>(tool: ExportToolInfo, widths: Vec<usize>, grams: I) -> Self
    where
        I: IntoIterator<Item = &'a Gram>,
    {
        let entries = grams
            .into_iter()
            .enumerate()
            .map(|(index, g)| VocabularyEntryV1 {
                index,
                tokens: g.tokens().to_vec(),
            })
            .collect();
        Self {
            format: VOCABULARY_FORMAT_V1.to_string(),
            tool,
            widths,
            entries,
        }
    }

    /// Validates the mapping and returns the grams in index order.
    pub fn into_grams(self) -> Result<Vec<Gram>, VocabularyError> {
        if self.format != VOCABULARY_FORMAT_V1 {
            return Err(VocabularyError::UnsupportedFormat(self.format));
        }

        let mut entries = self.entries;
        entries.sort_by_key(|e| e.index);

        let mut seen: HashMap<Gram, usize> = HashMap::with_capacity(entries.len());
        let mut grams = Vec::with_capacity(entries.len());
        for (expected, entry) in entries.into_iter().enumerate() {
            if entry.index < expected {
                return Err(VocabularyError::DuplicateIndex(entry.index));
            }
            if entry.index > expected {
                return Err(VocabularyError::IndexGap {
                    expected,
                    found: entry.index,
                });
            }
            if entry.tokens.is_empty() {
                return Err(VocabularyError::EmptyGram(entry.index));
            }
            let width = entry.tokens.len();
            if !self.widths.is_empty() && !self.widths.contains(&width) {
                return Err(VocabularyError::WidthMismatch {
                    index: entry.index,
                    width,
                    widths: self.widths,
                });
            }
            let gram = Gram::new(entry.tokens);
            if let Some(first) = seen.insert(gram.clone(), entry.index) {
                return Err(VocabularyError::DuplicateGram {
                    gram: gram.into_tokens(),
                    first,
                    second: entry.index,
                });
            }
            grams.push(gram);
        }
        Ok(grams)
    }
}
