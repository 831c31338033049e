//! Core data model for gramvec.
//!
//! This crate defines tokens, grams, per-document gram counts, feature vectors,
//! the error taxonomy, tokenizers and the n-gram extractor shared by every
//! vectorization strategy.

pub mod error;
pub mod export;
pub mod gram;
pub mod tokenize;
pub mod types;

pub use error::{ConfigError, Error, VocabularyError};
pub use gram::{extract, GramExtractor};
pub use tokenize::{Granularity, TextTokenizer, Tokenizer};
pub use types::{DocumentGramCounts, FeatureVector, Gram, GramWidths, Token};
