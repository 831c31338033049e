//! Vectorization strategies for gramvec.
//!
//! Two mutually exclusive ways of turning a document into a [`FeatureVector`]:
//!
//! - [`VocabularyIndexer`]: exact, two-pass (`fit` then `transform`), with a
//!   vocabulary that grows with the corpus.
//! - [`HashedVectorizer`]: single-pass, fixed width, colliding grams share a
//!   bucket.
//!
//! Both implement [`Vectorizer`], so a pipeline can pick one at runtime from
//! [`config::ResolvedVectorizerOptions`].
//!
//! [`FeatureVector`]: gramvec_core::FeatureVector

pub mod config;
pub mod hashed;
pub mod vectorizer;
pub mod vocab;

pub use hashed::{HashingStats, HashedVectorizer};
pub use vectorizer::{Strategy, Vectorizer, VectorizerProfile};
pub use vocab::{Coverage, Vocabulary, VocabularyIndexer};
