use serde::{Deserialize, Serialize};

use gramvec_core::{FeatureVector, Token};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    #[default]
    Vocabulary,
    Hashed,
}

impl Strategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Vocabulary => "vocabulary",
            Self::Hashed => "hashed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "vocabulary" | "vocab" => Some(Self::Vocabulary),
            "hashed" | "hash" => Some(Self::Hashed),
            _ => None,
        }
    }
}

/// Describes how a vectorizer produces its rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VectorizerProfile {
    pub strategy: Strategy,
    pub widths: Vec<usize>,
    /// Output width: the bucket count for hashing, the vocabulary size at the
    /// time the profile was taken for the indexer.
    pub dim: usize,
    #[serde(default)]
    pub signed: bool,
}

pub trait Vectorizer {
    fn profile(&self) -> VectorizerProfile;

    fn transform(&self, tokens: &[Token]) -> FeatureVector;

    fn transform_batch(&self, docs: &[Vec<Token>]) -> Vec<FeatureVector> {
        docs.iter().map(|d| self.transform(d)).collect()
    }
}
