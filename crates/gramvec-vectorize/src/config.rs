use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

use gramvec_core::{GramWidths, Granularity, TextTokenizer};

use crate::hashed::HashedVectorizer;
use crate::vectorizer::{Strategy, Vectorizer};
use crate::vocab::{Vocabulary, VocabularyIndexer};

pub const PROJECT_CONFIG_FILE: &str = "gramvec.json";
pub const DEFAULT_NUM_BUCKETS: usize = 1024;

/// One layer of pipeline options. Unset fields defer to lower layers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VectorizerOptionsPatch {
    pub strategy: Option<Strategy>,
    pub widths: Option<Vec<usize>>,
    pub granularity: Option<Granularity>,
    pub lowercase: Option<bool>,
    pub num_buckets: Option<usize>,
    pub signed: Option<bool>,
}

impl VectorizerOptionsPatch {
    pub fn from_json_str(s: &str) -> anyhow::Result<Self> {
        serde_json::from_str(s).context("parse vectorizer options JSON")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedVectorizerOptions {
    pub strategy: Strategy,
    pub widths: GramWidths,
    /// Set when some layer named `widths` instead of leaving the default.
    pub widths_configured: bool,
    pub granularity: Granularity,
    pub lowercase: bool,
    pub num_buckets: usize,
    pub signed: bool,
}

impl Default for ResolvedVectorizerOptions {
    fn default() -> Self {
        Self {
            strategy: Strategy::Vocabulary,
            widths: GramWidths::unigrams(),
            widths_configured: false,
            granularity: Granularity::Word,
            lowercase: false,
            num_buckets: DEFAULT_NUM_BUCKETS,
            signed: false,
        }
    }
}

impl ResolvedVectorizerOptions {
    pub fn tokenizer(&self) -> TextTokenizer {
        TextTokenizer {
            granularity: self.granularity,
            lowercase: self.lowercase,
        }
    }

    /// Builds the configured strategy. `vocabulary` seeds the indexer and is
    /// ignored for hashing.
    pub fn into_vectorizer(
        self,
        vocabulary: Option<Vocabulary>,
    ) -> anyhow::Result<Box<dyn Vectorizer + Send + Sync>> {
        let v: Box<dyn Vectorizer + Send + Sync> = match self.strategy {
            Strategy::Vocabulary => Box::new(VocabularyIndexer::from_vocabulary(
                self.widths,
                vocabulary.unwrap_or_default(),
            )),
            Strategy::Hashed => Box::new(
                HashedVectorizer::new(self.num_buckets, self.widths)
                    .context("configure hashed vectorizer")?
                    .with_signed(self.signed),
            ),
        };
        Ok(v)
    }
}

/// Folds option layers onto the defaults, highest precedence first.
pub fn roll_up_vectorizer_options(
    patches_high_to_low: &[Option<&VectorizerOptionsPatch>],
) -> anyhow::Result<ResolvedVectorizerOptions> {
    let mut out = ResolvedVectorizerOptions::default();
    for patch in patches_high_to_low.iter().rev() {
        let Some(patch) = patch else { continue };
        if let Some(strategy) = patch.strategy {
            out.strategy = strategy;
        }
        if let Some(widths) = &patch.widths {
            out.widths = GramWidths::new(widths.iter().copied())
                .with_context(|| format!("invalid widths {widths:?}"))?;
            out.widths_configured = true;
        }
        if let Some(granularity) = patch.granularity {
            out.granularity = granularity;
        }
        if let Some(lowercase) = patch.lowercase {
            out.lowercase = lowercase;
        }
        if let Some(num_buckets) = patch.num_buckets {
            if num_buckets == 0 {
                return Err(gramvec_core::ConfigError::ZeroBuckets).context("invalid num_buckets");
            }
            out.num_buckets = num_buckets;
        }
        if let Some(signed) = patch.signed {
            out.signed = signed;
        }
    }
    tracing::debug!(
        strategy = out.strategy.as_str(),
        widths = ?out.widths.to_vec(),
        granularity = out.granularity.as_str(),
        num_buckets = out.num_buckets,
        "resolved vectorizer options"
    );
    Ok(out)
}

/// Resolves options from the command line, an explicit config file and the
/// project file in `dir`, in that order of precedence.
///
/// A missing project file is skipped; a missing explicit file is an error.
pub fn roll_up_vectorizer_options_from_paths(
    overrides: &VectorizerOptionsPatch,
    explicit: Option<&Path>,
    dir: &Path,
) -> anyhow::Result<ResolvedVectorizerOptions> {
    let explicit_patch = match explicit {
        Some(path) => Some(read_patch(path)?),
        None => None,
    };
    let project_path = dir.join(PROJECT_CONFIG_FILE);
    let project_patch = if project_path.exists() {
        Some(read_patch(&project_path)?)
    } else {
        None
    };
    roll_up_vectorizer_options(&[
        Some(overrides),
        explicit_patch.as_ref(),
        project_patch.as_ref(),
    ])
}

fn read_patch(path: &Path) -> anyhow::Result<VectorizerOptionsPatch> {
    let s = std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    VectorizerOptionsPatch::from_json_str(&s).with_context(|| format!("in {}", path.display()))
}
