use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Vocabulary(#[from] VocabularyError),
}

/// Rejected construction parameters. Never corrected silently.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("gram width must be positive, got 0")]
    ZeroWidth,

    #[error("at least one gram width is required")]
    EmptyWidths,

    #[error("num_buckets must be positive, got 0")]
    ZeroBuckets,
}

/// Problems found while restoring a persisted vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VocabularyError {
    #[error("unsupported vocabulary format: {0:?}")]
    UnsupportedFormat(String),

    #[error("vocabulary index gap: expected {expected}, found {found}")]
    IndexGap { expected: usize, found: usize },

    #[error("duplicate vocabulary index: {0}")]
    DuplicateIndex(usize),

    #[error("gram {gram:?} appears at both index {first} and {second}")]
    DuplicateGram {
        gram: Vec<String>,
        first: usize,
        second: usize,
    },

    #[error("empty gram at index {0}")]
    EmptyGram(usize),

    #[error("gram at index {index} has width {width}, not one of {widths:?}")]
    WidthMismatch {
        index: usize,
        width: usize,
        widths: Vec<usize>,
    },
}
