use clap::{ArgMatches, Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "gramvec",
    version,
    about = "Turn text documents into n-gram count vectors",
    long_about = "Turn text documents into n-gram count vectors.\n\nStrategies:\n  - vocabulary: `fit` builds a gram -> index file, `vectorize` counts into it (grams never fitted are dropped).\n  - hashed: `vectorize --strategy hashed` maps grams into a fixed number of buckets in one pass (collisions add up).\n\nOptions are read from flags, then `--config`, then `./gramvec.json`."
)]
pub(crate) struct Cli {
    /// Emit machine-readable JSON instead of human output.
    #[arg(long, global = true)]
    pub(crate) json: bool,

    /// Log level for gramvec crates when RUST_LOG is unset.
    #[arg(long, global = true, default_value = "warn", env = "GRAMVEC_LOG_LEVEL")]
    pub(crate) log_level: String,

    /// Options file (JSON) layered above `./gramvec.json`.
    #[arg(long, global = true)]
    pub(crate) config: Option<String>,

    #[command(subcommand)]
    pub(crate) cmd: Command,
}

/// Where documents come from.
#[derive(Args, Debug, Clone, Default)]
pub(crate) struct InputArgs {
    /// Files to read; each file is one document (see `--lines`).
    #[arg(value_name = "PATH")]
    pub(crate) paths: Vec<String>,

    /// Inline documents (repeatable).
    #[arg(long = "text")]
    pub(crate) texts: Vec<String>,

    /// Treat every non-empty line of each file as its own document.
    #[arg(long)]
    pub(crate) lines: bool,

    /// Command-line order of `paths` and `texts`, filled after parsing.
    #[arg(skip)]
    pub(crate) order: Vec<InputItem>,
}

/// One entry of [`InputArgs`], by position in its own list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputItem {
    Path(usize),
    Text(usize),
}

impl InputArgs {
    /// Records how paths and `--text` values were interleaved in `m`.
    pub(crate) fn record_order(&mut self, m: &ArgMatches) {
        let mut order: Vec<(usize, InputItem)> = Vec::new();
        if let Some(ix) = m.indices_of("paths") {
            order.extend(ix.enumerate().map(|(i, at)| (at, InputItem::Path(i))));
        }
        if let Some(ix) = m.indices_of("texts") {
            order.extend(ix.enumerate().map(|(i, at)| (at, InputItem::Text(i))));
        }
        order.sort_by_key(|(at, _)| *at);
        self.order = order.into_iter().map(|(_, item)| item).collect();
    }

    /// Inputs in command-line order; paths before texts when no order was
    /// recorded.
    pub(crate) fn items(&self) -> Vec<InputItem> {
        if self.order.len() == self.paths.len() + self.texts.len() {
            return self.order.clone();
        }
        (0..self.paths.len())
            .map(InputItem::Path)
            .chain((0..self.texts.len()).map(InputItem::Text))
            .collect()
    }
}

/// Extraction options; each overrides the config files when given.
#[derive(Args, Debug, Clone, Default)]
pub(crate) struct PipelineArgs {
    /// Comma-separated gram widths (e.g. `1,2`).
    #[arg(long)]
    pub(crate) widths: Option<String>,

    /// Token granularity: `word` or `char`.
    #[arg(long)]
    pub(crate) granularity: Option<String>,

    /// Lowercase text before tokenizing.
    #[arg(long, overrides_with = "no_lowercase")]
    pub(crate) lowercase: bool,

    /// Keep case even when a config file turns lowercasing on.
    #[arg(long, overrides_with = "lowercase")]
    pub(crate) no_lowercase: bool,
}

/// `--x` / `--no-x` pair as an options layer value.
pub(crate) fn switch(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Print the gram counts of each document.
    Extract {
        #[command(flatten)]
        pipeline: PipelineArgs,
        #[command(flatten)]
        input: InputArgs,
        /// Show at most this many grams per document.
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Grow a vocabulary file from documents, in the order given.
    #[command(
        after_help = "Examples:\n  gramvec fit --vocab vocab.json --widths 1,2 corpus/*.txt\n  gramvec fit --vocab vocab.json --text \"more text\"\n\nAn existing vocabulary is extended; indices already assigned never change."
    )]
    Fit {
        /// Vocabulary file to create or extend.
        #[arg(long, default_value = "vocab.json")]
        vocab: String,
        #[command(flatten)]
        pipeline: PipelineArgs,
        #[command(flatten)]
        input: InputArgs,
    },
    /// Emit one feature vector per document.
    Vectorize {
        /// `vocabulary` (needs `--vocab`) or `hashed`.
        #[arg(long)]
        strategy: Option<String>,
        /// Vocabulary file produced by `fit`.
        #[arg(long)]
        vocab: Option<String>,
        /// Bucket count for the hashed strategy.
        #[arg(long)]
        buckets: Option<usize>,
        /// Use signed hashing (hashed strategy only).
        #[arg(long, overrides_with = "no_signed")]
        signed: bool,
        /// Turn signed hashing off even when a config file enables it.
        #[arg(long, overrides_with = "signed")]
        no_signed: bool,
        /// Print every position instead of non-zero `index:value` pairs.
        #[arg(long)]
        dense: bool,
        #[command(flatten)]
        pipeline: PipelineArgs,
        #[command(flatten)]
        input: InputArgs,
    },
    /// Show the contents of a vocabulary file.
    Inspect {
        /// Vocabulary file to read.
        #[arg(long, default_value = "vocab.json")]
        vocab: String,
        /// Show at most this many entries.
        #[arg(long)]
        limit: Option<usize>,
    },
}

impl Command {
    pub(crate) fn input_mut(&mut self) -> Option<&mut InputArgs> {
        match self {
            Command::Extract { input, .. }
            | Command::Fit { input, .. }
            | Command::Vectorize { input, .. } => Some(input),
            Command::Inspect { .. } => None,
        }
    }
}
