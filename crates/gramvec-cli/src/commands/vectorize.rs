use anyhow::Context;
use std::path::Path;

use gramvec_vectorize::{Strategy, VocabularyIndexer};

use crate::cli::{InputArgs, PipelineArgs};
use crate::types::{RowJson, VectorizeJson};
use crate::util::{
    ensure_widths_match, format_sparse, load_vocab, pipeline_patch, read_documents,
    resolve_options,
};

pub(crate) struct VectorizeArgs {
    pub(crate) strategy: Option<String>,
    pub(crate) vocab: Option<String>,
    pub(crate) buckets: Option<usize>,
    pub(crate) signed: Option<bool>,
    pub(crate) dense: bool,
}

pub(crate) fn cmd_vectorize(
    args: VectorizeArgs,
    pipeline: &PipelineArgs,
    input: &InputArgs,
    config: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let mut patch = pipeline_patch(pipeline)?;
    patch.strategy = match args.strategy.as_deref() {
        Some(s) => Some(Strategy::parse(s).ok_or_else(|| {
            anyhow::anyhow!("unknown strategy {s:?} (expected vocabulary or hashed)")
        })?),
        None => None,
    };
    patch.num_buckets = args.buckets;
    patch.signed = args.signed;
    let mut options = resolve_options(&patch, config)?;

    let vocabulary = match options.strategy {
        Strategy::Vocabulary => {
            let Some(vocab_path) = args.vocab.as_deref() else {
                anyhow::bail!("the vocabulary strategy needs --vocab (create one with `gramvec fit`)");
            };
            let bundle = load_vocab(Path::new(vocab_path))?
                .ok_or_else(|| anyhow::anyhow!("vocabulary file {vocab_path} does not exist"))?;
            ensure_widths_match(&options, &bundle.widths)?;
            let indexer = VocabularyIndexer::from_export(bundle)
                .with_context(|| format!("load vocabulary {vocab_path}"))?;
            options.widths = indexer.widths().clone();
            Some(indexer.vocabulary())
        }
        Strategy::Hashed => {
            if args.vocab.is_some() {
                anyhow::bail!("--vocab is only used with the vocabulary strategy");
            }
            None
        }
    };

    let tokenizer = options.tokenizer();
    let vectorizer = options.into_vectorizer(vocabulary)?;
    let docs = read_documents(input, &tokenizer)?;
    let (sources, token_lists): (Vec<String>, Vec<Vec<String>>) =
        docs.into_iter().map(|d| (d.source, d.tokens)).unzip();
    let rows = vectorizer.transform_batch(&token_lists);
    let profile = vectorizer.profile();
    tracing::debug!(
        strategy = profile.strategy.as_str(),
        dim = profile.dim,
        rows = rows.len(),
        "vectorized"
    );

    if json {
        let out = VectorizeJson {
            strategy: profile.strategy.as_str(),
            widths: profile.widths,
            dim: profile.dim,
            signed: profile.signed,
            rows: sources
                .into_iter()
                .zip(rows)
                .map(|(source, row)| RowJson {
                    source,
                    nnz: row.nnz(),
                    sparse: (!args.dense).then(|| row.nonzero().collect()),
                    dense: args.dense.then(|| row.into_vec()),
                })
                .collect(),
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!(
        "# strategy={} dim={} widths={:?}{}",
        profile.strategy.as_str(),
        profile.dim,
        profile.widths,
        if profile.signed { " signed" } else { "" }
    );
    for (source, row) in sources.into_iter().zip(rows) {
        if args.dense {
            let values: Vec<String> = row.as_slice().iter().map(i64::to_string).collect();
            println!("{source}\t{}", values.join(" "));
        } else {
            println!("{source}\t{}", format_sparse(row.as_slice()));
        }
    }
    Ok(())
}
