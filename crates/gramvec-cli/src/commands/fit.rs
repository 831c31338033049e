use anyhow::Context;
use std::path::Path;

use gramvec_vectorize::VocabularyIndexer;

use crate::cli::{InputArgs, PipelineArgs};
use crate::types::FitJson;
use crate::util::{
    ensure_widths_match, load_vocab, pipeline_patch, read_documents, resolve_options,
    save_vocab_atomic, tool_info,
};

pub(crate) fn cmd_fit(
    vocab_path: &str,
    pipeline: &PipelineArgs,
    input: &InputArgs,
    config: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let patch = pipeline_patch(pipeline)?;
    let options = resolve_options(&patch, config)?;
    let path = Path::new(vocab_path);

    let (indexer, created) = match load_vocab(path)? {
        Some(bundle) => {
            ensure_widths_match(&options, &bundle.widths)?;
            let indexer = VocabularyIndexer::from_export(bundle)
                .with_context(|| format!("load vocabulary {vocab_path}"))?;
            (indexer, false)
        }
        None => (VocabularyIndexer::new(options.widths.clone()), true),
    };

    let tokenizer = options.tokenizer();
    let docs = read_documents(input, &tokenizer)?;
    let mut added = 0;
    for doc in &docs {
        let n = indexer.fit(&doc.tokens);
        tracing::debug!(source = %doc.source, added = n, "fitted");
        added += n;
    }

    save_vocab_atomic(path, &indexer.export(tool_info()))?;
    tracing::info!(vocab = vocab_path, added, total = indexer.len(), "vocabulary saved");

    if json {
        let out = FitJson {
            vocab: vocab_path,
            created,
            widths: indexer.widths().to_vec(),
            documents: docs.len(),
            added,
            total: indexer.len(),
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!(
        "{} {vocab_path}: {added} new grams from {} documents, {} total",
        if created { "Created" } else { "Updated" },
        docs.len(),
        indexer.len()
    );
    Ok(())
}
