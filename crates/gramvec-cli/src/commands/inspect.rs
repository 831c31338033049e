use anyhow::Context;
use std::path::Path;

use gramvec_vectorize::VocabularyIndexer;

use crate::types::{InspectEntryJson, InspectJson};
use crate::util::load_vocab;

pub(crate) fn cmd_inspect(vocab_path: &str, limit: Option<usize>, json: bool) -> anyhow::Result<()> {
    let bundle = load_vocab(Path::new(vocab_path))?
        .ok_or_else(|| anyhow::anyhow!("vocabulary file {vocab_path} does not exist"))?;
    let format = bundle.format.clone();
    let tool = format!("{} {}", bundle.tool.name, bundle.tool.version);
    // Restoring validates contiguity and uniqueness before anything is shown.
    let indexer = VocabularyIndexer::from_export(bundle)
        .with_context(|| format!("load vocabulary {vocab_path}"))?;
    let vocab = indexer.vocabulary();
    let shown = limit.unwrap_or(usize::MAX);

    if json {
        let out = InspectJson {
            vocab: vocab_path,
            format,
            tool,
            widths: indexer.widths().to_vec(),
            size: vocab.len(),
            entries: vocab
                .iter()
                .take(shown)
                .map(|(index, g)| InspectEntryJson {
                    index,
                    tokens: g.tokens().to_vec(),
                })
                .collect(),
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("Vocabulary: {vocab_path}");
    println!("Format: {format} (written by {tool})");
    println!("Widths: {:?}", indexer.widths().to_vec());
    println!("Size: {}", vocab.len());
    for (index, g) in vocab.iter().take(shown) {
        println!("  {index:>6}  {g}");
    }
    if vocab.len() > shown {
        println!("  ... {} more", vocab.len() - shown);
    }
    Ok(())
}
