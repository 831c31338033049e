use gramvec_core::GramExtractor;

use crate::cli::{InputArgs, PipelineArgs};
use crate::types::{ExtractDocJson, ExtractJson, GramCountJson};
use crate::util::{pipeline_patch, read_documents, resolve_options};

pub(crate) fn cmd_extract(
    pipeline: &PipelineArgs,
    input: &InputArgs,
    config: Option<&str>,
    limit: Option<usize>,
    json: bool,
) -> anyhow::Result<()> {
    let options = resolve_options(&pipeline_patch(pipeline)?, config)?;
    let tokenizer = options.tokenizer();
    let docs = read_documents(input, &tokenizer)?;
    let extractor = GramExtractor::new(options.widths.clone());

    let mut out = Vec::with_capacity(docs.len());
    for doc in docs {
        let counts = extractor.extract(&doc.tokens);
        let distinct = counts.len();
        let mut grams = counts.into_sorted();
        if let Some(limit) = limit {
            grams.truncate(limit);
        }
        out.push((doc.source, doc.tokens.len(), distinct, grams));
    }

    if json {
        let payload = ExtractJson {
            widths: options.widths.to_vec(),
            granularity: options.granularity.as_str(),
            documents: out
                .into_iter()
                .map(|(source, token_count, distinct_grams, grams)| ExtractDocJson {
                    source,
                    token_count,
                    distinct_grams,
                    grams: grams
                        .into_iter()
                        .map(|(g, count)| GramCountJson {
                            tokens: g.into_tokens(),
                            count,
                        })
                        .collect(),
                })
                .collect(),
        };
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    for (source, token_count, distinct, grams) in out {
        println!("{source}: {token_count} tokens, {distinct} distinct grams");
        for (g, count) in grams {
            println!("  {count:>6}  {g}");
        }
    }
    Ok(())
}
