use anyhow::Context;
use std::path::{Path, PathBuf};

use gramvec_core::export::{ExportToolInfo, VocabularyExportV1};
use gramvec_core::{Granularity, Token, Tokenizer};
use gramvec_vectorize::config::{
    roll_up_vectorizer_options_from_paths, ResolvedVectorizerOptions, VectorizerOptionsPatch,
};

use crate::cli::{switch, InputArgs, InputItem, PipelineArgs};

/// A tokenized input document and where it came from.
pub(crate) struct Document {
    pub(crate) source: String,
    pub(crate) tokens: Vec<Token>,
}

pub(crate) fn tool_info() -> ExportToolInfo {
    ExportToolInfo {
        name: "gramvec".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }
}

pub(crate) fn parse_widths_csv(s: &str) -> anyhow::Result<Vec<usize>> {
    let mut out = Vec::new();
    for part in s.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let n: usize = part
            .parse()
            .with_context(|| format!("parse width {part:?}"))?;
        out.push(n);
    }
    if out.is_empty() {
        anyhow::bail!("--widths must list at least one width");
    }
    Ok(out)
}

/// Turns command-line flags into the highest-precedence options layer.
pub(crate) fn pipeline_patch(p: &PipelineArgs) -> anyhow::Result<VectorizerOptionsPatch> {
    let widths = p.widths.as_deref().map(parse_widths_csv).transpose()?;
    let granularity = match p.granularity.as_deref() {
        Some(s) => Some(Granularity::parse(s).ok_or_else(|| {
            anyhow::anyhow!("unknown granularity {s:?} (expected word or char)")
        })?),
        None => None,
    };
    Ok(VectorizerOptionsPatch {
        widths,
        granularity,
        lowercase: switch(p.lowercase, p.no_lowercase),
        ..Default::default()
    })
}

pub(crate) fn resolve_options(
    overrides: &VectorizerOptionsPatch,
    config: Option<&str>,
) -> anyhow::Result<ResolvedVectorizerOptions> {
    let cwd = std::env::current_dir().context("current dir")?;
    roll_up_vectorizer_options_from_paths(overrides, config.map(Path::new), &cwd)
        .context("resolve options")
}

/// Reads files and inline texts in the order they were given.
pub(crate) fn read_documents(
    input: &InputArgs,
    tokenizer: &dyn Tokenizer,
) -> anyhow::Result<Vec<Document>> {
    let mut docs = Vec::new();
    for item in input.items() {
        match item {
            InputItem::Text(i) => docs.push(Document {
                source: format!("text[{i}]"),
                tokens: tokenizer.tokenize(&input.texts[i]),
            }),
            InputItem::Path(i) => read_file(&input.paths[i], input.lines, tokenizer, &mut docs)?,
        }
    }
    if docs.is_empty() {
        anyhow::bail!("no documents (pass file paths or --text)");
    }
    tracing::debug!(documents = docs.len(), "read input");
    Ok(docs)
}

fn read_file(
    path: &str,
    lines: bool,
    tokenizer: &dyn Tokenizer,
    docs: &mut Vec<Document>,
) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(path).with_context(|| format!("read {path}"))?;
    if !lines {
        docs.push(Document {
            source: path.to_string(),
            tokens: tokenizer.tokenize(&content),
        });
        return Ok(());
    }
    for (lineno, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        docs.push(Document {
            source: format!("{path}:{}", lineno + 1),
            tokens: tokenizer.tokenize(line),
        });
    }
    Ok(())
}

pub(crate) fn load_vocab(path: &Path) -> anyhow::Result<Option<VocabularyExportV1>> {
    if !path.exists() {
        return Ok(None);
    }
    let s = std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let bundle: VocabularyExportV1 =
        serde_json::from_str(&s).with_context(|| format!("parse {}", path.display()))?;
    Ok(Some(bundle))
}

/// Writes the vocabulary next to `path` and renames it into place.
pub(crate) fn save_vocab_atomic(path: &Path, bundle: &VocabularyExportV1) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(bundle).context("serialize vocabulary")?;
    let tmp = tmp_path_for(path);
    std::fs::write(&tmp, json).with_context(|| format!("write {}", tmp.display()))?;
    std::fs::rename(&tmp, path)
        .with_context(|| format!("rename {} -> {}", tmp.display(), path.display()))?;
    Ok(())
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Checks configured widths against the widths stored in a vocabulary file.
///
/// Widths left at the default defer to the file.
pub(crate) fn ensure_widths_match(
    options: &ResolvedVectorizerOptions,
    stored: &[usize],
) -> anyhow::Result<()> {
    if !options.widths_configured {
        return Ok(());
    }
    let requested = options.widths.to_vec();
    if requested != stored {
        anyhow::bail!(
            "configured widths {requested:?} do not match the vocabulary file widths {stored:?}"
        );
    }
    Ok(())
}

pub(crate) fn format_sparse(values: &[i64]) -> String {
    let mut out = String::new();
    for (i, v) in values.iter().enumerate() {
        if *v == 0 {
            continue;
        }
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(&format!("{i}:{v}"));
    }
    out
}
