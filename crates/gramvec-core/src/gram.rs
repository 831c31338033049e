use crate::tokenize::Tokenizer;
use crate::types::{DocumentGramCounts, Gram, GramWidths};

/// Counts every n-gram of every requested width in `tokens`.
///
/// Widths are visited in ascending order and windows left to right with
/// stride 1. A width longer than the document contributes nothing.
pub fn extract<S: AsRef<str>>(tokens: &[S], widths: &GramWidths) -> DocumentGramCounts {
    let mut counts = DocumentGramCounts::new();
    for n in widths.iter() {
        // windows(n) yields nothing when n > len.
        for window in tokens.windows(n) {
            counts.record(Gram::from_strs(window));
        }
    }
    counts
}

/// Reusable extractor bound to a fixed set of widths.
#[derive(Debug, Clone, Default)]
pub struct GramExtractor {
    widths: GramWidths,
}

impl GramExtractor {
    pub fn new(widths: GramWidths) -> Self {
        Self { widths }
    }

    pub fn widths(&self) -> &GramWidths {
        &self.widths
    }

    pub fn extract<S: AsRef<str>>(&self, tokens: &[S]) -> DocumentGramCounts {
        extract(tokens, &self.widths)
    }

    pub fn extract_text(&self, tokenizer: &dyn Tokenizer, text: &str) -> DocumentGramCounts {
        extract(&tokenizer.tokenize(text), &self.widths)
    }
}
