use serde::Serialize;

#[derive(Serialize)]
pub(crate) struct ExtractJson {
    pub(crate) widths: Vec<usize>,
    pub(crate) granularity: &'static str,
    pub(crate) documents: Vec<ExtractDocJson>,
}

#[derive(Serialize)]
pub(crate) struct ExtractDocJson {
    pub(crate) source: String,
    pub(crate) token_count: usize,
    pub(crate) distinct_grams: usize,
    pub(crate) grams: Vec<GramCountJson>,
}

#[derive(Serialize)]
pub(crate) struct GramCountJson {
    pub(crate) tokens: Vec<String>,
    pub(crate) count: u64,
}

#[derive(Serialize)]
pub(crate) struct FitJson<'a> {
    pub(crate) vocab: &'a str,
    pub(crate) created: bool,
    pub(crate) widths: Vec<usize>,
    pub(crate) documents: usize,
    pub(crate) added: usize,
    pub(crate) total: usize,
}

#[derive(Serialize)]
pub(crate) struct VectorizeJson {
    pub(crate) strategy: &'static str,
    pub(crate) widths: Vec<usize>,
    pub(crate) dim: usize,
    pub(crate) signed: bool,
    pub(crate) rows: Vec<RowJson>,
}

#[derive(Serialize)]
pub(crate) struct RowJson {
    pub(crate) source: String,
    pub(crate) nnz: usize,
    /// Non-zero `[index, value]` pairs, unless dense output was requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) sparse: Option<Vec<(usize, i64)>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) dense: Option<Vec<i64>>,
}

#[derive(Serialize)]
pub(crate) struct InspectJson<'a> {
    pub(crate) vocab: &'a str,
    pub(crate) format: String,
    pub(crate) tool: String,
    pub(crate) widths: Vec<usize>,
    pub(crate) size: usize,
    pub(crate) entries: Vec<InspectEntryJson>,
}

#[derive(Serialize)]
pub(crate) struct InspectEntryJson {
    pub(crate) index: usize,
    pub(crate) tokens: Vec<String>,
}
