use schemars::JsonSchema;
use serde::Deserialize;

#[derive(Deserialize, JsonSchema)]
pub struct AnalyzeParams {
    /// Text to search. Lines are split on "\n" and numbered from 1.
    pub text: String,
    /// Term to locate, matched literally (not a pattern)
    pub keyword: String,
    /// Characters of context on each side of a match (default: 50)
    pub context_size: Option<i64>,
    /// Match letter case exactly (default: false)
    pub case_sensitive: Option<bool>,
}

#[derive(Deserialize, JsonSchema)]
pub struct CorpusParams {
    /// Two-column CSV file in the samples directory (default: "sample_corpus.csv")
    pub filename: Option<String>,
    /// Source-language keyword. Omit or leave empty to list every row.
    pub keyword: Option<String>,
    /// Characters of context on each side of a match (default: 50)
    pub context_size: Option<i64>,
}
