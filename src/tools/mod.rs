mod errors;
mod params;

pub use params::{AnalyzeParams, CorpusParams};

use std::env;

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use errors::{context_size_param, kwic_to_mcp_error, sample_to_mcp_error, serialize_error};

use crate::samples::{DEFAULT_CORPUS_FILE, Sample, SampleError, SampleStore};
use crate::search::{self, CorpusRow, KeywordMap, MatchRecord, format};

/// Context characters per side when neither the call nor the environment sets one.
pub const DEFAULT_CONTEXT_SIZE: usize = 50;

#[derive(Serialize)]
struct AnalyzeResponse {
    success: bool,
    results: Vec<MatchRecord>,
    total_matches: usize,
    keyword_searched: String,
}

#[derive(Serialize)]
struct CorpusResponse {
    corpus: Vec<CorpusRow>,
    filename: String,
}

#[derive(Serialize)]
struct SamplesResponse {
    samples: Vec<Sample>,
}

/// MCP server handler providing KWIC analysis over text, sample files and
/// parallel corpora.
///
/// Configuration via environment variables:
/// - `KWIC_SAMPLES_DIR`: samples directory (default: `samples`)
/// - `KWIC_CONTEXT_SIZE`: default context size (default: 50)
#[derive(Clone)]
pub struct Kwic {
    samples: SampleStore,
    context_size: usize,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl Kwic {
    pub fn new(samples: SampleStore, context_size: usize) -> Self {
        Self {
            samples,
            context_size,
            tool_router: Self::tool_router(),
        }
    }

    pub fn from_env() -> Self {
        let context_size = parse_context_size(env::var("KWIC_CONTEXT_SIZE").ok().as_deref());
        Self::new(SampleStore::from_env(), context_size)
    }

    #[tool(
        name = "analyze",
        description = "Keyword-in-context analysis of a text. Finds every literal occurrence of the keyword (case-insensitive unless case_sensitive is set) and returns each with bounded left/right context, the 1-based line number and the full line. Truncated context is marked with \"...\"."
    )]
    async fn analyze(
        &self,
        Parameters(params): Parameters<AnalyzeParams>,
    ) -> Result<CallToolResult, McpError> {
        if params.text.trim().is_empty() {
            return Err(McpError::invalid_params("text must not be empty", None));
        }
        if params.keyword.trim().is_empty() {
            return Err(McpError::invalid_params("keyword must not be empty", None));
        }

        let context_size = context_size_param(params.context_size, self.context_size)?;
        let case_sensitive = params.case_sensitive.unwrap_or(false);

        info!(keyword = %params.keyword, context_size, case_sensitive, "tool:analyze");

        let results: Vec<MatchRecord> =
            search::search(&params.text, &params.keyword, context_size, case_sensitive)
                .map_err(kwic_to_mcp_error)?
                .collect();

        info!(matches = results.len(), "analyze complete");

        let summary = format::format_matches(&params.keyword, &results);
        let structured = serde_json::to_value(AnalyzeResponse {
            success: true,
            total_matches: results.len(),
            results,
            keyword_searched: params.keyword,
        })
        .map_err(serialize_error)?;

        Ok(tool_result(summary, structured))
    }

    #[tool(
        name = "corpus",
        description = "Query a two-column parallel corpus (Japanese, English) from the samples directory. With a keyword, returns only rows where the keyword occurs in the Japanese text or one of its English equivalents from wordmap.json occurs in the English text, with KWIC matches for both sides. Without a keyword, lists every row."
    )]
    async fn corpus(
        &self,
        Parameters(params): Parameters<CorpusParams>,
    ) -> Result<CallToolResult, McpError> {
        let filename = params
            .filename
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty())
            .unwrap_or_else(|| DEFAULT_CORPUS_FILE.to_string());
        let keyword = params.keyword.unwrap_or_default().trim().to_string();
        let context_size = context_size_param(params.context_size, self.context_size)?;

        info!(filename = %filename, keyword = %keyword, context_size, "tool:corpus");

        let store = self.samples.clone();
        let file = filename.clone();
        let load_map = !keyword.is_empty();
        let (rows, keyword_map) = run_blocking(move || {
            let rows = store.read_corpus(&file)?;
            let keyword_map = if load_map {
                store.load_keyword_map()?
            } else {
                KeywordMap::new()
            };
            Ok((rows, keyword_map))
        })
        .await?;

        let corpus = search::filter(&rows, &keyword, &keyword_map, context_size)
            .map_err(kwic_to_mcp_error)?;

        info!(rows = rows.len(), matched = corpus.len(), "corpus complete");

        let summary = format::format_corpus(&filename, &keyword, &corpus);
        let structured = serde_json::to_value(CorpusResponse { corpus, filename })
            .map_err(serialize_error)?;

        Ok(tool_result(summary, structured))
    }

    #[tool(
        name = "samples",
        description = "List the sample texts (.txt) and corpora (.csv) available in the samples directory, with their content. Use a listed .csv filename with the corpus tool, or pass a text's content to analyze."
    )]
    async fn samples(&self) -> Result<CallToolResult, McpError> {
        info!("tool:samples");

        let store = self.samples.clone();
        let samples = run_blocking(move || store.list()).await?;

        info!(count = samples.len(), "samples complete");

        let summary = format::format_samples(&samples);
        let structured =
            serde_json::to_value(SamplesResponse { samples }).map_err(serialize_error)?;

        Ok(tool_result(summary, structured))
    }
}

#[tool_handler]
impl ServerHandler for Kwic {
    fn get_info(&self) -> ServerInfo {
        ServerInfo::new(ServerCapabilities::builder().enable_tools().build())
            .with_server_info(
                Implementation::new("kwic", env!("CARGO_PKG_VERSION")).with_title("KWIC"),
            )
            .with_instructions(
                "kwic provides keyword-in-context analysis (analyze), bilingual parallel-corpus queries (corpus), and sample listing (samples).",
            )
    }
}

/// Parse `KWIC_CONTEXT_SIZE`, falling back to the default on absent or bad values.
fn parse_context_size(raw: Option<&str>) -> usize {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return DEFAULT_CONTEXT_SIZE;
    };
    raw.parse().unwrap_or_else(|_| {
        warn!(value = raw, "invalid KWIC_CONTEXT_SIZE, using {DEFAULT_CONTEXT_SIZE}");
        DEFAULT_CONTEXT_SIZE
    })
}

/// Run a filesystem read off the async runtime.
async fn run_blocking<T, F>(f: F) -> Result<T, McpError>
where
    F: FnOnce() -> Result<T, SampleError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| McpError::internal_error(format!("sample read task failed: {e}"), None))?
        .map_err(sample_to_mcp_error)
}

fn tool_result(summary: String, structured: Value) -> CallToolResult {
    let mut result = CallToolResult::success(vec![Content::text(summary)]);
    result.structured_content = Some(structured);
    result
}
