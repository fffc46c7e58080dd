//! Pipeline result and settings types.

use grounded_core::config::{AppConfig, RetrievalConfig};
use grounded_core::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Instant;

/// Output of a single strategy run.
///
/// `hypothetical_answer` is only set by query expansion and
/// `generated_queries` only by multi-query retrieval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineResult {
    /// Final answer text, the canned no-information answer, or an API error message
    pub answer: String,

    /// Wall-clock seconds from strategy entry to return, rounded to 2 decimals
    pub runtime: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hypothetical_answer: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_queries: Option<Vec<String>>,
}

impl PipelineResult {
    /// Finish a run that started at `started`.
    pub(crate) fn finish(answer: String, started: Instant) -> Self {
        Self {
            answer,
            runtime: elapsed_seconds(started),
            hypothetical_answer: None,
            generated_queries: None,
        }
    }

    pub(crate) fn with_hypothetical_answer(mut self, hypothetical_answer: String) -> Self {
        self.hypothetical_answer = Some(hypothetical_answer);
        self
    }

    pub(crate) fn with_generated_queries(mut self, generated_queries: Vec<String>) -> Self {
        self.generated_queries = Some(generated_queries);
        self
    }
}

/// Seconds since `started`, rounded to two decimal places.
pub fn elapsed_seconds(started: Instant) -> f64 {
    (started.elapsed().as_secs_f64() * 100.0).round() / 100.0
}

/// A chunk paired with its relevance to the original question.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredChunk {
    pub chunk: String,
    pub score: f32,
}

/// Ordered queries issued during retrieval: the original question first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySet {
    queries: Vec<String>,
}

impl QuerySet {
    /// Original question followed by the generated queries.
    pub fn new(question: &str, generated: &[String]) -> Self {
        let mut queries = Vec::with_capacity(generated.len() + 1);
        queries.push(question.to_string());
        queries.extend(generated.iter().cloned());
        Self { queries }
    }

    pub fn len(&self) -> usize {
        self.queries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.queries.iter().map(String::as_str)
    }
}

/// The three answer strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Single retrieval with the question verbatim
    Direct,
    /// Retrieval with the question plus a hypothetical answer
    QueryExpansion,
    /// Fan-out over related questions with re-ranking
    MultiQuery,
}

impl Strategy {
    /// Every strategy, cheapest first.
    pub const ALL: [Strategy; 3] = [
        Strategy::Direct,
        Strategy::QueryExpansion,
        Strategy::MultiQuery,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Direct => "direct",
            Strategy::QueryExpansion => "query-expansion",
            Strategy::MultiQuery => "multi-query",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "direct" | "basic" => Ok(Strategy::Direct),
            "query-expansion" | "expansion" | "hyde" => Ok(Strategy::QueryExpansion),
            "multi-query" | "multi" => Ok(Strategy::MultiQuery),
            other => Err(AppError::Config(format!(
                "Unknown strategy: {}. Supported: direct, query-expansion, multi-query",
                other
            ))),
        }
    }
}

/// Sizes and corpus naming shared by every strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineSettings {
    /// Chunks retrieved by direct and query-expansion strategies
    pub top_k: usize,

    /// Chunks retrieved per query during multi-query fan-out
    pub fan_out_k: usize,

    /// Related questions generated for fan-out
    pub related_questions: usize,

    /// Chunks kept after re-ranking
    pub rerank_top_k: usize,

    /// Short corpus name, e.g. "TCS"
    pub corpus_name: String,

    /// Document title used in prompts, e.g. "TCS Annual Report"
    pub corpus_title: String,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self::from_parts(RetrievalConfig::default(), "TCS", "TCS Annual Report")
    }
}

impl PipelineSettings {
    /// Settings from the loaded application config.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::from_parts(config.retrieval, &config.corpus.name, &config.corpus.title)
    }

    fn from_parts(retrieval: RetrievalConfig, name: &str, title: &str) -> Self {
        Self {
            top_k: retrieval.top_k,
            fan_out_k: retrieval.fan_out_k,
            related_questions: retrieval.related_questions,
            rerank_top_k: retrieval.rerank_top_k,
            corpus_name: name.to_string(),
            corpus_title: title.to_string(),
        }
    }

    /// Canned answer returned when retrieval finds nothing.
    pub fn no_information_answer(&self) -> String {
        format!(
            "No relevant information found in {} report.",
            self.corpus_name
        )
    }
}
