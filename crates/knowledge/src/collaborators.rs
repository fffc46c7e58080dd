//! Collaborator contracts used by the answer pipeline.
//!
//! The pipeline never owns an index connection or model credentials; callers
//! hand in implementations of these traits and keep them alive for the call.
//! Every method returns an `AppResult`, so strategies decide per call site
//! whether a failure degrades or is surfaced in the answer.

use async_trait::async_trait;
use grounded_core::AppResult;

/// Similarity search over the chunk corpus.
#[async_trait]
pub trait RetrievalClient: Send + Sync {
    /// Return up to `k` chunks for `text`, most similar first. May be empty.
    async fn query(&self, text: &str, k: usize) -> AppResult<Vec<String>>;
}

/// Text completion.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Provider label used when a failure is reported in an answer.
    fn provider_name(&self) -> &str {
        "LLM"
    }

    /// Generate text for a prompt.
    async fn generate(&self, prompt: &str) -> AppResult<String>;
}

/// Pairwise relevance model used for re-ranking.
#[async_trait]
pub trait RelevanceScorer: Send + Sync {
    /// Score each `(question, chunk)` pair; higher is more relevant.
    ///
    /// The returned vector must have the same length and order as `pairs`.
    async fn score(&self, pairs: &[(String, String)]) -> AppResult<Vec<f32>>;
}
