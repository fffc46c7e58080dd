//! Direct retrieval: the question verbatim, top-k, then synthesis.

use crate::rag::types::PipelineResult;
use crate::rag::PipelineContext;
use std::time::Instant;

/// Answer `question` from a single retrieval call.
#[tracing::instrument(name = "pipeline", skip_all, fields(strategy = "direct"))]
pub async fn direct_retrieval(ctx: PipelineContext<'_>, question: &str) -> PipelineResult {
    let started = Instant::now();

    let chunks = retrieve_or_empty(&ctx, question, ctx.settings.top_k).await;
    if chunks.is_empty() {
        tracing::info!("No chunks retrieved");
        return PipelineResult::finish(ctx.settings.no_information_answer(), started);
    }

    let answer = ctx.synthesizer().answer_or_error(question, &chunks).await;
    let result = PipelineResult::finish(answer, started);
    tracing::info!("Answered in {:.2}s", result.runtime);
    result
}

/// Retrieve for a single-query strategy, treating failure as no results.
pub(crate) async fn retrieve_or_empty(
    ctx: &PipelineContext<'_>,
    query: &str,
    k: usize,
) -> Vec<String> {
    match ctx.retrieval.query(query, k).await {
        Ok(chunks) => {
            tracing::debug!("Retrieved {} chunks", chunks.len());
            chunks
        }
        Err(e) => {
            tracing::warn!("Retrieval failed, treating as empty: {}", e);
            Vec::new()
        }
    }
}
