//! Query expansion with a hypothetical answer.
//!
//! The hypothetical answer only shapes the retrieval query. Synthesis sees
//! the original question and the retrieved chunks, nothing else.

use crate::rag::direct::retrieve_or_empty;
use crate::rag::types::PipelineResult;
use crate::rag::PipelineContext;
use grounded_core::AppResult;
use grounded_prompt::HYPOTHETICAL_PROMPT_ID;
use std::collections::HashMap;
use std::time::Instant;

/// Answer `question` after expanding the retrieval query.
#[tracing::instrument(name = "pipeline", skip_all, fields(strategy = "query-expansion"))]
pub async fn query_expansion(ctx: PipelineContext<'_>, question: &str) -> PipelineResult {
    let started = Instant::now();

    let hypothetical = match hypothetical_answer(&ctx, question).await {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!("Hypothetical answer generation failed: {}", e);
            String::new()
        }
    };

    let query = expanded_query(question, &hypothetical);
    let chunks = retrieve_or_empty(&ctx, &query, ctx.settings.top_k).await;

    if chunks.is_empty() {
        tracing::info!("No chunks retrieved for expanded query");
        return PipelineResult::finish(ctx.settings.no_information_answer(), started)
            .with_hypothetical_answer(hypothetical);
    }

    let answer = ctx.synthesizer().answer_or_error(question, &chunks).await;
    let result = PipelineResult::finish(answer, started).with_hypothetical_answer(hypothetical);
    tracing::info!("Answered in {:.2}s", result.runtime);
    result
}

async fn hypothetical_answer(ctx: &PipelineContext<'_>, question: &str) -> AppResult<String> {
    let mut variables = HashMap::new();
    variables.insert("title".to_string(), ctx.settings.corpus_title.clone());
    variables.insert("question".to_string(), question.to_string());

    let prompt = ctx.prompts.build(HYPOTHETICAL_PROMPT_ID, &variables)?;
    let output = ctx.generation.generate(&prompt.text).await?;

    let hypothetical = output.trim().to_string();
    tracing::debug!("Hypothetical answer: {} chars", hypothetical.len());
    Ok(hypothetical)
}

/// `"{question} {hypothetical}"`, or the bare question when there is no hypothetical.
pub fn expanded_query(question: &str, hypothetical: &str) -> String {
    if hypothetical.is_empty() {
        question.to_string()
    } else {
        format!("{} {}", question, hypothetical)
    }
}
