//! Multi-query retrieval with relevance re-ranking.
//!
//! The question fans out into related questions, every query retrieves
//! independently, and the pooled chunks are deduplicated and re-ranked
//! against the original question before synthesis.

use crate::collaborators::RelevanceScorer;
use crate::rag::policy::{
    dedup_chunks, pad_by_repetition, pair_scores, parse_related_questions, select_top_k,
    QueryPolicy,
};
use crate::rag::types::{PipelineResult, QuerySet};
use crate::rag::PipelineContext;
use futures::future::join_all;
use grounded_core::AppResult;
use grounded_prompt::RELATED_QUESTIONS_PROMPT_ID;
use std::collections::HashMap;
use std::time::Instant;

/// Multi-query strategy with a swappable query-count policy.
pub struct MultiQuery<'s> {
    scorer: &'s dyn RelevanceScorer,
    policy: QueryPolicy,
}

impl<'s> MultiQuery<'s> {
    /// Strategy that pads related questions by repetition.
    pub fn new(scorer: &'s dyn RelevanceScorer) -> Self {
        Self {
            scorer,
            policy: pad_by_repetition,
        }
    }

    pub fn with_policy(mut self, policy: QueryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Answer `question` from the re-ranked fan-out pool.
    #[tracing::instrument(name = "pipeline", skip_all, fields(strategy = "multi-query"))]
    pub async fn run(&self, ctx: PipelineContext<'_>, question: &str) -> PipelineResult {
        let started = Instant::now();
        let settings = ctx.settings;

        let generated = match related_questions(&ctx, question).await {
            Ok(parsed) => (self.policy)(parsed, question, settings.related_questions),
            Err(e) => {
                tracing::warn!("Related question generation failed: {}", e);
                Vec::new()
            }
        };

        let queries = QuerySet::new(question, &generated);
        let pool = dedup_chunks(fan_out(&ctx, &queries, settings.fan_out_k).await);
        tracing::debug!(
            "Pooled {} unique chunks from {} queries",
            pool.len(),
            queries.len()
        );

        if pool.is_empty() {
            tracing::info!("No chunks retrieved for any query");
            return PipelineResult::finish(settings.no_information_answer(), started)
                .with_generated_queries(generated);
        }

        let selected = self.rerank(question, pool, settings.rerank_top_k).await;
        let answer = ctx.synthesizer().answer_or_error(question, &selected).await;

        let result = PipelineResult::finish(answer, started).with_generated_queries(generated);
        tracing::info!("Answered in {:.2}s", result.runtime);
        result
    }

    /// Top `k` chunks of `pool` by relevance to `question`, best first.
    ///
    /// If scoring fails the first `k` chunks in pool order are kept.
    async fn rerank(&self, question: &str, pool: Vec<String>, k: usize) -> Vec<String> {
        let pairs: Vec<(String, String)> = pool
            .iter()
            .map(|chunk| (question.to_string(), chunk.clone()))
            .collect();

        let scored = match self.scorer.score(&pairs).await {
            Ok(scores) => pair_scores(pool.clone(), scores),
            Err(e) => Err(e),
        };

        match scored {
            Ok(scored) => {
                let top = select_top_k(scored, k);
                if let Some(best) = top.first() {
                    tracing::debug!("Kept {} chunks, best score {:.3}", top.len(), best.score);
                }
                top.into_iter().map(|s| s.chunk).collect()
            }
            Err(e) => {
                tracing::warn!("Re-ranking failed, keeping pool order: {}", e);
                pool.into_iter().take(k).collect()
            }
        }
    }
}

/// Answer `question` with the default multi-query strategy.
pub async fn multi_query(
    ctx: PipelineContext<'_>,
    scorer: &dyn RelevanceScorer,
    question: &str,
) -> PipelineResult {
    MultiQuery::new(scorer).run(ctx, question).await
}

async fn related_questions(ctx: &PipelineContext<'_>, question: &str) -> AppResult<Vec<String>> {
    let mut variables = HashMap::new();
    variables.insert("title".to_string(), ctx.settings.corpus_title.clone());
    variables.insert("question".to_string(), question.to_string());
    variables.insert(
        "count".to_string(),
        ctx.settings.related_questions.to_string(),
    );

    let prompt = ctx.prompts.build(RELATED_QUESTIONS_PROMPT_ID, &variables)?;
    let output = ctx.generation.generate(&prompt.text).await?;

    let parsed = parse_related_questions(&output);
    tracing::debug!("Parsed {} related questions", parsed.len());
    Ok(parsed)
}

/// Retrieve for every query concurrently.
///
/// Results are concatenated in query-set order, each query's chunks in rank
/// order. A failing query contributes nothing.
async fn fan_out(ctx: &PipelineContext<'_>, queries: &QuerySet, k: usize) -> Vec<String> {
    let retrievals = queries.iter().map(|query| ctx.retrieval.query(query, k));

    join_all(retrievals)
        .await
        .into_iter()
        .enumerate()
        .flat_map(|(i, outcome)| match outcome {
            Ok(chunks) => chunks,
            Err(e) => {
                tracing::warn!("Retrieval for query {} failed, skipping: {}", i, e);
                Vec::new()
            }
        })
        .collect()
}
