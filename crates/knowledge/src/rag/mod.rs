//! Retrieval-augmented answering.
//!
//! Three strategies turn a question into a grounded answer:
//! - [`direct_retrieval`]: one retrieval call, then synthesis
//! - [`query_expansion`]: retrieval with the question plus a hypothetical answer
//! - [`multi_query`]: fan-out over related questions with re-ranking
//!
//! Every strategy is total: collaborator failures degrade or become answer
//! text, so each call returns a [`PipelineResult`].

pub mod direct;
pub mod expansion;
pub mod multi_query;
pub mod policy;
pub mod synthesize;
pub mod types;

pub use direct::direct_retrieval;
pub use expansion::query_expansion;
pub use multi_query::{multi_query, MultiQuery};
pub use policy::{pad_by_repetition, QueryPolicy};
pub use synthesize::AnswerSynthesizer;
pub use types::{PipelineResult, PipelineSettings, QuerySet, ScoredChunk, Strategy};

use crate::collaborators::{GenerationClient, RelevanceScorer, RetrievalClient};
use grounded_prompt::PromptLibrary;

/// Borrowed collaborators and settings for one strategy call.
///
/// The caller owns every handle; a context is cheap to copy.
#[derive(Clone, Copy)]
pub struct PipelineContext<'a> {
    pub retrieval: &'a dyn RetrievalClient,
    pub generation: &'a dyn GenerationClient,
    pub prompts: &'a PromptLibrary,
    pub settings: &'a PipelineSettings,
}

impl<'a> PipelineContext<'a> {
    pub fn new(
        retrieval: &'a dyn RetrievalClient,
        generation: &'a dyn GenerationClient,
        prompts: &'a PromptLibrary,
        settings: &'a PipelineSettings,
    ) -> Self {
        Self {
            retrieval,
            generation,
            prompts,
            settings,
        }
    }

    pub(crate) fn synthesizer(&self) -> AnswerSynthesizer<'a> {
        AnswerSynthesizer::new(self.generation, self.prompts, &self.settings.corpus_title)
    }
}

/// Run one strategy by name.
///
/// `scorer` is only consulted by [`Strategy::MultiQuery`].
pub async fn run_strategy(
    strategy: Strategy,
    ctx: PipelineContext<'_>,
    scorer: &dyn RelevanceScorer,
    question: &str,
) -> PipelineResult {
    match strategy {
        Strategy::Direct => direct_retrieval(ctx, question).await,
        Strategy::QueryExpansion => query_expansion(ctx, question).await,
        Strategy::MultiQuery => multi_query(ctx, scorer, question).await,
    }
}
