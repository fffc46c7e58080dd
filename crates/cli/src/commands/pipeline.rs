//! Wiring of concrete collaborators from configuration.

use anyhow::Context;
use grounded_core::config::AppConfig;
use grounded_knowledge::{
    create_provider, load_corpus, run_strategy, EmbeddingScorer, LlmGenerator, MemoryIndex,
    PipelineContext, PipelineResult, PipelineSettings, Strategy,
};
use grounded_llm::create_client;
use grounded_prompt::PromptLibrary;

/// Everything a strategy run needs, owned for the life of the command.
pub struct Pipeline {
    index: MemoryIndex,
    generator: LlmGenerator,
    scorer: EmbeddingScorer,
    prompts: PromptLibrary,
    settings: PipelineSettings,
}

impl Pipeline {
    /// Build the LLM client, load and embed the corpus, and load prompts.
    pub async fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let provider_config = config.get_provider_config(&config.provider);
        let endpoint = provider_config.and_then(|pc| pc.endpoint());
        let timeout = provider_config.and_then(|pc| pc.timeout());
        let api_key = config.resolve_api_key(&config.provider);

        let client = create_client(&config.provider, endpoint, api_key.as_deref(), timeout)
            .context("Failed to create LLM client")?;
        let generator = LlmGenerator::new(client, config.model.clone());

        let embeddings =
            create_provider(&config.embedding).context("Failed to create embedding provider")?;

        let corpus_path = config.corpus_path()?;
        let chunks = load_corpus(&corpus_path)
            .with_context(|| format!("Failed to load corpus from {}", corpus_path.display()))?;
        if chunks.is_empty() {
            tracing::warn!("Corpus {} has no chunks", corpus_path.display());
        }

        let index = MemoryIndex::build(embeddings.clone(), chunks)
            .await
            .context("Failed to embed the corpus")?;
        let scorer = EmbeddingScorer::new(embeddings);

        let prompts = PromptLibrary::load(&config.workspace).context("Failed to load prompts")?;
        let settings = PipelineSettings::from_config(config);

        tracing::info!(
            "Pipeline ready: {} chunks, provider {}, model {}",
            index.len(),
            config.provider,
            config.model
        );

        Ok(Self {
            index,
            generator,
            scorer,
            prompts,
            settings,
        })
    }

    pub async fn run(&self, strategy: Strategy, question: &str) -> PipelineResult {
        let ctx = PipelineContext::new(&self.index, &self.generator, &self.prompts, &self.settings);
        run_strategy(strategy, ctx, &self.scorer, question).await
    }
}
