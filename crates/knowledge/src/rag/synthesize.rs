//! Grounded answer synthesis shared by every strategy.

use crate::collaborators::GenerationClient;
use grounded_core::AppResult;
use grounded_prompt::{PromptLibrary, ANSWER_PROMPT_ID};
use std::collections::HashMap;

/// Separator placed between chunks in the grounding context.
pub const CONTEXT_SEPARATOR: &str = "\n\n";

/// Builds the grounding prompt and makes the single synthesis call.
pub struct AnswerSynthesizer<'a> {
    generation: &'a dyn GenerationClient,
    prompts: &'a PromptLibrary,
    title: &'a str,
}

impl<'a> AnswerSynthesizer<'a> {
    pub fn new(
        generation: &'a dyn GenerationClient,
        prompts: &'a PromptLibrary,
        title: &'a str,
    ) -> Self {
        Self {
            generation,
            prompts,
            title,
        }
    }

    /// Render the grounding prompt for `question` over `chunks`.
    pub fn build_prompt(&self, question: &str, chunks: &[String]) -> AppResult<String> {
        let mut variables = HashMap::new();
        variables.insert("title".to_string(), self.title.to_string());
        variables.insert("question".to_string(), question.to_string());
        variables.insert("context".to_string(), chunks.join(CONTEXT_SEPARATOR));

        Ok(self.prompts.build(ANSWER_PROMPT_ID, &variables)?.text)
    }

    /// Generate an answer from `chunks`, returning the trimmed model output.
    ///
    /// Callers must short-circuit on an empty chunk list first.
    pub async fn synthesize(&self, question: &str, chunks: &[String]) -> AppResult<String> {
        let prompt = self.build_prompt(question, chunks)?;
        tracing::debug!("Synthesizing answer from {} chunks", chunks.len());

        let output = self.generation.generate(&prompt).await?;
        Ok(output.trim().to_string())
    }

    /// Like [`synthesize`](Self::synthesize), but a failure becomes the answer text.
    pub async fn answer_or_error(&self, question: &str, chunks: &[String]) -> String {
        match self.synthesize(question, chunks).await {
            Ok(answer) => answer,
            Err(e) => {
                tracing::warn!("Answer synthesis failed: {}", e);
                format!(
                    "Error calling {} API: {}",
                    self.generation.provider_name(),
                    e
                )
            }
        }
    }
}
