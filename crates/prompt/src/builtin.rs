//! Built-in prompt definitions for the answer pipeline.

use crate::types::PromptDefinition;

/// Grounding prompt used for final answer synthesis.
///
/// Variables: `title`, `question`, `context`.
pub const ANSWER_PROMPT_ID: &str = "rag.answer";

/// Hypothetical-answer prompt used for query expansion.
///
/// Variables: `title`, `question`.
pub const HYPOTHETICAL_PROMPT_ID: &str = "rag.hypothetical";

/// Related-questions prompt used for multi-query fan-out.
///
/// Variables: `title`, `question`, `count`.
pub const RELATED_QUESTIONS_PROMPT_ID: &str = "rag.related";

const ANSWER_TEMPLATE: &str = "Based on the following excerpts from the {{title}}, please answer this question: {{question}}

Context from {{title}}:
{{context}}

Please provide a clear, accurate answer based only on the information provided above. If the context doesn't contain enough information to fully answer the question, please say so.";

const HYPOTHETICAL_TEMPLATE: &str = "You are a helpful expert financial research assistant. Provide an example answer to the given question, that might be found in a document like the {{title}}.

Question: {{question}}

Generate a realistic, detailed answer that would typically appear in the {{title}}:";

const RELATED_QUESTIONS_TEMPLATE: &str = "You are a helpful expert financial research assistant. Your users are asking questions about the {{title}}.

Suggest up to {{count}} additional related questions to help them find the information they need, for the provided question.
Suggest only short questions without compound sentences. Suggest a variety of questions that cover different aspects of the topic.
Make sure they are complete questions, and that they are related to the original question.
Output one question per line. Do not number the questions.

Original question: {{question}}

Generate {{count}} related questions:";

/// All built-in prompt definitions.
pub fn builtin_prompts() -> Vec<PromptDefinition> {
    vec![
        builtin(ANSWER_PROMPT_ID, "Grounded answer synthesis", ANSWER_TEMPLATE),
        builtin(
            HYPOTHETICAL_PROMPT_ID,
            "Hypothetical answer for query expansion",
            HYPOTHETICAL_TEMPLATE,
        ),
        builtin(
            RELATED_QUESTIONS_PROMPT_ID,
            "Related questions for multi-query retrieval",
            RELATED_QUESTIONS_TEMPLATE,
        ),
    ]
}

fn builtin(id: &str, title: &str, template: &str) -> PromptDefinition {
    PromptDefinition {
        id: id.to_string(),
        title: title.to_string(),
        api_version: "1.0".to_string(),
        created_by: "grounded".to_string(),
        template: template.to_string(),
    }
}
