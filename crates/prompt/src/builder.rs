//! Prompt library for rendering the pipeline's templates.

use crate::builtin::builtin_prompts;
use crate::loader::{list_prompts, load_prompt, validate_prompt};
use crate::types::{BuiltPrompt, PromptDefinition};
use grounded_core::{AppError, AppResult};
use handlebars::Handlebars;
use std::collections::HashMap;
use std::path::Path;

/// Compiled prompt templates keyed by prompt ID.
///
/// Built-in definitions are always present; workspace overrides replace
/// them by ID. Templates are compiled when registered, so a broken
/// override fails at load time rather than mid-pipeline.
pub struct PromptLibrary {
    definitions: HashMap<String, PromptDefinition>,
    registry: Handlebars<'static>,
}

impl PromptLibrary {
    /// Library containing only the built-in prompts.
    pub fn builtin() -> AppResult<Self> {
        let mut library = Self {
            definitions: HashMap::new(),
            registry: new_registry(),
        };

        for definition in builtin_prompts() {
            library.register(definition)?;
        }

        Ok(library)
    }

    /// Built-in prompts overlaid with `.grounded/prompts/*.yml` from the workspace.
    pub fn load(workspace_path: &Path) -> AppResult<Self> {
        let mut library = Self::builtin()?;

        for prompt_id in list_prompts(workspace_path)? {
            let definition = load_prompt(workspace_path, &prompt_id)?;
            library.register(definition)?;
        }

        Ok(library)
    }

    /// Register or replace a definition.
    pub fn register(&mut self, definition: PromptDefinition) -> AppResult<()> {
        validate_prompt(&definition)?;

        self.registry
            .register_template_string(&definition.id, &definition.template)
            .map_err(|e| {
                AppError::Prompt(format!(
                    "Failed to register template '{}': {}",
                    definition.id, e
                ))
            })?;

        tracing::debug!("Registered prompt: {}", definition.id);
        self.definitions.insert(definition.id.clone(), definition);
        Ok(())
    }

    /// Look up a definition by ID.
    pub fn get(&self, prompt_id: &str) -> Option<&PromptDefinition> {
        self.definitions.get(prompt_id)
    }

    /// Render a prompt with the given variables.
    ///
    /// # Example
    /// ```no_run
    /// use grounded_prompt::{PromptLibrary, ANSWER_PROMPT_ID};
    /// use std::collections::HashMap;
    ///
    /// # fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let library = PromptLibrary::builtin()?;
    /// let mut vars = HashMap::new();
    /// vars.insert("question".to_string(), "What was revenue?".to_string());
    /// vars.insert("context".to_string(), "Revenue grew 4%.".to_string());
    ///
    /// let built = library.build(ANSWER_PROMPT_ID, &vars)?;
    /// println!("{}", built.text);
    /// # Ok(())
    /// # }
    /// ```
    pub fn build(
        &self,
        prompt_id: &str,
        variables: &HashMap<String, String>,
    ) -> AppResult<BuiltPrompt> {
        if !self.definitions.contains_key(prompt_id) {
            return Err(AppError::Prompt(format!("Unknown prompt: {}", prompt_id)));
        }

        let text = self
            .registry
            .render(prompt_id, variables)
            .map_err(|e| AppError::Prompt(format!("Failed to render template: {}", e)))?;

        Ok(BuiltPrompt::new(text, prompt_id.to_string(), variables))
    }
}

impl std::fmt::Debug for PromptLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut ids: Vec<&String> = self.definitions.keys().collect();
        ids.sort();
        f.debug_struct("PromptLibrary").field("prompts", &ids).finish()
    }
}

fn new_registry() -> Handlebars<'static> {
    let mut handlebars = Handlebars::new();
    // Chunks are plain report text, never HTML
    handlebars.register_escape_fn(handlebars::no_escape);
    handlebars
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::{ANSWER_PROMPT_ID, HYPOTHETICAL_PROMPT_ID, RELATED_QUESTIONS_PROMPT_ID};

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_builtin_library_has_all_prompts() {
        let library = PromptLibrary::builtin().unwrap();
        assert!(library.get(ANSWER_PROMPT_ID).is_some());
        assert!(library.get(HYPOTHETICAL_PROMPT_ID).is_some());
        assert!(library.get(RELATED_QUESTIONS_PROMPT_ID).is_some());
    }

    #[test]
    fn test_render_answer_prompt() {
        let library = PromptLibrary::builtin().unwrap();
        let built = library
            .build(
                ANSWER_PROMPT_ID,
                &vars(&[
                    ("title", "TCS Annual Report"),
                    ("question", "What was TCS revenue in FY24?"),
                    ("context", "Revenue was $29B.\n\nMargins held at 24.6%."),
                ]),
            )
            .unwrap();

        assert!(built
            .text
            .starts_with("Based on the following excerpts from the TCS Annual Report"));
        assert!(built.text.contains("What was TCS revenue in FY24?"));
        assert!(built.text.contains("Revenue was $29B.\n\nMargins held at 24.6%."));
        assert_eq!(built.metadata.source_prompt_id, ANSWER_PROMPT_ID);
    }

    #[test]
    fn test_render_does_not_escape() {
        let library = PromptLibrary::builtin().unwrap();
        let built = library
            .build(
                HYPOTHETICAL_PROMPT_ID,
                &vars(&[("title", "R&D <Report>"), ("question", "a & b?")]),
            )
            .unwrap();

        assert!(built.text.contains("R&D <Report>"));
        assert!(built.text.contains("a & b?"));
    }

    #[test]
    fn test_render_related_questions_count() {
        let library = PromptLibrary::builtin().unwrap();
        let built = library
            .build(
                RELATED_QUESTIONS_PROMPT_ID,
                &vars(&[("title", "TCS Annual Report"), ("question", "q"), ("count", "5")]),
            )
            .unwrap();

        assert!(built.text.contains("Suggest up to 5 additional related questions"));
        assert!(built.text.ends_with("Generate 5 related questions:"));
    }

    #[test]
    fn test_unknown_prompt() {
        let library = PromptLibrary::builtin().unwrap();
        assert!(library.build("rag.missing", &HashMap::new()).is_err());
    }

    #[test]
    fn test_register_rejects_broken_template() {
        let mut library = PromptLibrary::builtin().unwrap();
        let result = library.register(PromptDefinition {
            id: ANSWER_PROMPT_ID.to_string(),
            title: "Broken".to_string(),
            api_version: "1.0".to_string(),
            created_by: String::new(),
            template: "{{#if question}}unterminated".to_string(),
        });

        assert!(result.is_err());
        // Original definition survives a failed override
        assert_eq!(
            library.get(ANSWER_PROMPT_ID).unwrap().title,
            "Grounded answer synthesis"
        );
    }

    #[test]
    fn test_workspace_override() {
        let temp = tempfile::TempDir::new().unwrap();
        let dir = temp.path().join(".grounded/prompts");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("rag.answer.yml"),
            "id: rag.answer\ntitle: Terse\napiVersion: \"1.1\"\ntemplate: \"Q: {{question}}\\nC: {{context}}\"\n",
        )
        .unwrap();

        let library = PromptLibrary::load(temp.path()).unwrap();
        let built = library
            .build(ANSWER_PROMPT_ID, &vars(&[("question", "q1"), ("context", "c1")]))
            .unwrap();

        assert_eq!(built.text, "Q: q1\nC: c1");
    }
}
