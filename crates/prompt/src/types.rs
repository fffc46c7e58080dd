//! Prompt types for grounded.
//!
//! This module defines the domain entities for the prompt system.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A prompt definition, either built in or loaded from YAML.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PromptDefinition {
    /// Unique prompt identifier
    pub id: String,

    /// Human-readable title
    pub title: String,

    /// API version for schema evolution
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    /// Creator identifier
    #[serde(rename = "createdBy", default)]
    pub created_by: String,

    /// Template string with Handlebars syntax
    pub template: String,
}

/// A rendered prompt ready for the generation client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltPrompt {
    /// Rendered prompt text
    pub text: String,

    /// Metadata about the built prompt
    pub metadata: BuiltPromptMetadata,
}

/// Metadata about a built prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltPromptMetadata {
    /// Source prompt ID
    #[serde(rename = "sourcePromptId")]
    pub source_prompt_id: String,

    /// Names of the template variables that were supplied
    #[serde(rename = "variables")]
    pub variables: Vec<String>,
}

impl BuiltPrompt {
    /// Create a new built prompt.
    pub fn new(text: String, source_prompt_id: String, variables: &HashMap<String, String>) -> Self {
        let mut names: Vec<String> = variables.keys().cloned().collect();
        names.sort();

        Self {
            text,
            metadata: BuiltPromptMetadata {
                source_prompt_id,
                variables: names,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_definition_deserialization() {
        let yaml = r#"
id: rag.answer
title: Grounded answer
apiVersion: "1.0"
createdBy: analyst
template: "{{question}}"
"#;

        let def: PromptDefinition = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(def.id, "rag.answer");
        assert_eq!(def.api_version, "1.0");
        assert_eq!(def.created_by, "analyst");
        assert_eq!(def.template, "{{question}}");
    }

    #[test]
    fn test_built_prompt_variables_sorted() {
        let mut vars = HashMap::new();
        vars.insert("question".to_string(), "q".to_string());
        vars.insert("context".to_string(), "c".to_string());

        let built = BuiltPrompt::new("text".to_string(), "rag.answer".to_string(), &vars);

        assert_eq!(built.text, "text");
        assert_eq!(built.metadata.source_prompt_id, "rag.answer");
        assert_eq!(built.metadata.variables, vec!["context", "question"]);
    }
}
