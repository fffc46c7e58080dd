//! Configuration management for grounded.
//!
//! This module handles loading and merging configuration from multiple sources:
//! - Config files (.grounded/config.yaml)
//! - Environment variables
//! - Command-line flags
//!
//! Later sources win. The configuration is workspace-centric, with most state
//! stored in `.grounded/`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Providers the LLM factory knows how to build.
pub const KNOWN_PROVIDERS: [&str; 2] = ["ollama", "openai"];

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the workspace root (contains .grounded/)
    pub workspace: PathBuf,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Active LLM provider ("ollama" or "openai")
    pub provider: String,

    /// Default model identifier
    pub model: String,

    /// API key for the LLM provider
    pub api_key: Option<String>,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,

    /// Emit logs as JSON lines
    pub log_json: bool,

    /// LLM provider configurations
    pub llm: Option<LlmConfig>,

    /// Corpus location and naming
    pub corpus: CorpusConfig,

    /// Embedding model used by the in-memory index and scorer
    pub embedding: EmbeddingSettings,

    /// Retrieval sizes for the pipeline strategies
    pub retrieval: RetrievalConfig,
}

/// LLM configuration from config.yaml.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(rename = "activeProvider")]
    pub active_provider: String,

    pub providers: HashMap<String, ProviderConfig>,
}

/// Provider-specific configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProviderConfig {
    OpenAI {
        #[serde(rename = "apiKeyEnv")]
        api_key_env: String,
        model: String,
        endpoint: Option<String>,
        timeout: Option<u64>,
    },
    Ollama {
        endpoint: String,
        model: String,
        timeout: Option<u64>,
    },
}

impl ProviderConfig {
    /// Model configured for this provider.
    pub fn model(&self) -> &str {
        match self {
            ProviderConfig::OpenAI { model, .. } | ProviderConfig::Ollama { model, .. } => model,
        }
    }

    /// Custom endpoint, if any.
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            ProviderConfig::OpenAI { endpoint, .. } => endpoint.as_deref(),
            ProviderConfig::Ollama { endpoint, .. } => Some(endpoint.as_str()),
        }
    }

    /// Request timeout in seconds, if any.
    pub fn timeout(&self) -> Option<u64> {
        match self {
            ProviderConfig::OpenAI { timeout, .. } | ProviderConfig::Ollama { timeout, .. } => {
                *timeout
            }
        }
    }
}

/// Where the pre-chunked corpus lives and how it is named in prompts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusConfig {
    /// JSON or JSONL chunk file, relative to the workspace unless absolute
    pub path: Option<PathBuf>,

    /// Short corpus name used in the no-information answer
    #[serde(default = "default_corpus_name")]
    pub name: String,

    /// Document title used in prompts
    #[serde(default = "default_corpus_title")]
    pub title: String,
}

fn default_corpus_name() -> String {
    "TCS".to_string()
}

fn default_corpus_title() -> String {
    "TCS Annual Report".to_string()
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            path: None,
            name: default_corpus_name(),
            title: default_corpus_title(),
        }
    }
}

/// Embedding provider selection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbeddingSettings {
    /// Provider name: "trigram" or "ollama"
    pub provider: String,

    /// Model identifier (provider-specific)
    pub model: String,

    /// Embedding vector dimensions
    pub dimensions: usize,

    /// Endpoint for HTTP providers
    pub endpoint: Option<String>,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            provider: "trigram".to_string(),
            model: "trigram-v1".to_string(),
            dimensions: 384,
            endpoint: None,
        }
    }
}

/// Result counts used by the retrieval strategies.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RetrievalConfig {
    /// Chunks retrieved by the single-query strategies
    #[serde(rename = "topK", default = "default_top_k")]
    pub top_k: usize,

    /// Chunks retrieved per query during fan-out
    #[serde(rename = "fanOutK", default = "default_fan_out_k")]
    pub fan_out_k: usize,

    /// Related questions requested by the multi-query strategy
    #[serde(rename = "relatedQuestions", default = "default_related_questions")]
    pub related_questions: usize,

    /// Chunks kept after re-ranking
    #[serde(rename = "rerankTopK", default = "default_rerank_top_k")]
    pub rerank_top_k: usize,
}

fn default_top_k() -> usize {
    5
}

fn default_fan_out_k() -> usize {
    10
}

fn default_related_questions() -> usize {
    5
}

fn default_rerank_top_k() -> usize {
    5
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            fan_out_k: default_fan_out_k(),
            related_questions: default_related_questions(),
            rerank_top_k: default_rerank_top_k(),
        }
    }
}

/// Full configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    llm: Option<LlmConfig>,
    workspace: Option<WorkspaceConfig>,
    logging: Option<LoggingConfig>,
    corpus: Option<CorpusConfig>,
    embedding: Option<EmbeddingSettings>,
    retrieval: Option<RetrievalConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WorkspaceConfig {
    path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingConfig {
    level: Option<String>,
    color: Option<bool>,
    json: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workspace: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_file: None,
            provider: "ollama".to_string(), // Local-first default
            model: "llama3.2".to_string(),
            api_key: None,
            log_level: None,
            verbose: false,
            no_color: false,
            log_json: false,
            llm: None,
            corpus: CorpusConfig::default(),
            embedding: EmbeddingSettings::default(),
            retrieval: RetrievalConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, the YAML config file and environment variables.
    ///
    /// Environment variables:
    /// - `GROUNDED_WORKSPACE`: Override workspace path
    /// - `GROUNDED_CONFIG`: Path to config file
    /// - `GROUNDED_PROVIDER`: LLM provider
    /// - `GROUNDED_MODEL`: Model identifier
    /// - `GROUNDED_API_KEY`: API key
    /// - `GROUNDED_CORPUS`: Corpus chunk file
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    ///
    /// # Example
    /// ```no_run
    /// use grounded_core::config::AppConfig;
    ///
    /// let config = AppConfig::load().expect("Failed to load config");
    /// println!("Workspace: {:?}", config.workspace);
    /// ```
    pub fn load() -> AppResult<Self> {
        Self::load_with(None, None)
    }

    /// Like [`load`](Self::load), with workspace and config file chosen by the caller.
    ///
    /// Explicit paths win over `GROUNDED_WORKSPACE` and `GROUNDED_CONFIG`.
    pub fn load_with(workspace: Option<&Path>, config_file: Option<&Path>) -> AppResult<Self> {
        let mut config = Self::default();

        if let Some(workspace) = workspace {
            config.workspace = workspace.to_path_buf();
        } else if let Ok(workspace) = std::env::var("GROUNDED_WORKSPACE") {
            config.workspace = PathBuf::from(workspace);
        }

        if let Some(config_file) = config_file {
            config.config_file = Some(config_file.to_path_buf());
        } else if let Ok(config_file) = std::env::var("GROUNDED_CONFIG") {
            config.config_file = Some(PathBuf::from(config_file));
        }

        if !config.workspace.exists() {
            return Err(AppError::Config(format!(
                "Workspace directory does not exist: {:?}",
                config.workspace
            )));
        }

        let config_path = config
            .config_file
            .clone()
            .unwrap_or_else(|| config.grounded_dir().join("config.yaml"));

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        }

        // Environment variables override YAML config
        if let Ok(provider) = std::env::var("GROUNDED_PROVIDER") {
            config.provider = provider;
        }

        if let Ok(model) = std::env::var("GROUNDED_MODEL") {
            config.model = model;
        }

        if let Ok(corpus) = std::env::var("GROUNDED_CORPUS") {
            config.corpus.path = Some(PathBuf::from(corpus));
        }

        config.api_key = std::env::var("GROUNDED_API_KEY").ok();
        if let Ok(level) = std::env::var("RUST_LOG") {
            config.log_level = Some(level);
        }

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge YAML configuration file into this config.
    fn merge_yaml(&self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        Ok(self.merge_file(config_file))
    }

    fn merge_file(&self, config_file: ConfigFile) -> Self {
        let mut result = self.clone();

        if let Some(path) = config_file.workspace.and_then(|ws| ws.path) {
            result.workspace = PathBuf::from(path);
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
            if let Some(json) = logging.json {
                result.log_json = json;
            }
        }

        if let Some(llm) = config_file.llm {
            result.provider = llm.active_provider.clone();

            if let Some(provider_config) = llm.providers.get(&llm.active_provider) {
                result.model = provider_config.model().to_string();
            }

            result.llm = Some(llm);
        }

        if let Some(corpus) = config_file.corpus {
            result.corpus = corpus;
        }

        if let Some(embedding) = config_file.embedding {
            result.embedding = embedding;
        }

        if let Some(retrieval) = config_file.retrieval {
            result.retrieval = retrieval;
        }

        result
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// CLI flags take precedence over environment variables and the config file.
    #[allow(clippy::too_many_arguments)]
    pub fn with_overrides(
        mut self,
        workspace: Option<PathBuf>,
        config_file: Option<PathBuf>,
        provider: Option<String>,
        model: Option<String>,
        corpus: Option<PathBuf>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
        log_json: bool,
    ) -> Self {
        if let Some(workspace) = workspace {
            self.workspace = workspace;
        }

        if let Some(config_file) = config_file {
            self.config_file = Some(config_file);
        }

        if let Some(provider) = provider {
            self.provider = provider;
        }

        if let Some(model) = model {
            self.model = model;
        }

        if let Some(corpus) = corpus {
            self.corpus.path = Some(corpus);
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        if log_json {
            self.log_json = true;
        }

        self
    }

    /// Get the path to the .grounded directory.
    pub fn grounded_dir(&self) -> PathBuf {
        self.workspace.join(".grounded")
    }

    /// Resolve the corpus file against the workspace.
    pub fn corpus_path(&self) -> AppResult<PathBuf> {
        let path = self.corpus.path.as_ref().ok_or_else(|| {
            AppError::Config(
                "No corpus configured. Set corpus.path, GROUNDED_CORPUS or --corpus".to_string(),
            )
        })?;

        if path.is_absolute() {
            Ok(path.clone())
        } else {
            Ok(self.workspace.join(path))
        }
    }

    /// Get the configuration of a provider, if the config file declares it.
    pub fn get_provider_config(&self, provider: &str) -> Option<&ProviderConfig> {
        self.llm.as_ref().and_then(|llm| llm.providers.get(provider))
    }

    /// Resolve API key from `GROUNDED_API_KEY` or the provider's key variable.
    pub fn resolve_api_key(&self, provider: &str) -> Option<String> {
        if let Some(ref key) = self.api_key {
            return Some(key.clone());
        }

        match self.get_provider_config(provider)? {
            ProviderConfig::OpenAI { api_key_env, .. } => std::env::var(api_key_env).ok(),
            ProviderConfig::Ollama { .. } => None,
        }
    }

    /// Validate configuration for the active provider and retrieval sizes.
    pub fn validate(&self) -> AppResult<()> {
        let provider = self.provider.as_str();

        if !KNOWN_PROVIDERS.contains(&provider) {
            return Err(AppError::Config(format!(
                "Unknown provider: {}. Supported: {}",
                provider,
                KNOWN_PROVIDERS.join(", ")
            )));
        }

        if provider == "openai" && self.resolve_api_key(provider).is_none() {
            let hint = match self.get_provider_config(provider) {
                Some(ProviderConfig::OpenAI { api_key_env, .. }) => api_key_env.clone(),
                _ => "GROUNDED_API_KEY".to_string(),
            };
            return Err(AppError::Config(format!(
                "API key not found in environment variable: {}",
                hint
            )));
        }

        let retrieval = &self.retrieval;
        if retrieval.top_k == 0 || retrieval.fan_out_k == 0 || retrieval.rerank_top_k == 0 {
            return Err(AppError::Config(
                "Retrieval sizes (topK, fanOutK, rerankTopK) must be greater than zero"
                    .to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.provider, "ollama");
        assert_eq!(config.model, "llama3.2");
        assert_eq!(config.corpus.name, "TCS");
        assert_eq!(config.retrieval, RetrievalConfig::default());
        assert!(!config.verbose);
        assert!(!config.no_color);
    }

    #[test]
    fn test_grounded_dir() {
        let config = AppConfig::default();
        assert!(config.grounded_dir().ends_with(".grounded"));
    }

    #[test]
    fn test_with_overrides() {
        let config = AppConfig::default();
        let overridden = config.with_overrides(
            None,
            None,
            Some("openai".to_string()),
            Some("gpt-4.1".to_string()),
            Some(PathBuf::from("chunks.jsonl")),
            None,
            true,
            false,
            true,
        );

        assert_eq!(overridden.provider, "openai");
        assert_eq!(overridden.model, "gpt-4.1");
        assert_eq!(overridden.corpus.path, Some(PathBuf::from("chunks.jsonl")));
        assert!(overridden.verbose);
        assert!(overridden.log_json);
        assert_eq!(overridden.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_merge_yaml() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        std::fs::write(
            &path,
            r#"
llm:
  activeProvider: ollama
  providers:
    ollama:
      endpoint: http://localhost:11434
      model: qwen2.5:7b
      timeout: 60
corpus:
  path: data/tcs.jsonl
retrieval:
  topK: 3
logging:
  level: debug
  json: true
"#,
        )
        .unwrap();

        let config = AppConfig::default().merge_yaml(&path).unwrap();
        assert_eq!(config.model, "qwen2.5:7b");
        assert_eq!(config.corpus.path, Some(PathBuf::from("data/tcs.jsonl")));
        assert_eq!(config.corpus.title, "TCS Annual Report");
        assert_eq!(config.retrieval.top_k, 3);
        assert_eq!(config.retrieval.fan_out_k, 10);
        assert_eq!(config.log_level, Some("debug".to_string()));
        assert!(config.log_json);

        let ollama = config.get_provider_config("ollama").unwrap();
        assert_eq!(ollama.timeout(), Some(60));
        assert_eq!(ollama.endpoint(), Some("http://localhost:11434"));
    }

    #[test]
    fn test_load_with_workspace_config() {
        let temp = tempfile::TempDir::new().unwrap();
        let dir = temp.path().join(".grounded");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("config.yaml"),
            "corpus:\n  name: Infosys\n  title: Infosys Integrated Report\nretrieval:\n  fanOutK: 8\n",
        )
        .unwrap();

        let config = AppConfig::load_with(Some(temp.path()), None).unwrap();
        assert_eq!(config.workspace, temp.path());
        assert_eq!(config.corpus.name, "Infosys");
        assert_eq!(config.corpus.title, "Infosys Integrated Report");
        assert_eq!(config.retrieval.fan_out_k, 8);
        assert_eq!(config.retrieval.top_k, 5);
    }

    #[test]
    fn test_load_with_missing_workspace() {
        let temp = tempfile::TempDir::new().unwrap();
        let missing = temp.path().join("nope");
        assert!(AppConfig::load_with(Some(&missing), None).is_err());
    }

    #[test]
    fn test_corpus_path_resolution() {
        let mut config = AppConfig::default();
        assert!(config.corpus_path().is_err());

        config.workspace = PathBuf::from("/srv/reports");
        config.corpus.path = Some(PathBuf::from("chunks.jsonl"));
        assert_eq!(
            config.corpus_path().unwrap(),
            PathBuf::from("/srv/reports/chunks.jsonl")
        );
    }

    #[test]
    fn test_validate_unknown_provider() {
        let mut config = AppConfig::default();
        config.provider = "unknown".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_ollama() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_openai_with_explicit_key() {
        let mut config = AppConfig::default();
        config.provider = "openai".to_string();
        config.api_key = Some("sk-test".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_retrieval_size() {
        let mut config = AppConfig::default();
        config.retrieval.fan_out_k = 0;
        assert!(config.validate().is_err());
    }
}
