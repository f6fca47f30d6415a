//! Pipeline configuration
//!
//! Loaded from TOML. Every key is optional and falls back to the default.
//!
//! ```toml
//! max_iterations = 3
//! output_dir = "out/agents"
//!
//! [llm]
//! analysis_model = "deepseek-chat"
//! ```

use crate::error::ConfigError;
use forge_catalog::ToolCatalog;
use forge_synth::{SynthesisOptions, DEFAULT_MEMORY_DB_FILE};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// Default clarification budget
pub const DEFAULT_MAX_ITERATIONS: usize = 5;

/// Marker the analyst answers with once the request is fully specified
pub const DEFAULT_SENTINEL: &str = "INFO_COMPLETE";

/// Characters per streamed code chunk
pub const DEFAULT_CHUNK_SIZE: usize = 500;

/// Default directory for persisted agents
pub const DEFAULT_OUTPUT_DIR: &str = "generated/agents";

/// Replies accepted as confirmation
pub const DEFAULT_AFFIRMATIVE_TOKENS: [&str; 5] = ["y", "yes", "s", "si", "sí"];

/// Chat-completions collaborator settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// OpenAI-compatible API base URL
    pub base_url: String,
    /// Model answering clarification turns
    pub analysis_model: String,
    /// Model drafting the plan JSON
    pub planning_model: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.deepseek.com/v1".to_string(),
            analysis_model: forge_plan::BASE_CHAT_MODEL.to_string(),
            planning_model: forge_plan::REASONING_MODEL.to_string(),
            api_key_env: "DEEPSEEK_API_KEY".to_string(),
            timeout_secs: 120,
        }
    }
}

/// Forge configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForgeConfig {
    /// Clarification rounds before proceeding anyway
    pub max_iterations: usize,
    /// Completion marker, matched as a substring
    pub sentinel_token: String,
    /// Where generated agents are written
    pub output_dir: PathBuf,
    /// Characters per streamed chunk
    pub chunk_size: usize,
    /// Replies that confirm generation (case-insensitive)
    pub affirmative_tokens: Vec<String>,
    /// Append the secondary search provider to web-search tool sets
    pub fallback_injection: bool,
    /// SQLite file for memory-backed agents
    pub memory_db_file: String,
    /// Emit explanatory comments in generated code
    pub include_comments: bool,
    /// Emit the illustrative invocation in generated code
    pub add_examples: bool,
    /// Chat collaborator settings
    pub llm: LlmConfig,
}

impl Default for ForgeConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            sentinel_token: DEFAULT_SENTINEL.to_string(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            chunk_size: DEFAULT_CHUNK_SIZE,
            affirmative_tokens: DEFAULT_AFFIRMATIVE_TOKENS
                .iter()
                .map(ToString::to_string)
                .collect(),
            fallback_injection: true,
            memory_db_file: DEFAULT_MEMORY_DB_FILE.to_string(),
            include_comments: true,
            add_examples: true,
            llm: LlmConfig::default(),
        }
    }
}

impl ForgeConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate TOML text
    ///
    /// # Errors
    /// [`ConfigError::Parse`] on bad syntax or types, [`ConfigError::Invalid`]
    /// on unusable values
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    ///
    /// # Errors
    /// [`ConfigError::Read`] if the file cannot be read, otherwise as
    /// [`ForgeConfig::from_toml_str`]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Reject values the pipeline cannot run with
    ///
    /// # Errors
    /// [`ConfigError::Invalid`] naming the first offending key
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_iterations == 0 {
            return Err(ConfigError::Invalid("max_iterations must be at least 1".into()));
        }
        if self.chunk_size == 0 {
            return Err(ConfigError::Invalid("chunk_size must be at least 1".into()));
        }
        if self.sentinel_token.trim().is_empty() {
            return Err(ConfigError::Invalid("sentinel_token must not be empty".into()));
        }
        Ok(())
    }

    /// With clarification budget
    #[inline]
    #[must_use]
    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    /// With completion marker
    #[inline]
    #[must_use]
    pub fn with_sentinel(mut self, token: impl Into<String>) -> Self {
        self.sentinel_token = token.into();
        self
    }

    /// With output directory
    #[inline]
    #[must_use]
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// With stream chunk size
    #[inline]
    #[must_use]
    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size;
        self
    }

    /// With fallback provider injection toggled
    #[inline]
    #[must_use]
    pub fn with_fallback_injection(mut self, enabled: bool) -> Self {
        self.fallback_injection = enabled;
        self
    }

    /// With rendering switches taken from `options`
    #[must_use]
    pub fn with_synthesis_options(mut self, options: SynthesisOptions) -> Self {
        self.include_comments = options.include_comments;
        self.add_examples = options.add_examples;
        self.memory_db_file = options.memory_db_file;
        self
    }

    /// Rendering switches for the synthesizer
    #[must_use]
    pub fn synthesis_options(&self) -> SynthesisOptions {
        SynthesisOptions::default()
            .with_comments(self.include_comments)
            .with_examples(self.add_examples)
            .with_memory_db_file(self.memory_db_file.clone())
    }

    /// Tool catalog honoring `fallback_injection`
    ///
    /// Borrows the shared catalog unless injection is switched off.
    #[must_use]
    pub fn catalog(&self) -> Cow<'static, ToolCatalog> {
        let global = ToolCatalog::global();
        if self.fallback_injection == global.injects_fallback() {
            Cow::Borrowed(global)
        } else {
            Cow::Owned(global.clone().with_fallback_injection(self.fallback_injection))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_toml_is_default() {
        let config = ForgeConfig::from_toml_str("").unwrap();
        assert_eq!(config, ForgeConfig::default());
        assert_eq!(config.max_iterations, 5);
        assert_eq!(config.sentinel_token, "INFO_COMPLETE");
        assert_eq!(config.chunk_size, 500);
    }

    #[test]
    fn partial_toml_overrides() {
        let config = ForgeConfig::from_toml_str(
            "max_iterations = 2\nadd_examples = false\n\n[llm]\nplanning_model = \"gpt-4o\"\n",
        )
        .unwrap();
        assert_eq!(config.max_iterations, 2);
        assert!(!config.add_examples);
        assert_eq!(config.llm.planning_model, "gpt-4o");
        assert_eq!(config.llm.analysis_model, "deepseek-chat");
    }

    #[test]
    fn zero_budget_rejected() {
        let err = ForgeConfig::from_toml_str("max_iterations = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn blank_sentinel_rejected() {
        let config = ForgeConfig::new().with_sentinel("  ");
        assert!(config.validate().is_err());
        assert!(ForgeConfig::new().with_chunk_size(0).validate().is_err());
    }

    #[test]
    fn wrong_type_is_parse_error() {
        let err = ForgeConfig::from_toml_str("chunk_size = \"big\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ForgeConfig::load(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn catalog_follows_injection_flag() {
        assert!(matches!(ForgeConfig::new().catalog(), Cow::Borrowed(_)));
        let catalog = ForgeConfig::new().with_fallback_injection(false).catalog();
        assert!(!catalog.injects_fallback());
    }

    #[test]
    fn synthesis_options_round_trip() {
        let options = SynthesisOptions::default().with_comments(false).with_memory_db_file("m.db");
        let config = ForgeConfig::new().with_synthesis_options(options.clone());
        assert_eq!(config.synthesis_options(), options);
    }
}
