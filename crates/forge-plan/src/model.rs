//! Language model families
//!
//! Plans name their target model with a free-form string. This module maps
//! that string onto a known provider family and normalizes ids the rest of
//! the pipeline does not recognize.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical base chat model (default for every plan)
pub const BASE_CHAT_MODEL: &str = "deepseek-chat";

/// Canonical reasoning model (teams are promoted to it)
pub const REASONING_MODEL: &str = "deepseek-reasoner";

/// Known model provider families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelFamily {
    /// DeepSeek chat and reasoner models
    DeepSeek,
    /// Anthropic Claude models
    Anthropic,
    /// OpenAI GPT models
    OpenAi,
    /// Google Gemini models
    Google,
}

impl ModelFamily {
    /// All families in detection order
    pub const ALL: [ModelFamily; 4] = [
        ModelFamily::DeepSeek,
        ModelFamily::Anthropic,
        ModelFamily::OpenAi,
        ModelFamily::Google,
    ];

    /// Detect family from a model id (case-insensitive substring match)
    ///
    /// Detection order matters: `deepseek` is checked before the others.
    #[must_use]
    pub fn detect(model_id: &str) -> Option<Self> {
        let lower = model_id.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|family| family.markers().iter().any(|m| lower.contains(m)))
    }

    /// Substrings identifying this family
    #[inline]
    #[must_use]
    pub fn markers(self) -> &'static [&'static str] {
        match self {
            Self::DeepSeek => &["deepseek"],
            Self::Anthropic => &["claude", "sonnet"],
            Self::OpenAi => &["gpt", "openai"],
            Self::Google => &["gemini", "google"],
        }
    }

    /// Model id used when the plan names the family but no concrete version
    #[inline]
    #[must_use]
    pub fn default_model_id(self) -> &'static str {
        match self {
            Self::DeepSeek => BASE_CHAT_MODEL,
            Self::Anthropic => "claude-sonnet-4-20250514",
            Self::OpenAi => "gpt-4o",
            Self::Google => "gemini-2.0-flash-exp",
        }
    }

    /// Prefix a concrete, versioned id of this family carries
    #[inline]
    #[must_use]
    pub fn versioned_prefix(self) -> &'static str {
        match self {
            Self::DeepSeek => "deepseek",
            Self::Anthropic => "claude-",
            Self::OpenAi => "gpt-",
            Self::Google => "gemini-",
        }
    }

    /// Concrete model id to target for `model_id`
    ///
    /// Family aliases such as `"sonnet"` or `"openai"` become the family
    /// default; versioned ids are kept verbatim.
    #[must_use]
    pub fn concrete_id(self, model_id: &str) -> String {
        if model_id.to_lowercase().contains(self.versioned_prefix()) {
            model_id.to_string()
        } else {
            self.default_model_id().to_string()
        }
    }
}

impl fmt::Display for ModelFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::DeepSeek => "deepseek",
            Self::Anthropic => "anthropic",
            Self::OpenAi => "openai",
            Self::Google => "google",
        };
        f.write_str(name)
    }
}

/// Normalize a requested model id
///
/// Absent, blank or unrecognized ids fall back to [`BASE_CHAT_MODEL`].
#[must_use]
pub fn normalize_model_id(requested: Option<&str>) -> String {
    let Some(raw) = requested.map(str::trim).filter(|s| !s.is_empty()) else {
        return BASE_CHAT_MODEL.to_string();
    };

    if ModelFamily::detect(raw).is_some() {
        raw.to_string()
    } else {
        tracing::warn!(requested = raw, fallback = BASE_CHAT_MODEL, "unrecognized model id");
        BASE_CHAT_MODEL.to_string()
    }
}
