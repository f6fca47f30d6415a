//! OpenAI-compatible chat-completions collaborator
//!
//! Serves both the analyst and the planner. Blocking, one request per call,
//! no retries.

use forge_catalog::ToolCatalog;
use forge_core::prompts::{analysis_prompt, planning_prompt};
use forge_core::{Analyst, CollaboratorError, ForgeConfig, Planner};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::time::Duration;

const ANALYST_SYSTEM: &str = "You analyze user requests for building AI agents. \
Identify what information is missing, ask specific and contextual questions, \
and keep your questions concise and friendly.";

const PLANNER_SYSTEM: &str = "You create detailed agent plans in JSON. \
Follow the provided schema, infer reasonable values when they are not explicit, \
be specific about role, instructions and tools, and return ONLY the JSON.";

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Chat client configured for one endpoint
pub(crate) struct ChatClient {
    http: reqwest::blocking::Client,
    endpoint: String,
    api_key: String,
    analysis_model: String,
    planning_model: String,
    sentinel: String,
    catalog: Cow<'static, ToolCatalog>,
    temperature: f64,
}

impl ChatClient {
    /// Build from configuration; the API key is read from the configured
    /// environment variable
    pub(crate) fn from_config(config: &ForgeConfig) -> anyhow::Result<Self> {
        use anyhow::Context;

        let api_key = std::env::var(&config.llm.api_key_env).with_context(|| {
            format!("environment variable {} is not set", config.llm.api_key_env)
        })?;
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.llm.timeout_secs))
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            http,
            endpoint: completions_endpoint(&config.llm.base_url),
            api_key,
            analysis_model: config.llm.analysis_model.clone(),
            planning_model: config.llm.planning_model.clone(),
            sentinel: config.sentinel_token.clone(),
            catalog: config.catalog(),
            temperature: 0.3,
        })
    }

    fn complete(&self, model: &str, system: &str, user: &str) -> Result<String, CollaboratorError> {
        let request = ChatCompletionRequest {
            model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: Some(self.temperature),
        };

        tracing::debug!(model, prompt_len = user.len(), "chat completion request");
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .map_err(|err| CollaboratorError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            let message = format!("API error ({status}): {body}");
            return Err(if status.is_server_error() || status.as_u16() == 429 {
                CollaboratorError::Transport(message)
            } else {
                CollaboratorError::InvalidResponse(message)
            });
        }

        let completion: ChatCompletionResponse = response
            .json()
            .map_err(|err| CollaboratorError::InvalidResponse(err.to_string()))?;
        first_content(completion)
    }
}

fn completions_endpoint(base_url: &str) -> String {
    format!("{}/chat/completions", base_url.trim_end_matches('/'))
}

fn first_content(completion: ChatCompletionResponse) -> Result<String, CollaboratorError> {
    completion
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or_else(|| CollaboratorError::InvalidResponse("empty completion".to_string()))
}

impl Analyst for ChatClient {
    fn analyze(&self, transcript: &str, latest: &str) -> Result<String, CollaboratorError> {
        let prompt = analysis_prompt(transcript, latest, &self.sentinel);
        self.complete(&self.analysis_model, ANALYST_SYSTEM, &prompt)
    }
}

impl Planner for ChatClient {
    fn draft_plan(&self, transcript: &str) -> Result<String, CollaboratorError> {
        let prompt = planning_prompt(transcript, &self.catalog)
            .map_err(|err| CollaboratorError::InvalidResponse(err.to_string()))?;
        self.complete(&self.planning_model, PLANNER_SYSTEM, &prompt)
    }
}
