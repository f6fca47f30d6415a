//! Plan extractor
//!
//! Pipeline: pick a candidate with the first applicable strategy (falling
//! back to the whole text), isolate the object span, parse, then validate.
//! Nothing structurally invalid gets through.

use crate::error::ExtractionError;
use crate::strategy::{default_strategies, isolate_object, UnwrapStrategy};
use forge_plan::{AgentPlan, PlanDraft, PlanError};
use serde_json::Value;

/// Candidate text chosen for parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Cleaned text handed to the parser
    pub text: String,
    /// Strategy that produced it (`"whole_text"` when none applied)
    pub strategy: &'static str,
    /// Whether the object span was isolated from surrounding text
    pub brace_isolated: bool,
}

/// Recovers a validated plan from model output
pub struct PlanExtractor {
    strategies: Vec<Box<dyn UnwrapStrategy>>,
}

impl Default for PlanExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PlanExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlanExtractor")
            .field(
                "strategies",
                &self.strategies.iter().map(|s| s.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl PlanExtractor {
    /// Extractor with the default strategy order
    #[must_use]
    pub fn new() -> Self {
        Self {
            strategies: default_strategies(),
        }
    }

    /// Extractor with no fence strategies (whole text only)
    #[must_use]
    pub fn empty() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }

    /// Append a strategy; earlier strategies win
    #[must_use]
    pub fn with_strategy(mut self, strategy: impl UnwrapStrategy + 'static) -> Self {
        self.strategies.push(Box::new(strategy));
        self
    }

    /// Names of the configured strategies, in order
    #[must_use]
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Choose the text to parse
    #[must_use]
    pub fn candidate(&self, raw: &str) -> Candidate {
        let (unwrapped, strategy) = self
            .strategies
            .iter()
            .find_map(|s| s.apply(raw).map(|text| (text, s.name())))
            .unwrap_or_else(|| (raw.to_string(), "whole_text"));

        let (text, brace_isolated) = isolate_object(&unwrapped);
        tracing::debug!(strategy, brace_isolated, len = text.len(), "extraction candidate");
        Candidate {
            text,
            strategy,
            brace_isolated,
        }
    }

    /// Recover and validate a plan
    ///
    /// # Errors
    ///
    /// `MalformedJson` when the candidate is not JSON, `SchemaInvalid` when
    /// it is not an object or violates plan constraints.
    pub fn extract(&self, raw: &str) -> Result<AgentPlan, ExtractionError> {
        let candidate = self.candidate(raw);
        let result = parse_candidate(&candidate.text, raw);
        if let Err(err) = &result {
            tracing::warn!(
                kind = %err.kind(),
                strategy = candidate.strategy,
                raw_len = raw.len(),
                "plan extraction failed"
            );
        }
        result
    }
}

fn parse_candidate(text: &str, raw: &str) -> Result<AgentPlan, ExtractionError> {
    let value: Value = serde_json::from_str(text)
        .map_err(|err| ExtractionError::malformed(err.to_string(), text, raw))?;

    if !value.is_object() {
        return Err(ExtractionError::schema_invalid(
            format!("expected a JSON object, found {}", json_type(&value)),
            text,
            raw,
        ));
    }

    let draft: PlanDraft = serde_json::from_value(value)
        .map_err(|err| ExtractionError::schema_invalid(err.to_string(), text, raw))?;

    draft.validate().map_err(|err: PlanError| {
        ExtractionError::schema_invalid(err.to_string(), text, raw)
            .with_violations(err.violations().to_vec())
    })
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Extract with the default extractor
///
/// # Errors
///
/// See [`PlanExtractor::extract`].
pub fn extract(raw: &str) -> Result<AgentPlan, ExtractionError> {
    PlanExtractor::new().extract(raw)
}
