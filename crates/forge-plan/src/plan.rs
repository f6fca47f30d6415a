//! Agent plan record
//!
//! Two shapes of the same record:
//! - [`PlanDraft`]: loosely typed, every field defaulted, what model output
//!   and callers deserialize into
//! - [`AgentPlan`]: validated and immutable, the only shape the synthesizer
//!   accepts
//!
//! The only mutation ever applied to a validated plan is the team model
//! promotion in [`AgentPlan::with_team_model_promotion`], which returns a new
//! value instead of touching the original.

use crate::error::{FieldViolation, PlanError};
use crate::identifier::sanitize_identifier;
use crate::model::{normalize_model_id, ModelFamily, BASE_CHAT_MODEL, REASONING_MODEL};
use schemars::JsonSchema;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Lowest complexity level
pub const MIN_COMPLEXITY: u8 = 1;

/// Highest complexity level
pub const MAX_COMPLEXITY: u8 = 5;

/// Complexity level from which persistent memory is implied
pub const MEMORY_COMPLEXITY_THRESHOLD: u8 = 3;

/// Member of an agent team
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct TeamMember {
    /// Display name of the member
    pub name: String,
    /// What the member is responsible for
    pub role: String,
    /// Tool names the member can use
    pub tools: Vec<String>,
}

impl TeamMember {
    /// Create new member
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: role.into(),
            tools: Vec::new(),
        }
    }

    /// With tools
    #[inline]
    #[must_use]
    pub fn with_tools<I, S>(mut self, tools: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tools = tools.into_iter().map(Into::into).collect();
        self
    }
}

/// Unvalidated plan as produced by a planner or a caller
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct PlanDraft {
    /// Descriptive name of the agent, e.g. "Tech News Finder"
    pub name: String,
    /// Clear description of what the agent does
    pub role: String,
    /// Language model to target ("deepseek-chat", "claude-sonnet-4", "gpt-4o", "gemini-2.0-flash-exp")
    #[serde(alias = "model")]
    pub model_id: Option<String>,
    /// Complexity level: 1=basic, 2=knowledge, 3=memory, 4=team, 5=workflow
    #[serde(alias = "level", deserialize_with = "lenient_level")]
    #[schemars(with = "Option<i64>")]
    pub complexity_level: Option<i64>,
    /// Tool names, e.g. ["duckduckgo", "yfinance", "reasoning"]
    pub tools: Vec<String>,
    /// Specific instructions for the agent
    pub instructions: Vec<String>,
    /// Whether the agent must remember previous conversations
    pub needs_memory: bool,
    /// Whether this is a team of collaborating agents
    pub is_team: bool,
    /// Team members when `is_team` is true
    pub team_members: Vec<TeamMember>,
    /// Example question or task for the agent
    #[serde(alias = "example")]
    pub usage_example: String,
}

/// Accept `3`, `3.0` and `"3"` as the same level; reject fractional values
fn lenient_level<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Level {
        Int(i64),
        Float(f64),
        Text(String),
    }

    #[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
    fn integral(value: f64) -> Option<i64> {
        (value.is_finite() && value.fract() == 0.0).then(|| value as i64)
    }

    let Some(level) = Option::<Level>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let parsed = match &level {
        Level::Int(n) => Some(*n),
        Level::Float(f) => integral(*f),
        Level::Text(text) => {
            let text = text.trim();
            text.parse::<i64>()
                .ok()
                .or_else(|| text.parse::<f64>().ok().and_then(integral))
        }
    };
    parsed.map(Some).ok_or_else(|| {
        let shown = match level {
            Level::Int(n) => n.to_string(),
            Level::Float(f) => f.to_string(),
            Level::Text(text) => format!("{text:?}"),
        };
        D::Error::custom(format!("complexity_level must be a whole number, got {shown}"))
    })
}

impl PlanDraft {
    /// Validate into an immutable plan
    ///
    /// # Errors
    /// `PlanError::Invalid` listing every violated field
    pub fn validate(self) -> Result<AgentPlan, PlanError> {
        let mut violations = Vec::new();

        let name = self.name.trim().to_string();
        if name.is_empty() {
            violations.push(FieldViolation::new("name", "must not be empty"));
        }

        let role = self.role.trim().to_string();
        if role.is_empty() {
            violations.push(FieldViolation::new("role", "must not be empty"));
        }

        let complexity_level = match self.complexity_level {
            None => MIN_COMPLEXITY,
            Some(level) => match u8::try_from(level) {
                Ok(level) if (MIN_COMPLEXITY..=MAX_COMPLEXITY).contains(&level) => level,
                _ => {
                    violations.push(FieldViolation::new(
                        "complexity_level",
                        format!("must be between {MIN_COMPLEXITY} and {MAX_COMPLEXITY}, got {level}"),
                    ));
                    MIN_COMPLEXITY
                }
            },
        };

        if !violations.is_empty() {
            return Err(PlanError::Invalid(violations));
        }

        Ok(AgentPlan {
            name,
            role,
            model_id: normalize_model_id(self.model_id.as_deref()),
            complexity_level,
            tools: self.tools,
            instructions: self.instructions,
            needs_memory: self.needs_memory,
            is_team: self.is_team,
            team_members: self.team_members,
            usage_example: self.usage_example,
        })
    }
}

/// Code variant a plan renders to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Single agent, no persistence
    Basic,
    /// Single agent with persistent memory store
    Memory,
    /// Coordinated team of agents
    Team,
}

impl Variant {
    /// Select variant; team takes precedence over memory
    #[inline]
    #[must_use]
    pub fn select(is_team: bool, needs_memory: bool, complexity_level: u8) -> Self {
        if is_team {
            Self::Team
        } else if needs_memory || complexity_level >= MEMORY_COMPLEXITY_THRESHOLD {
            Self::Memory
        } else {
            Self::Basic
        }
    }

    /// Stable lowercase name
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Memory => "memory",
            Self::Team => "team",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated agent plan
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "PlanDraft")]
pub struct AgentPlan {
    name: String,
    role: String,
    model_id: String,
    complexity_level: u8,
    tools: Vec<String>,
    instructions: Vec<String>,
    needs_memory: bool,
    is_team: bool,
    team_members: Vec<TeamMember>,
    usage_example: String,
}

impl TryFrom<PlanDraft> for AgentPlan {
    type Error = PlanError;

    fn try_from(draft: PlanDraft) -> Result<Self, Self::Error> {
        draft.validate()
    }
}

impl AgentPlan {
    /// Start building a plan programmatically
    #[inline]
    #[must_use]
    pub fn builder(name: impl Into<String>, role: impl Into<String>) -> PlanBuilder {
        PlanBuilder::new(name, role)
    }

    /// Decode and validate a JSON plan document
    ///
    /// # Errors
    /// `PlanError::Malformed` for undecodable text, `PlanError::Invalid` for
    /// constraint violations
    pub fn from_json_str(json: &str) -> Result<Self, PlanError> {
        let draft: PlanDraft = serde_json::from_str(json)?;
        draft.validate()
    }

    /// Display name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Purpose description
    #[inline]
    #[must_use]
    pub fn role(&self) -> &str {
        &self.role
    }

    /// Target model id
    #[inline]
    #[must_use]
    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    /// Model family of [`Self::model_id`]
    #[inline]
    #[must_use]
    pub fn model_family(&self) -> ModelFamily {
        ModelFamily::detect(&self.model_id).unwrap_or(ModelFamily::DeepSeek)
    }

    /// Complexity level in `[1, 5]`
    #[inline]
    #[must_use]
    pub fn complexity_level(&self) -> u8 {
        self.complexity_level
    }

    /// Requested tool names, verbatim and in order
    #[inline]
    #[must_use]
    pub fn tools(&self) -> &[String] {
        &self.tools
    }

    /// Directives for the agent (may be empty)
    #[inline]
    #[must_use]
    pub fn instructions(&self) -> &[String] {
        &self.instructions
    }

    /// Memory flag
    #[inline]
    #[must_use]
    pub fn needs_memory(&self) -> bool {
        self.needs_memory
    }

    /// Team flag
    #[inline]
    #[must_use]
    pub fn is_team(&self) -> bool {
        self.is_team
    }

    /// Team members (may be empty)
    #[inline]
    #[must_use]
    pub fn team_members(&self) -> &[TeamMember] {
        &self.team_members
    }

    /// Illustrative question or task
    #[inline]
    #[must_use]
    pub fn usage_example(&self) -> &str {
        &self.usage_example
    }

    /// Variant this plan renders to
    #[inline]
    #[must_use]
    pub fn variant(&self) -> Variant {
        Variant::select(self.is_team, self.needs_memory, self.complexity_level)
    }

    /// Filesystem-safe identifier derived from the name
    #[inline]
    #[must_use]
    pub fn identifier(&self) -> String {
        sanitize_identifier(&self.name)
    }

    /// Plan as rendered for a team
    ///
    /// Teams targeting the base chat model are promoted to the reasoning
    /// model. Every other plan is returned unchanged.
    #[must_use]
    pub fn with_team_model_promotion(&self) -> Self {
        let mut effective = self.clone();
        if self.is_team && self.model_id == BASE_CHAT_MODEL {
            tracing::debug!(
                from = BASE_CHAT_MODEL,
                to = REASONING_MODEL,
                "promoting team model"
            );
            effective.model_id = REASONING_MODEL.to_string();
        }
        effective
    }

    /// Convert back into an editable draft
    #[must_use]
    pub fn into_draft(self) -> PlanDraft {
        PlanDraft {
            name: self.name,
            role: self.role,
            model_id: Some(self.model_id),
            complexity_level: Some(i64::from(self.complexity_level)),
            tools: self.tools,
            instructions: self.instructions,
            needs_memory: self.needs_memory,
            is_team: self.is_team,
            team_members: self.team_members,
            usage_example: self.usage_example,
        }
    }
}

/// Builder for programmatic plans
///
/// Complexity is clamped into range here; everything else is checked by
/// [`PlanBuilder::build`].
#[derive(Debug, Clone)]
pub struct PlanBuilder {
    draft: PlanDraft,
}

impl PlanBuilder {
    /// Create builder with required fields
    #[must_use]
    pub fn new(name: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            draft: PlanDraft {
                name: name.into(),
                role: role.into(),
                ..PlanDraft::default()
            },
        }
    }

    /// With model id
    #[inline]
    #[must_use]
    pub fn model(mut self, model_id: impl Into<String>) -> Self {
        self.draft.model_id = Some(model_id.into());
        self
    }

    /// With complexity level (clamped to `[1, 5]`)
    #[inline]
    #[must_use]
    pub fn complexity(mut self, level: u8) -> Self {
        let clamped = level.clamp(MIN_COMPLEXITY, MAX_COMPLEXITY);
        self.draft.complexity_level = Some(i64::from(clamped));
        self
    }

    /// Add a tool name
    #[inline]
    #[must_use]
    pub fn tool(mut self, tool: impl Into<String>) -> Self {
        self.draft.tools.push(tool.into());
        self
    }

    /// Replace tool names
    #[must_use]
    pub fn tools<I, S>(mut self, tools: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.draft.tools = tools.into_iter().map(Into::into).collect();
        self
    }

    /// Add an instruction
    #[inline]
    #[must_use]
    pub fn instruction(mut self, instruction: impl Into<String>) -> Self {
        self.draft.instructions.push(instruction.into());
        self
    }

    /// Replace instructions
    #[must_use]
    pub fn instructions<I, S>(mut self, instructions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.draft.instructions = instructions.into_iter().map(Into::into).collect();
        self
    }

    /// With memory flag
    #[inline]
    #[must_use]
    pub fn needs_memory(mut self, needs_memory: bool) -> Self {
        self.draft.needs_memory = needs_memory;
        self
    }

    /// With team flag
    #[inline]
    #[must_use]
    pub fn team(mut self, is_team: bool) -> Self {
        self.draft.is_team = is_team;
        self
    }

    /// Add a team member
    #[inline]
    #[must_use]
    pub fn member(mut self, member: TeamMember) -> Self {
        self.draft.team_members.push(member);
        self
    }

    /// Replace team members
    #[must_use]
    pub fn members<I>(mut self, members: I) -> Self
    where
        I: IntoIterator<Item = TeamMember>,
    {
        self.draft.team_members = members.into_iter().collect();
        self
    }

    /// With usage example
    #[inline]
    #[must_use]
    pub fn usage_example(mut self, example: impl Into<String>) -> Self {
        self.draft.usage_example = example.into();
        self
    }

    /// Validate and build
    ///
    /// # Errors
    /// `PlanError::Invalid` when name or role is blank
    pub fn build(self) -> Result<AgentPlan, PlanError> {
        self.draft.validate()
    }
}

/// JSON schema of the plan document, for planner prompts
///
/// # Errors
/// Only if the schema cannot be serialized
pub fn plan_json_schema() -> Result<String, serde_json::Error> {
    let schema = schemars::schema_for!(PlanDraft);
    serde_json::to_string_pretty(&schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn demo() -> PlanBuilder {
        AgentPlan::builder("Demo Web Research Agent", "search AI news").tool("duckduckgo")
    }

    #[test]
    fn builder_defaults() {
        let plan = demo().build().unwrap();
        assert_eq!(plan.model_id(), BASE_CHAT_MODEL);
        assert_eq!(plan.complexity_level(), 1);
        assert_eq!(plan.tools(), &["duckduckgo".to_string()]);
        assert!(plan.instructions().is_empty());
        assert_eq!(plan.variant(), Variant::Basic);
        assert_eq!(plan.identifier(), "demo_web_research_agent");
    }

    #[test]
    fn builder_clamps_complexity() {
        assert_eq!(demo().complexity(0).build().unwrap().complexity_level(), 1);
        assert_eq!(demo().complexity(9).build().unwrap().complexity_level(), 5);
    }

    #[test]
    fn blank_name_and_role_rejected() {
        let err = AgentPlan::builder("  ", "").build().unwrap_err();
        assert!(err.has_violation("name"));
        assert!(err.has_violation("role"));
    }

    #[test]
    fn out_of_range_complexity_rejected_in_draft() {
        let draft = PlanDraft {
            name: "x".into(),
            role: "y".into(),
            complexity_level: Some(7),
            ..PlanDraft::default()
        };
        let err = draft.validate().unwrap_err();
        assert!(err.has_violation("complexity_level"));
    }

    #[test]
    fn whole_number_levels_are_coerced() {
        for raw in [
            r#"{"name": "x", "role": "y", "complexity_level": 3.0}"#,
            r#"{"name": "x", "role": "y", "complexity_level": "3"}"#,
            r#"{"name": "x", "role": "y", "level": " 3 "}"#,
        ] {
            let draft: PlanDraft = serde_json::from_str(raw).unwrap();
            assert_eq!(draft.complexity_level, Some(3), "{raw}");
        }
        let draft: PlanDraft =
            serde_json::from_str(r#"{"name": "x", "role": "y", "complexity_level": null}"#).unwrap();
        assert_eq!(draft.complexity_level, None);
    }

    #[test]
    fn fractional_levels_are_rejected() {
        for raw in [
            r#"{"name": "x", "role": "y", "complexity_level": 2.5}"#,
            r#"{"name": "x", "role": "y", "complexity_level": "two"}"#,
        ] {
            assert!(serde_json::from_str::<PlanDraft>(raw).is_err(), "{raw}");
        }
    }

    #[test]
    fn variant_precedence() {
        assert_eq!(Variant::select(true, true, 5), Variant::Team);
        assert_eq!(Variant::select(false, true, 1), Variant::Memory);
        assert_eq!(Variant::select(false, false, 3), Variant::Memory);
        assert_eq!(Variant::select(false, false, 2), Variant::Basic);
    }

    #[test]
    fn team_promotion_only_for_base_model() {
        let team = demo().team(true).build().unwrap();
        let promoted = team.with_team_model_promotion();
        assert_eq!(promoted.model_id(), REASONING_MODEL);
        assert_eq!(team.model_id(), BASE_CHAT_MODEL);

        let gpt_team = demo().team(true).model("gpt-4o").build().unwrap();
        assert_eq!(gpt_team.with_team_model_promotion().model_id(), "gpt-4o");

        let single = demo().build().unwrap();
        assert_eq!(single.with_team_model_promotion(), single);
    }

    #[test]
    fn json_roundtrip_through_validation() {
        let json = r#"{
            "name": "Finance Bot",
            "role": "track stocks",
            "model": "gpt-4o",
            "level": 2,
            "tools": ["yfinance"],
            "team_members": [{"name": "Analyst"}]
        }"#;
        let plan = AgentPlan::from_json_str(json).unwrap();
        assert_eq!(plan.model_id(), "gpt-4o");
        assert_eq!(plan.complexity_level(), 2);
        assert_eq!(plan.team_members()[0].role, "");

        let encoded = serde_json::to_string(&plan).unwrap();
        let decoded: AgentPlan = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, plan);
    }

    #[test]
    fn deserialize_rejects_invalid_plan() {
        let result: Result<AgentPlan, _> = serde_json::from_str(r#"{"name": "", "role": "r"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn into_draft_revalidates_to_same_plan() {
        let plan = demo().complexity(4).needs_memory(true).build().unwrap();
        assert_eq!(plan.clone().into_draft().validate().unwrap(), plan);
    }

    #[test]
    fn schema_mentions_fields() {
        let schema = plan_json_schema().unwrap();
        for field in ["name", "role", "model_id", "complexity_level", "team_members"] {
            assert!(schema.contains(field), "schema missing {field}");
        }
    }
}
