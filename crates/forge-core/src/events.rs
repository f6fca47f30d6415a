//! Typed progress events emitted to a [`SessionObserver`](crate::SessionObserver)

use crate::elicitation::CompletionReason;
use forge_plan::{AgentPlan, Variant};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// What the confirmation step shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanSummary {
    /// Display name
    pub name: String,
    /// Purpose
    pub role: String,
    /// Target model
    pub model: String,
    /// Complexity level
    pub level: u8,
    /// Requested tool names
    pub tools: Vec<String>,
    /// Memory requested
    pub memory: bool,
    /// Template that will be rendered
    pub kind: Variant,
}

impl From<&AgentPlan> for PlanSummary {
    fn from(plan: &AgentPlan) -> Self {
        Self {
            name: plan.name().to_string(),
            role: plan.role().to_string(),
            model: plan.model_id().to_string(),
            level: plan.complexity_level(),
            tools: plan.tools().to_vec(),
            memory: plan.needs_memory(),
            kind: plan.variant(),
        }
    }
}

impl fmt::Display for PlanSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tools = if self.tools.is_empty() {
            "none".to_string()
        } else {
            self.tools.join(", ")
        };
        writeln!(f, "Name: {}", self.name)?;
        writeln!(f, "Role: {}", self.role)?;
        writeln!(f, "Model: {}", self.model)?;
        writeln!(f, "Level: {}", self.level)?;
        writeln!(f, "Tools: {tools}")?;
        writeln!(f, "Memory: {}", if self.memory { "yes" } else { "no" })?;
        write!(f, "Kind: {}", self.kind)
    }
}

/// Progress of a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    /// Initial request accepted
    RequestReceived {
        /// Utterance text
        text: String,
    },
    /// Analyst consulted
    Analyzing {
        /// 1-based round
        iteration: usize,
    },
    /// Analyst asked for more detail
    Clarification {
        /// 1-based round
        iteration: usize,
        /// Question text
        question: String,
    },
    /// Dialogue finished
    ElicitationComplete {
        /// Why it stopped
        reason: CompletionReason,
        /// Rounds used
        iterations: usize,
    },
    /// Planner consulted
    Planning,
    /// Plan extracted and validated
    PlanReady(PlanSummary),
    /// Plan text could not be used
    ExtractionFailed {
        /// `MALFORMED_JSON` or `SCHEMA_INVALID`
        kind: String,
        /// Diagnostic
        detail: String,
    },
    /// Synthesis started
    Generating {
        /// Template
        variant: Variant,
    },
    /// Artifact persisted
    Saved {
        /// File name
        filename: String,
        /// Location
        path: PathBuf,
    },
    /// Caller declined the plan
    Declined,
    /// Empty initial request
    Aborted,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn summary_display() {
        let plan = AgentPlan::builder("Stock Watcher", "track stocks")
            .tools(["yfinance", "duckduckgo"])
            .complexity(3)
            .build()
            .unwrap();
        let summary = PlanSummary::from(&plan);
        assert_eq!(summary.kind, Variant::Memory);
        assert_eq!(
            summary.to_string(),
            "Name: Stock Watcher\nRole: track stocks\nModel: deepseek-chat\nLevel: 3\n\
             Tools: yfinance, duckduckgo\nMemory: no\nKind: memory"
        );
    }

    #[test]
    fn event_json_tag() {
        let json = serde_json::to_value(SessionEvent::Analyzing { iteration: 2 }).unwrap();
        assert_eq!(json, serde_json::json!({"event": "analyzing", "iteration": 2}));
    }
}
