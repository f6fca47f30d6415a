//! Testing utilities for the Agent Forge workspace
//!
//! Plan fixtures and scripted collaborators for driving sessions without a
//! model, a terminal or a disk.

#![allow(missing_docs)]

use forge_core::{
    Analyst, ArtifactStore, CollaboratorError, Confirmer, PlanSummary, Planner, SavedArtifact,
    SessionEvent, SessionObserver, StoreError, TurnProvider,
};
use forge_plan::{AgentPlan, TeamMember};
use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};
use std::path::PathBuf;

pub const DEMO_PLAN_JSON: &str = r#"{
  "name": "Demo Web Research Agent",
  "role": "search AI news",
  "tools": ["duckduckgo"],
  "complexity_level": 1,
  "needs_memory": false,
  "is_team": false
}"#;

pub const TEAM_PLAN_JSON: &str = r#"{
  "name": "Market Research Team",
  "role": "research markets",
  "is_team": true,
  "team_members": [
    {"name": "Scout", "role": "Find news", "tools": ["duckduckgo"]},
    {"name": "Quant", "role": "Crunch numbers", "tools": ["yfinance"]},
    {"name": "Editor", "role": "Write the report"}
  ]
}"#;

pub fn demo_plan() -> AgentPlan {
    AgentPlan::builder("Demo Web Research Agent", "search AI news")
        .tool("duckduckgo")
        .build()
        .unwrap()
}

pub fn memory_plan() -> AgentPlan {
    AgentPlan::builder("Demo Web Research Agent", "search AI news")
        .tool("duckduckgo")
        .needs_memory(true)
        .build()
        .unwrap()
}

pub fn team_plan() -> AgentPlan {
    AgentPlan::builder("Market Research Team", "research markets")
        .team(true)
        .member(TeamMember::new("Scout", "Find news").with_tools(["duckduckgo"]))
        .member(TeamMember::new("Quant", "Crunch numbers").with_tools(["yfinance"]))
        .member(TeamMember::new("Editor", "Write the report"))
        .build()
        .unwrap()
}

/// Wrap text the way chat models tend to
pub fn chatty_fence(json: &str) -> String {
    format!("Here you go:\n```json\n{json}\n```\nHope this helps!")
}

/// Analyst answering from a script; repeats its last answer when exhausted
#[derive(Debug, Default)]
pub struct ScriptedAnalyst {
    answers: RefCell<VecDeque<String>>,
    last: RefCell<String>,
    calls: RefCell<Vec<(String, String)>>,
}

impl ScriptedAnalyst {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: RefCell::new(answers.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    /// Analyst that never declares the request complete
    pub fn never_satisfied() -> Self {
        Self::new(["Could you tell me more?"])
    }

    /// `(transcript, latest)` pairs received so far
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.borrow().clone()
    }
}

impl Analyst for ScriptedAnalyst {
    fn analyze(&self, transcript: &str, latest: &str) -> Result<String, CollaboratorError> {
        self.calls
            .borrow_mut()
            .push((transcript.to_string(), latest.to_string()));
        if let Some(next) = self.answers.borrow_mut().pop_front() {
            *self.last.borrow_mut() = next;
        }
        Ok(self.last.borrow().clone())
    }
}

/// Planner returning fixed text
#[derive(Debug)]
pub struct ScriptedPlanner {
    reply: Result<String, String>,
    transcripts: RefCell<Vec<String>>,
}

impl ScriptedPlanner {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: Ok(reply.into()),
            transcripts: RefCell::new(Vec::new()),
        }
    }

    /// Planner whose transport always fails
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            reply: Err(message.into()),
            transcripts: RefCell::new(Vec::new()),
        }
    }

    pub fn transcripts(&self) -> Vec<String> {
        self.transcripts.borrow().clone()
    }
}

impl Planner for ScriptedPlanner {
    fn draft_plan(&self, transcript: &str) -> Result<String, CollaboratorError> {
        self.transcripts.borrow_mut().push(transcript.to_string());
        self.reply.clone().map_err(CollaboratorError::Transport)
    }
}

/// User turns from a script; answers empty once the script runs out
#[derive(Debug, Default)]
pub struct ScriptedTurns {
    initial: String,
    replies: VecDeque<String>,
    questions: Vec<String>,
}

impl ScriptedTurns {
    pub fn new<I, S>(initial: impl Into<String>, replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            initial: initial.into(),
            replies: replies.into_iter().map(Into::into).collect(),
            questions: Vec::new(),
        }
    }

    /// Questions asked so far
    pub fn questions(&self) -> &[String] {
        &self.questions
    }
}

impl TurnProvider for ScriptedTurns {
    fn initial_request(&mut self) -> Result<String, CollaboratorError> {
        Ok(self.initial.clone())
    }

    fn reply(&mut self, question: &str) -> Result<String, CollaboratorError> {
        self.questions.push(question.to_string());
        Ok(self.replies.pop_front().unwrap_or_default())
    }
}

/// Confirmer that always gives the same reply
#[derive(Debug)]
pub struct FixedConfirmer {
    reply: String,
    shown: Vec<PlanSummary>,
}

impl FixedConfirmer {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            shown: Vec::new(),
        }
    }

    pub fn yes() -> Self {
        Self::new("yes")
    }

    pub fn no() -> Self {
        Self::new("no")
    }

    /// Summaries presented for confirmation
    pub fn shown(&self) -> &[PlanSummary] {
        &self.shown
    }
}

impl Confirmer for FixedConfirmer {
    fn respond(&mut self, summary: &PlanSummary) -> Result<String, CollaboratorError> {
        self.shown.push(summary.clone());
        Ok(self.reply.clone())
    }
}

/// In-memory store; latest save per identifier wins
#[derive(Debug, Default)]
pub struct MemoryStore {
    files: RefCell<BTreeMap<String, String>>,
    saves: RefCell<usize>,
    fail_with: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store whose every save fails
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            fail_with: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn get(&self, identifier: &str) -> Option<String> {
        self.files.borrow().get(identifier).cloned()
    }

    pub fn len(&self) -> usize {
        self.files.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.borrow().is_empty()
    }

    /// Number of save calls, including overwrites
    pub fn save_count(&self) -> usize {
        *self.saves.borrow()
    }
}

impl ArtifactStore for MemoryStore {
    fn save(&self, identifier: &str, source: &str) -> Result<SavedArtifact, StoreError> {
        *self.saves.borrow_mut() += 1;
        let filename = forge_core::store::artifact_filename(identifier);
        let path = PathBuf::from("memory").join(&filename);
        if let Some(message) = &self.fail_with {
            return Err(StoreError::io(path, std::io::Error::other(message.clone())));
        }
        self.files
            .borrow_mut()
            .insert(identifier.to_string(), source.to_string());
        Ok(SavedArtifact { filename, path })
    }
}

/// Observer keeping every event
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: RefCell<Vec<SessionEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SessionEvent> {
        self.events.borrow().clone()
    }

    pub fn count(&self, predicate: impl Fn(&SessionEvent) -> bool) -> usize {
        self.events.borrow().iter().filter(|event| predicate(event)).count()
    }
}

impl SessionObserver for RecordingObserver {
    fn on_event(&self, event: &SessionEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}
