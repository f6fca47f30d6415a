//! Contracts with the collaborators the pipeline drives
//!
//! The core never performs network or terminal I/O itself. Model calls,
//! user turns, confirmation, persistence and progress display are all
//! injected through these traits.

use crate::error::{CollaboratorError, StoreError};
use crate::events::{PlanSummary, SessionEvent};
use std::path::PathBuf;

/// Judges whether a request is fully specified
#[cfg_attr(test, mockall::automock)]
pub trait Analyst {
    /// Return the sentinel token or a clarifying question
    ///
    /// # Errors
    /// Any failure is fatal for the current turn; the core does not retry
    fn analyze(&self, transcript: &str, latest: &str) -> Result<String, CollaboratorError>;
}

/// Turns a finished transcript into plan text
#[cfg_attr(test, mockall::automock)]
pub trait Planner {
    /// Raw model output expected to contain a plan JSON object
    ///
    /// # Errors
    /// Transport or response failures
    fn draft_plan(&self, transcript: &str) -> Result<String, CollaboratorError>;
}

/// Source of user utterances
#[cfg_attr(test, mockall::automock)]
pub trait TurnProvider {
    /// First description of the wanted agent
    ///
    /// # Errors
    /// Input failures
    fn initial_request(&mut self) -> Result<String, CollaboratorError>;

    /// Answer to a clarifying question; empty means "proceed"
    ///
    /// # Errors
    /// Input failures
    fn reply(&mut self, question: &str) -> Result<String, CollaboratorError>;
}

/// Asks the caller to approve a plan
#[cfg_attr(test, mockall::automock)]
pub trait Confirmer {
    /// Raw reply to the confirmation prompt
    ///
    /// # Errors
    /// Input failures
    fn respond(&mut self, summary: &PlanSummary) -> Result<String, CollaboratorError>;
}

/// Where a persisted artifact landed
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct SavedArtifact {
    /// File name inside the store
    pub filename: String,
    /// Full location
    pub path: PathBuf,
}

/// Persists generated source
///
/// Saving the same identifier twice keeps only the latest source.
#[cfg_attr(test, mockall::automock)]
pub trait ArtifactStore {
    /// Write `source` under `identifier`
    ///
    /// # Errors
    /// Any persistence failure, reported verbatim
    fn save(&self, identifier: &str, source: &str) -> Result<SavedArtifact, StoreError>;
}

/// Receives progress of a session
#[cfg_attr(test, mockall::automock)]
pub trait SessionObserver {
    /// Called once per event, in order
    fn on_event(&self, event: &SessionEvent);
}

/// Observer that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl SessionObserver for NullObserver {
    fn on_event(&self, _event: &SessionEvent) {}
}

/// Whether `input` is one of the affirmative `tokens`
///
/// Case-insensitive after trimming. Anything else, including an empty
/// reply, declines.
#[must_use]
pub fn is_affirmative<S: AsRef<str>>(input: &str, tokens: &[S]) -> bool {
    let answer = input.trim().to_lowercase();
    !answer.is_empty() && tokens.iter().any(|token| token.as_ref().to_lowercase() == answer)
}
