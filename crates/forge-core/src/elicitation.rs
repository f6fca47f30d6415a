//! Bounded clarification dialogue
//!
//! ```text
//! AwaitingInput ──► Analyzing ──► Clarifying ──► Analyzing ...
//!       │               │              │
//!       ▼               ▼              ▼
//!    Aborted         Complete       Complete
//! ```
//!
//! The loop asks the analyst at most `max_iterations` times. It completes
//! when the analyst's answer contains the sentinel anywhere, when the user
//! answers a question with nothing, or when the budget runs out.

use crate::collaborators::{Analyst, SessionObserver, TurnProvider};
use crate::config::{ForgeConfig, DEFAULT_MAX_ITERATIONS, DEFAULT_SENTINEL};
use crate::error::ForgeError;
use crate::events::SessionEvent;
use crate::transcript::Transcript;
use serde::Serialize;
use std::fmt;

/// Dialogue state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ElicitationState {
    /// Waiting for the initial request
    AwaitingInput,
    /// Analyst is judging the transcript
    Analyzing,
    /// Waiting for the user's answer to a question
    Clarifying,
    /// Transcript ready for planning
    Complete,
    /// Empty initial request
    Aborted,
}

impl ElicitationState {
    /// No further transitions
    #[inline]
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Complete | Self::Aborted)
    }
}

/// Illegal state change
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("illegal elicitation transition {from:?} -> {to:?}")]
pub struct TransitionError {
    /// Current state
    pub from: ElicitationState,
    /// Requested state
    pub to: ElicitationState,
}

/// States reachable from `from`
#[must_use]
pub fn allowed_transitions(from: ElicitationState) -> &'static [ElicitationState] {
    use ElicitationState::{Aborted, Analyzing, AwaitingInput, Clarifying, Complete};
    match from {
        AwaitingInput => &[Analyzing, Aborted],
        Analyzing => &[Clarifying, Complete],
        Clarifying => &[Analyzing, Complete],
        Complete | Aborted => &[],
    }
}

/// Check a state change
///
/// # Errors
/// [`TransitionError`] when `to` is not reachable from `from`
pub fn validate_transition(
    from: ElicitationState,
    to: ElicitationState,
) -> Result<(), TransitionError> {
    if allowed_transitions(from).contains(&to) {
        Ok(())
    } else {
        Err(TransitionError { from, to })
    }
}

/// Why the dialogue finished
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionReason {
    /// Analyst answered with the sentinel
    Sentinel,
    /// User answered a question with nothing
    UserProceeded,
    /// Iteration budget exhausted
    BudgetExhausted,
}

impl fmt::Display for CompletionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Sentinel => "information complete",
            Self::UserProceeded => "continuing with current information",
            Self::BudgetExhausted => "clarification budget exhausted",
        })
    }
}

/// Terminal result of a dialogue
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElicitationOutcome {
    /// Transcript ready for planning
    Complete {
        /// Accumulated dialogue
        transcript: Transcript,
        /// Why it stopped
        reason: CompletionReason,
        /// Analyst rounds used
        iterations: usize,
    },
    /// No initial request
    Aborted,
}

/// One clarification dialogue
#[derive(Debug, Clone)]
pub struct ElicitationLoop {
    max_iterations: usize,
    sentinel: String,
    state: ElicitationState,
}

impl Default for ElicitationLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl ElicitationLoop {
    /// Loop with the default budget and sentinel
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            sentinel: DEFAULT_SENTINEL.to_string(),
            state: ElicitationState::AwaitingInput,
        }
    }

    /// Loop configured from `config`
    #[must_use]
    pub fn from_config(config: &ForgeConfig) -> Self {
        Self::new()
            .with_max_iterations(config.max_iterations)
            .with_sentinel(config.sentinel_token.clone())
    }

    /// With budget (at least one round)
    #[inline]
    #[must_use]
    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max.max(1);
        self
    }

    /// With completion marker
    ///
    /// A blank marker would match every analysis, so it keeps
    /// [`DEFAULT_SENTINEL`] instead.
    #[inline]
    #[must_use]
    pub fn with_sentinel(mut self, sentinel: impl Into<String>) -> Self {
        let sentinel = sentinel.into();
        let sentinel = sentinel.trim();
        self.sentinel = if sentinel.is_empty() {
            tracing::warn!("blank sentinel ignored, keeping {DEFAULT_SENTINEL}");
            DEFAULT_SENTINEL.to_string()
        } else {
            sentinel.to_string()
        };
        self
    }

    /// Current state
    #[inline]
    #[must_use]
    pub fn state(&self) -> ElicitationState {
        self.state
    }

    /// Configured budget
    #[inline]
    #[must_use]
    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    fn advance(&mut self, to: ElicitationState) -> Result<(), TransitionError> {
        validate_transition(self.state, to)?;
        tracing::trace!(from = ?self.state, to = ?to, "elicitation transition");
        self.state = to;
        Ok(())
    }

    /// Drive the dialogue to a terminal state
    ///
    /// A loop runs once; calling `run` again fails with an illegal
    /// transition.
    ///
    /// # Errors
    /// Collaborator failures are returned as-is and end the dialogue
    pub fn run(
        &mut self,
        turns: &mut dyn TurnProvider,
        analyst: &dyn Analyst,
        observer: &dyn SessionObserver,
    ) -> Result<ElicitationOutcome, ForgeError> {
        if self.state != ElicitationState::AwaitingInput {
            return Err(TransitionError {
                from: self.state,
                to: ElicitationState::Analyzing,
            }
            .into());
        }

        let initial = turns.initial_request()?;
        let initial = initial.trim();
        if initial.is_empty() {
            self.advance(ElicitationState::Aborted)?;
            tracing::info!("empty initial request, aborting");
            observer.on_event(&SessionEvent::Aborted);
            return Ok(ElicitationOutcome::Aborted);
        }
        observer.on_event(&SessionEvent::RequestReceived {
            text: initial.to_string(),
        });

        let mut transcript = Transcript::new(initial);
        let mut latest = initial.to_string();

        for iteration in 1..=self.max_iterations {
            self.advance(ElicitationState::Analyzing)?;
            observer.on_event(&SessionEvent::Analyzing { iteration });

            let analysis = analyst.analyze(transcript.as_str(), &latest)?;
            if analysis.contains(self.sentinel.as_str()) {
                return self.complete(transcript, CompletionReason::Sentinel, iteration, observer);
            }

            self.advance(ElicitationState::Clarifying)?;
            observer.on_event(&SessionEvent::Clarification {
                iteration,
                question: analysis.clone(),
            });

            let reply = turns.reply(&analysis)?;
            let reply = reply.trim();
            if reply.is_empty() {
                return self.complete(transcript, CompletionReason::UserProceeded, iteration, observer);
            }
            transcript.push_exchange(&analysis, reply);
            latest = reply.to_string();
        }

        let iterations = self.max_iterations;
        self.complete(transcript, CompletionReason::BudgetExhausted, iterations, observer)
    }

    fn complete(
        &mut self,
        transcript: Transcript,
        reason: CompletionReason,
        iterations: usize,
        observer: &dyn SessionObserver,
    ) -> Result<ElicitationOutcome, ForgeError> {
        self.advance(ElicitationState::Complete)?;
        tracing::debug!(%reason, iterations, exchanges = transcript.exchanges(), "elicitation complete");
        observer.on_event(&SessionEvent::ElicitationComplete { reason, iterations });
        Ok(ElicitationOutcome::Complete {
            transcript,
            reason,
            iterations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::{MockAnalyst, MockTurnProvider, NullObserver};
    use mockall::predicate::eq;
    use mockall::Sequence;

    fn turns(initial: &'static str, replies: Vec<&'static str>) -> MockTurnProvider {
        let mut turns = MockTurnProvider::new();
        turns
            .expect_initial_request()
            .times(1)
            .returning(move || Ok(initial.to_string()));
        let mut replies = replies.into_iter();
        turns
            .expect_reply()
            .returning(move |_| Ok(replies.next().unwrap_or_default().to_string()));
        turns
    }

    #[test]
    fn transitions_table() {
        use ElicitationState::*;
        assert!(validate_transition(AwaitingInput, Analyzing).is_ok());
        assert!(validate_transition(Clarifying, Analyzing).is_ok());
        assert!(validate_transition(AwaitingInput, Complete).is_err());
        assert!(validate_transition(Complete, Analyzing).is_err());
        assert!(allowed_transitions(Aborted).is_empty());
        assert!(Complete.is_terminal());
        assert!(!Clarifying.is_terminal());
    }

    #[test]
    fn empty_initial_request_aborts() {
        let mut turns = turns("   ", vec![]);
        let mut analyst = MockAnalyst::new();
        analyst.expect_analyze().never();

        let mut dialogue = ElicitationLoop::new();
        let outcome = dialogue.run(&mut turns, &analyst, &NullObserver).unwrap();
        assert_eq!(outcome, ElicitationOutcome::Aborted);
        assert_eq!(dialogue.state(), ElicitationState::Aborted);
    }

    #[test]
    fn sentinel_anywhere_completes() {
        let mut turns = turns("news agent", vec![]);
        let mut analyst = MockAnalyst::new();
        analyst
            .expect_analyze()
            .with(eq("User: news agent"), eq("news agent"))
            .times(1)
            .returning(|_, _| Ok("Great, INFO_COMPLETE, thanks".to_string()));

        let outcome = ElicitationLoop::new()
            .run(&mut turns, &analyst, &NullObserver)
            .unwrap();
        match outcome {
            ElicitationOutcome::Complete {
                transcript,
                reason,
                iterations,
            } => {
                assert_eq!(reason, CompletionReason::Sentinel);
                assert_eq!(iterations, 1);
                assert_eq!(transcript.as_str(), "User: news agent");
            }
            ElicitationOutcome::Aborted => panic!("expected completion"),
        }
    }

    #[test]
    fn empty_reply_proceeds() {
        let mut turns = turns("agent", vec![""]);
        let mut analyst = MockAnalyst::new();
        analyst
            .expect_analyze()
            .times(1)
            .returning(|_, _| Ok("Which tools?".to_string()));

        let outcome = ElicitationLoop::new()
            .run(&mut turns, &analyst, &NullObserver)
            .unwrap();
        let ElicitationOutcome::Complete {
            transcript, reason, ..
        } = outcome
        else {
            panic!("expected completion");
        };
        assert_eq!(reason, CompletionReason::UserProceeded);
        assert_eq!(transcript.exchanges(), 0);
    }

    #[test]
    fn latest_reply_is_passed_along() {
        let mut turns = turns("agent", vec!["web search"]);
        let mut analyst = MockAnalyst::new();
        let mut seq = Sequence::new();
        analyst
            .expect_analyze()
            .with(eq("User: agent"), eq("agent"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok("Which tools?".to_string()));
        analyst
            .expect_analyze()
            .with(
                eq("User: agent\n\nAssistant: Which tools?\nUser: web search"),
                eq("web search"),
            )
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok("INFO_COMPLETE".to_string()));

        let outcome = ElicitationLoop::new()
            .run(&mut turns, &analyst, &NullObserver)
            .unwrap();
        assert!(matches!(
            outcome,
            ElicitationOutcome::Complete {
                reason: CompletionReason::Sentinel,
                iterations: 2,
                ..
            }
        ));
    }

    #[test]
    fn budget_bounds_analyst_calls() {
        let mut turns = turns("agent", vec!["a", "b", "c"]);
        let mut analyst = MockAnalyst::new();
        analyst
            .expect_analyze()
            .times(3)
            .returning(|_, _| Ok("More?".to_string()));

        let mut dialogue = ElicitationLoop::new().with_max_iterations(3);
        let outcome = dialogue.run(&mut turns, &analyst, &NullObserver).unwrap();
        assert!(matches!(
            outcome,
            ElicitationOutcome::Complete {
                reason: CompletionReason::BudgetExhausted,
                iterations: 3,
                ..
            }
        ));
        assert_eq!(dialogue.state(), ElicitationState::Complete);
    }

    #[test]
    fn analyst_failure_propagates() {
        let mut turns = turns("agent", vec![]);
        let mut analyst = MockAnalyst::new();
        analyst
            .expect_analyze()
            .returning(|_, _| Err(crate::CollaboratorError::Transport("down".into())));

        let err = ElicitationLoop::new()
            .run(&mut turns, &analyst, &NullObserver)
            .unwrap_err();
        assert_eq!(err.kind(), "collaborator");
    }

    #[test]
    fn second_run_is_rejected() {
        let mut turns = turns("", vec![]);
        let analyst = MockAnalyst::new();
        let mut dialogue = ElicitationLoop::new();
        dialogue.run(&mut turns, &analyst, &NullObserver).unwrap();
        let err = dialogue.run(&mut turns, &analyst, &NullObserver).unwrap_err();
        assert_eq!(err.kind(), "illegal_transition");
    }

    #[test]
    fn blank_sentinel_keeps_default() {
        let mut turns = turns("news agent", vec!["web"]);
        let mut analyst = MockAnalyst::new();
        let mut answers = vec!["Which tools?", "INFO_COMPLETE"].into_iter();
        analyst
            .expect_analyze()
            .times(2)
            .returning(move |_, _| Ok(answers.next().unwrap_or_default().to_string()));

        let outcome = ElicitationLoop::new()
            .with_sentinel("  ")
            .run(&mut turns, &analyst, &NullObserver)
            .unwrap();
        match outcome {
            ElicitationOutcome::Complete {
                reason, iterations, ..
            } => {
                assert_eq!(reason, CompletionReason::Sentinel);
                assert_eq!(iterations, 2);
            }
            ElicitationOutcome::Aborted => panic!("expected completion"),
        }
    }

    #[test]
    fn zero_budget_is_clamped() {
        assert_eq!(ElicitationLoop::new().with_max_iterations(0).max_iterations(), 1);
    }
}
