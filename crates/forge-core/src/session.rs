//! End-to-end session: dialogue, plan, confirmation, generation
//!
//! ```text
//! ElicitationLoop ─► Planner ─► PlanExtractor ─► Confirmer ─► CodeSynthesizer ─► ArtifactStore
//! ```
//!
//! Each stage runs only if the previous one succeeded. A plan that fails
//! extraction never reaches the synthesizer, and nothing is written unless
//! the caller confirms.

use crate::collaborators::{
    is_affirmative, Analyst, ArtifactStore, Confirmer, NullObserver, Planner, SessionObserver,
    TurnProvider,
};
use crate::config::ForgeConfig;
use crate::elicitation::{ElicitationLoop, ElicitationOutcome};
use crate::error::ForgeError;
use crate::events::{PlanSummary, SessionEvent};
use crate::generate::{generate, GenerationReport};
use forge_extract::PlanExtractor;
use forge_plan::AgentPlan;
use forge_synth::CodeSynthesizer;

/// How a session ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Source rendered and persisted
    Generated(Box<GenerationReport>),
    /// Plan built but the caller said no
    Declined(AgentPlan),
    /// No initial request
    Aborted,
}

impl SessionOutcome {
    /// Report, when generation happened
    #[must_use]
    pub fn report(&self) -> Option<&GenerationReport> {
        match self {
            Self::Generated(report) => Some(report),
            Self::Declined(_) | Self::Aborted => None,
        }
    }
}

/// Wires the collaborators of one generation session
pub struct ForgeSession<'a> {
    config: ForgeConfig,
    analyst: &'a dyn Analyst,
    planner: &'a dyn Planner,
    store: &'a dyn ArtifactStore,
    observer: &'a dyn SessionObserver,
    extractor: PlanExtractor,
}

impl std::fmt::Debug for ForgeSession<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForgeSession")
            .field("config", &self.config)
            .field("extractor", &self.extractor)
            .finish_non_exhaustive()
    }
}

impl<'a> ForgeSession<'a> {
    /// Session with the default extractor and no observer
    #[must_use]
    pub fn new(
        config: ForgeConfig,
        analyst: &'a dyn Analyst,
        planner: &'a dyn Planner,
        store: &'a dyn ArtifactStore,
    ) -> Self {
        Self {
            config,
            analyst,
            planner,
            store,
            observer: &NullObserver,
            extractor: PlanExtractor::new(),
        }
    }

    /// With progress observer
    #[inline]
    #[must_use]
    pub fn with_observer(mut self, observer: &'a dyn SessionObserver) -> Self {
        self.observer = observer;
        self
    }

    /// With custom extraction strategies
    #[inline]
    #[must_use]
    pub fn with_extractor(mut self, extractor: PlanExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    /// Configuration in use
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ForgeConfig {
        &self.config
    }

    /// Run one session to completion
    ///
    /// # Errors
    /// Collaborator, extraction and persistence failures, verbatim. A
    /// declined plan or an empty request is an outcome, not an error.
    pub fn run(
        &self,
        turns: &mut dyn TurnProvider,
        confirmer: &mut dyn Confirmer,
    ) -> Result<SessionOutcome, ForgeError> {
        let mut dialogue = ElicitationLoop::from_config(&self.config);
        let transcript = match dialogue.run(turns, self.analyst, self.observer)? {
            ElicitationOutcome::Complete { transcript, .. } => transcript,
            ElicitationOutcome::Aborted => return Ok(SessionOutcome::Aborted),
        };

        let plan = self.plan(transcript.as_str())?;

        let summary = PlanSummary::from(&plan);
        self.observer.on_event(&SessionEvent::PlanReady(summary.clone()));
        let reply = confirmer.respond(&summary)?;
        if !is_affirmative(&reply, &self.config.affirmative_tokens) {
            tracing::info!(name = plan.name(), "generation declined");
            self.observer.on_event(&SessionEvent::Declined);
            return Ok(SessionOutcome::Declined(plan));
        }

        let report = self.generate(&plan)?;
        Ok(SessionOutcome::Generated(Box::new(report)))
    }

    /// Ask the planner for a plan and extract it
    ///
    /// # Errors
    /// Planner failures and [`ForgeError::Extraction`]
    pub fn plan(&self, transcript: &str) -> Result<AgentPlan, ForgeError> {
        self.observer.on_event(&SessionEvent::Planning);
        let raw = self.planner.draft_plan(transcript)?;

        match self.extractor.extract(&raw) {
            Ok(plan) => Ok(plan),
            Err(err) => {
                tracing::warn!(
                    kind = %err.kind(),
                    raw_len = raw.len(),
                    "planner output rejected"
                );
                self.observer.on_event(&SessionEvent::ExtractionFailed {
                    kind: err.kind().as_str().to_string(),
                    detail: err.detail().to_string(),
                });
                Err(err.into())
            }
        }
    }

    /// Render and persist an approved plan
    ///
    /// # Errors
    /// Malformed output or store failures
    pub fn generate(&self, plan: &AgentPlan) -> Result<GenerationReport, ForgeError> {
        let catalog = self.config.catalog();
        let synthesizer =
            CodeSynthesizer::with_catalog(&catalog).with_options(self.config.synthesis_options());

        self.observer.on_event(&SessionEvent::Generating {
            variant: plan.variant(),
        });
        let report = generate(plan, &synthesizer, Some(self.store))?;
        if let Some(path) = &report.filepath {
            self.observer.on_event(&SessionEvent::Saved {
                filename: report.filename.clone(),
                path: path.clone(),
            });
        }
        Ok(report)
    }
}
