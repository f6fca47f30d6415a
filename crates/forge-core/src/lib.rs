//! Forge Core - session pipeline for Agent Forge
//!
//! Drives a request from first utterance to persisted agent source:
//! - **Elicitation**: bounded clarification dialogue ([`ElicitationLoop`])
//! - **Planning**: planner collaborator plus [`forge_extract::PlanExtractor`]
//! - **Generation**: [`forge_synth::CodeSynthesizer`] with a structural check
//! - **Persistence**: [`FileStore`] with atomic writes and paginated listing
//! - **Streaming**: server-sent event framing of a generation
//!
//! Every external effect goes through a collaborator trait, so the whole
//! pipeline runs against scripted fakes in tests.
//!
//! # Example
//!
//! ```rust
//! use forge_core::prelude::*;
//! use forge_plan::AgentPlan;
//! use forge_synth::CodeSynthesizer;
//!
//! let plan = AgentPlan::builder("Demo Web Research Agent", "search AI news")
//!     .tool("duckduckgo")
//!     .build()
//!     .unwrap();
//!
//! let report = generate(&plan, &CodeSynthesizer::new(), None).unwrap();
//! assert_eq!(report.filename, "demo_web_research_agent_agent.py");
//! assert!(report.code.contains("DuckDuckGoTools()"));
//! ```

#![warn(unreachable_pub)]

pub mod collaborators;
pub mod config;
pub mod elicitation;
pub mod error;
pub mod events;
pub mod generate;
pub mod prompts;
pub mod session;
pub mod store;
pub mod stream;
pub mod transcript;

pub use collaborators::{
    is_affirmative, Analyst, ArtifactStore, Confirmer, NullObserver, Planner, SavedArtifact,
    SessionObserver, TurnProvider,
};
pub use config::{ForgeConfig, LlmConfig};
pub use elicitation::{
    allowed_transitions, validate_transition, CompletionReason, ElicitationLoop,
    ElicitationOutcome, ElicitationState, TransitionError,
};
pub use error::{CollaboratorError, ConfigError, ForgeError, StoreError};
pub use events::{PlanSummary, SessionEvent};
pub use generate::{generate, render_checked, GenerationReport};
pub use session::{ForgeSession, SessionOutcome};
pub use store::{FileStore, GeneratedAgentInfo, Listing};
pub use stream::{generation_events, StreamEvent};
pub use transcript::Transcript;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for driving sessions
    pub use crate::{
        generate, Analyst, ArtifactStore, Confirmer, FileStore, ForgeConfig, ForgeError,
        ForgeSession, Planner, SessionEvent, SessionObserver, SessionOutcome, TurnProvider,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
