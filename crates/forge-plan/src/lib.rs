//! Forge Plan - the agent specification record
//!
//! Every other stage reads or produces this record:
//! - The extractor recovers a [`PlanDraft`] from model text and validates it
//! - Callers build an [`AgentPlan`] directly with [`AgentPlan::builder`]
//! - The synthesizer renders a validated [`AgentPlan`] into source text
//!
//! # Example
//!
//! ```rust
//! use forge_plan::{AgentPlan, Variant};
//!
//! let plan = AgentPlan::builder("Demo Web Research Agent", "search AI news")
//!     .tool("duckduckgo")
//!     .needs_memory(true)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(plan.variant(), Variant::Memory);
//! assert_eq!(plan.identifier(), "demo_web_research_agent");
//! ```

#![warn(unreachable_pub)]

pub mod error;
pub mod identifier;
pub mod model;
pub mod plan;

pub use error::{FieldViolation, PlanError};
pub use identifier::{display_name_from_identifier, sanitize_identifier};
pub use model::{normalize_model_id, ModelFamily, BASE_CHAT_MODEL, REASONING_MODEL};
pub use plan::{
    plan_json_schema, AgentPlan, PlanBuilder, PlanDraft, TeamMember, Variant, MAX_COMPLEXITY,
    MEMORY_COMPLEXITY_THRESHOLD, MIN_COMPLEXITY,
};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with plans
    pub use crate::{AgentPlan, ModelFamily, PlanDraft, PlanError, TeamMember, Variant};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
