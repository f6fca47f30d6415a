//! Forge Extract - recover agent plans from model output
//!
//! Model output is unreliable: the JSON plan may arrive bare, inside a
//! Markdown fence, or buried in prose. [`PlanExtractor`] tries an ordered
//! list of [`UnwrapStrategy`]s, isolates the object span, parses it and
//! validates it into an [`forge_plan::AgentPlan`].
//!
//! # Example
//!
//! ```rust
//! use forge_extract::{ExtractionErrorKind, PlanExtractor};
//!
//! let extractor = PlanExtractor::new();
//! let raw = "Here you go:\n```json\n{\"name\": \"Scout\", \"role\": \"find news\"}\n```\n";
//! let plan = extractor.extract(raw).unwrap();
//! assert_eq!(plan.name(), "Scout");
//!
//! let err = extractor.extract("no plan today").unwrap_err();
//! assert_eq!(err.kind(), ExtractionErrorKind::MalformedJson);
//! ```

#![warn(unreachable_pub)]

pub mod error;
pub mod extractor;
pub mod strategy;

pub use error::{ExtractionError, ExtractionErrorKind};
pub use extractor::{extract, Candidate, PlanExtractor};
pub use strategy::{
    default_strategies, fenced_blocks, isolate_object, AnyFence, FencedBlock, TaggedFence,
    UnwrapStrategy,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
