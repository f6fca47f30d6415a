//! Forge Synth - Python source for validated agent plans
//!
//! Three templates, chosen by [`forge_plan::Variant`]:
//! - **basic**: one agent with its tools and instructions
//! - **memory**: the same agent backed by a SQLite store
//! - **team**: one agent per member plus a coordinating team
//!
//! Rendering is deterministic. Every user-supplied string is escaped, and
//! nested constructs are written through a scoped writer so each opened
//! bracket is closed.
//!
//! # Example
//!
//! ```rust
//! use forge_plan::AgentPlan;
//! use forge_synth::{check_delimiters, CodeSynthesizer};
//!
//! let plan = AgentPlan::builder("Stock Watcher", "track NVDA")
//!     .tool("yfinance")
//!     .build()
//!     .unwrap();
//!
//! let source = CodeSynthesizer::new().synthesize(&plan);
//! assert!(source.contains("YFinanceTools(stock_price=True, company_info=True)"));
//! assert!(check_delimiters(&source).is_ok());
//! ```

#![warn(unreachable_pub)]

pub mod defaults;
pub mod lint;
pub mod model;
pub mod options;
pub mod python;
pub mod synthesizer;
mod writer;

pub use lint::{check_delimiters, DelimiterError};
pub use options::{Synthesis, SynthesisOptions, DEFAULT_MEMORY_DB_FILE};
pub use synthesizer::CodeSynthesizer;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
