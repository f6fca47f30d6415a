//! Forge Catalog - tool name resolution for generated agents
//!
//! A read-only table mapping tool names and aliases to the import line and
//! initializer expression the synthesizer emits. Requesting a web search
//! tool pulls in a secondary search provider unless one was asked for.
//!
//! # Example
//!
//! ```rust
//! use forge_catalog::ToolCatalog;
//!
//! let resolution = ToolCatalog::global().resolve(&["Web", "stock", "unknown"]);
//!
//! assert_eq!(resolution.initializers.len(), 3); // ddg, yfinance, serper
//! assert_eq!(resolution.unresolved.len(), 1);
//! ```

#![warn(unreachable_pub)]

pub mod catalog;
pub mod entry;
pub mod error;

pub use catalog::{default_catalog, placeholder_comment, ToolCatalog, ToolResolution};
pub use entry::{normalize_tool_name, ToolClass, ToolEntry};
pub use error::CatalogError;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
