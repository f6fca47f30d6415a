//! Synthesis options and output

use forge_plan::{AgentPlan, Variant};
use serde::{Deserialize, Serialize};

/// Default SQLite file for memory-backed agents
pub const DEFAULT_MEMORY_DB_FILE: &str = "agents_memory.sqlite";

/// Rendering switches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisOptions {
    /// Emit explanatory `#` comments (placeholders are always kept)
    pub include_comments: bool,
    /// Emit the illustrative invocation
    pub add_examples: bool,
    /// Database file used by the memory variant
    pub memory_db_file: String,
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        Self {
            include_comments: true,
            add_examples: true,
            memory_db_file: DEFAULT_MEMORY_DB_FILE.to_string(),
        }
    }
}

impl SynthesisOptions {
    /// Set comment emission
    #[inline]
    #[must_use]
    pub fn with_comments(mut self, include: bool) -> Self {
        self.include_comments = include;
        self
    }

    /// Set example emission
    #[inline]
    #[must_use]
    pub fn with_examples(mut self, add: bool) -> Self {
        self.add_examples = add;
        self
    }

    /// Set memory database file
    #[inline]
    #[must_use]
    pub fn with_memory_db_file(mut self, file: impl Into<String>) -> Self {
        self.memory_db_file = file.into();
        self
    }
}

/// Rendered source plus what it was rendered from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Synthesis {
    /// Python source text
    pub source: String,
    /// Template used
    pub variant: Variant,
    /// Plan as rendered (after team model promotion)
    pub effective_plan: AgentPlan,
}

impl Synthesis {
    /// Number of lines in the source
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.source.lines().count()
    }
}
