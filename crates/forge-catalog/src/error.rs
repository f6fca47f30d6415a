//! Error types for catalog registration
//!
//! Resolution never fails; only building a custom catalog can.

/// Catalog registration errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// Alias already maps to another entry
    #[error("alias '{alias}' already registered for tool '{existing}'")]
    DuplicateAlias {
        /// Conflicting alias (normalized)
        alias: String,
        /// Tool that owns it
        existing: String,
    },

    /// Entry has no usable alias
    #[error("tool '{0}' has no aliases")]
    NoAliases(String),

    /// Named tool is not registered
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    /// Fallback provider must be a secondary search entry
    #[error("tool '{0}' is not a secondary search provider")]
    NotSecondaryProvider(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_alias_display() {
        let err = CatalogError::DuplicateAlias {
            alias: "web".into(),
            existing: "duckduckgo".into(),
        };
        assert_eq!(
            err.to_string(),
            "alias 'web' already registered for tool 'duckduckgo'"
        );
    }
}
