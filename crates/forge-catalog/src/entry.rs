//! Catalog entries

use serde::Serialize;
use std::fmt;

/// Capability class of a tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolClass {
    /// Primary web search; pulls in the secondary provider
    WebSearch,
    /// Secondary search provider, injected as a fallback
    SecondarySearch,
    /// Market and company data
    Finance,
    /// Structured reasoning helpers
    Reasoning,
    /// Code execution
    Code,
    /// Local file access
    Files,
    /// Anything registered by callers
    Other,
}

impl fmt::Display for ToolClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::WebSearch => "web search",
            Self::SecondarySearch => "secondary search",
            Self::Finance => "finance",
            Self::Reasoning => "reasoning",
            Self::Code => "code",
            Self::Files => "files",
            Self::Other => "other",
        };
        f.write_str(name)
    }
}

/// A tool the generated code knows how to import and construct
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolEntry {
    /// Canonical name (also the first alias)
    pub name: String,
    /// Names matched case-insensitively
    pub aliases: Vec<String>,
    /// Import line for the generated module
    pub import_statement: String,
    /// Expression constructing the tool
    pub initializer: String,
    /// Capability class
    pub class: ToolClass,
    /// One-line description for planner prompts
    pub description: String,
}

impl ToolEntry {
    /// Create entry; the canonical name is registered as an alias
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        import_statement: impl Into<String>,
        initializer: impl Into<String>,
        class: ToolClass,
    ) -> Self {
        let name = name.into();
        Self {
            aliases: vec![name.clone()],
            name,
            import_statement: import_statement.into(),
            initializer: initializer.into(),
            class,
            description: String::new(),
        }
    }

    /// Add aliases
    #[must_use]
    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases.extend(aliases.into_iter().map(Into::into));
        self
    }

    /// With description
    #[inline]
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Whether resolving this entry calls for the secondary provider
    #[inline]
    #[must_use]
    pub fn triggers_fallback(&self) -> bool {
        self.class == ToolClass::WebSearch
    }

    /// Whether this entry is a secondary search provider
    #[inline]
    #[must_use]
    pub fn is_secondary_provider(&self) -> bool {
        self.class == ToolClass::SecondarySearch
    }
}

/// Normalize a tool name or alias for lookup
///
/// Trims, lowercases and folds spaces and hyphens into underscores, so
/// `"Web Search"`, `"web-search"` and `"web_search"` are the same key.
#[must_use]
pub fn normalize_tool_name(name: &str) -> String {
    name.trim()
        .chars()
        .flat_map(char::to_lowercase)
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_folds_separators() {
        assert_eq!(normalize_tool_name("  Web Search "), "web_search");
        assert_eq!(normalize_tool_name("web-search"), "web_search");
        assert_eq!(normalize_tool_name("DuckDuckGo"), "duckduckgo");
    }

    #[test]
    fn entry_registers_name_as_alias() {
        let entry = ToolEntry::new("x", "import x", "X()", ToolClass::Other).with_aliases(["y"]);
        assert_eq!(entry.aliases, vec!["x".to_string(), "y".to_string()]);
        assert!(!entry.triggers_fallback());
    }

    #[test]
    fn web_search_triggers_fallback() {
        let entry = ToolEntry::new("w", "import w", "W()", ToolClass::WebSearch);
        assert!(entry.triggers_fallback());
        assert!(!entry.is_secondary_provider());
    }
}
