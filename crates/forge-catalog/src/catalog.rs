//! Tool catalog and resolution
//!
//! Maps human-supplied tool names onto import/initializer pairs. Resolution
//! is a pure function of the input list and the catalog contents; unknown
//! names degrade to comment placeholders instead of failing.

use crate::entry::{normalize_tool_name, ToolClass, ToolEntry};
use crate::error::CatalogError;
use indexmap::IndexSet;
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

static DEFAULT_CATALOG: Lazy<ToolCatalog> = Lazy::new(default_catalog);

/// Result of resolving a tool list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ToolResolution {
    /// Deduplicated import lines, lexicographically sorted
    pub imports: BTreeSet<String>,
    /// Initializer expressions: input order, then injected fallbacks
    pub initializers: Vec<String>,
    /// Placeholder comments for names the catalog does not know
    pub unresolved: Vec<String>,
    /// Canonical names of entries added by fallback injection
    pub injected: Vec<String>,
}

impl ToolResolution {
    /// No imports, initializers or placeholders
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.imports.is_empty() && self.initializers.is_empty() && self.unresolved.is_empty()
    }

    /// Whether a fallback entry was appended
    #[inline]
    #[must_use]
    pub fn has_injected_fallback(&self) -> bool {
        !self.injected.is_empty()
    }
}

/// Static mapping from tool aliases to catalog entries
#[derive(Debug, Clone)]
pub struct ToolCatalog {
    entries: Vec<ToolEntry>,
    aliases: HashMap<String, usize>,
    fallback: Option<usize>,
    fallback_injection: bool,
}

impl Default for ToolCatalog {
    fn default() -> Self {
        default_catalog()
    }
}

impl ToolCatalog {
    /// Create empty catalog (fallback injection on, no provider set)
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            aliases: HashMap::new(),
            fallback: None,
            fallback_injection: true,
        }
    }

    /// Shared read-only default catalog
    #[must_use]
    pub fn global() -> &'static Self {
        &DEFAULT_CATALOG
    }

    /// Register an entry under all of its aliases
    ///
    /// The first secondary search provider registered becomes the fallback.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateAlias`] if any alias is taken and
    /// [`CatalogError::NoAliases`] if none survive normalization.
    pub fn register(&mut self, entry: ToolEntry) -> Result<&mut Self, CatalogError> {
        let keys: IndexSet<String> = entry
            .aliases
            .iter()
            .map(|alias| normalize_tool_name(alias))
            .filter(|key| !key.is_empty())
            .collect();

        if keys.is_empty() {
            return Err(CatalogError::NoAliases(entry.name));
        }
        if let Some((key, &idx)) = keys
            .iter()
            .find_map(|key| self.aliases.get(key).map(|idx| (key, idx)))
        {
            return Err(CatalogError::DuplicateAlias {
                alias: key.clone(),
                existing: self.entries[idx].name.clone(),
            });
        }

        let idx = self.entries.len();
        if entry.is_secondary_provider() && self.fallback.is_none() {
            self.fallback = Some(idx);
        }
        for key in keys {
            self.aliases.insert(key, idx);
        }
        self.entries.push(entry);
        Ok(self)
    }

    /// Choose which secondary provider is injected
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownTool`] or
    /// [`CatalogError::NotSecondaryProvider`].
    pub fn set_fallback(&mut self, name: &str) -> Result<&mut Self, CatalogError> {
        let idx = self
            .index_of(name)
            .ok_or_else(|| CatalogError::UnknownTool(name.to_string()))?;
        if !self.entries[idx].is_secondary_provider() {
            return Err(CatalogError::NotSecondaryProvider(name.to_string()));
        }
        self.fallback = Some(idx);
        Ok(self)
    }

    /// Disable fallback injection for this instance
    #[inline]
    #[must_use]
    pub fn without_fallback_injection(mut self) -> Self {
        self.fallback_injection = false;
        self
    }

    /// Set fallback injection
    #[inline]
    #[must_use]
    pub fn with_fallback_injection(mut self, enabled: bool) -> Self {
        self.fallback_injection = enabled;
        self
    }

    /// Whether fallback injection is active
    #[inline]
    #[must_use]
    pub fn injects_fallback(&self) -> bool {
        self.fallback_injection
    }

    /// Look up entry by any alias (case-insensitive)
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&ToolEntry> {
        self.index_of(name).map(|idx| &self.entries[idx])
    }

    /// All entries in registration order
    pub fn entries(&self) -> impl Iterator<Item = &ToolEntry> {
        self.entries.iter()
    }

    /// Number of entries
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether catalog has no entries
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve a list of tool names
    ///
    /// Each distinct entry contributes one initializer at its first
    /// occurrence. If any resolved entry is web-search class and no
    /// secondary provider was requested, the fallback provider is appended
    /// once after every requested initializer.
    #[must_use]
    pub fn resolve<S: AsRef<str>>(&self, names: &[S]) -> ToolResolution {
        let mut selected: IndexSet<usize> = IndexSet::new();
        let mut resolution = ToolResolution::default();

        for name in names {
            let name = name.as_ref();
            match self.index_of(name) {
                Some(idx) => {
                    selected.insert(idx);
                }
                None => {
                    tracing::warn!(tool = name, "tool not found in catalog");
                    resolution.unresolved.push(placeholder_comment(name));
                }
            }
        }

        let secondary_requested = selected
            .iter()
            .any(|&idx| self.entries[idx].is_secondary_provider());
        let needs_fallback = self.fallback_injection
            && !secondary_requested
            && selected.iter().any(|&idx| self.entries[idx].triggers_fallback());

        for &idx in &selected {
            let entry = &self.entries[idx];
            resolution.imports.insert(entry.import_statement.clone());
            resolution.initializers.push(entry.initializer.clone());
        }

        if needs_fallback {
            if let Some(idx) = self.fallback {
                let entry = &self.entries[idx];
                tracing::debug!(fallback = %entry.name, "injecting secondary search provider");
                resolution.imports.insert(entry.import_statement.clone());
                resolution.initializers.push(entry.initializer.clone());
                resolution.injected.push(entry.name.clone());
            }
        }

        resolution
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.aliases.get(&normalize_tool_name(name)).copied()
    }
}

/// Comment line standing in for a tool the catalog cannot resolve
///
/// Control characters are flattened to spaces so the comment stays on one
/// line.
#[must_use]
pub fn placeholder_comment(name: &str) -> String {
    let flat: String = name
        .trim()
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    format!("# Tool '{flat}' not found in catalog")
}

/// Build the built-in catalog
#[must_use]
pub fn default_catalog() -> ToolCatalog {
    let entries = [
        ToolEntry::new(
            "duckduckgo",
            "from agno.tools.duckduckgo import DuckDuckGoTools",
            "DuckDuckGoTools()",
            ToolClass::WebSearch,
        )
        .with_aliases(["ddg", "web", "search", "web_search", "websearch"])
        .with_description("Web search through DuckDuckGo"),
        ToolEntry::new(
            "serper",
            "from agno.tools.serper import SerperTools",
            "SerperTools(api_key=os.getenv(\"SERPER_API_KEY\"))",
            ToolClass::SecondarySearch,
        )
        .with_aliases(["serper_dev", "google_search"])
        .with_description("Google search through Serper (needs SERPER_API_KEY)"),
        ToolEntry::new(
            "yfinance",
            "from agno.tools.yfinance import YFinanceTools",
            "YFinanceTools(stock_price=True, company_info=True)",
            ToolClass::Finance,
        )
        .with_aliases(["finance", "stock", "stocks"])
        .with_description("Stock prices and company information"),
        ToolEntry::new(
            "reasoning",
            "from agno.tools.reasoning import ReasoningTools",
            "ReasoningTools(add_instructions=True)",
            ToolClass::Reasoning,
        )
        .with_aliases(["think"])
        .with_description("Step-by-step reasoning and analysis"),
        ToolEntry::new(
            "python",
            "from agno.tools.python import PythonTools",
            "PythonTools()",
            ToolClass::Code,
        )
        .with_aliases(["code"])
        .with_description("Run Python code"),
        ToolEntry::new(
            "file",
            "from agno.tools.file import FileTools",
            "FileTools()",
            ToolClass::Files,
        )
        .with_aliases(["files"])
        .with_description("Read and write local files"),
    ];

    let mut catalog = ToolCatalog::new();
    for entry in entries {
        if let Err(err) = catalog.register(entry) {
            // Built-in aliases are disjoint; reaching this is a bug in the table.
            tracing::error!(error = %err, "invalid built-in catalog entry");
        }
    }
    catalog
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const DDG_IMPORT: &str = "from agno.tools.duckduckgo import DuckDuckGoTools";
    const SERPER_IMPORT: &str = "from agno.tools.serper import SerperTools";

    #[test]
    fn default_catalog_has_six_entries() {
        assert_eq!(ToolCatalog::global().len(), 6);
    }

    #[test]
    fn aliases_map_to_same_entry() {
        let catalog = ToolCatalog::global();
        for alias in ["duckduckgo", "Web", "SEARCH", "web search", "web-search", "ddg"] {
            assert_eq!(
                catalog.lookup(alias).map(|e| e.name.as_str()),
                Some("duckduckgo"),
                "alias {alias}"
            );
        }
    }

    #[test]
    fn web_search_injects_serper_once() {
        let res = ToolCatalog::global().resolve(&["duckduckgo", "web", "search"]);
        assert_eq!(res.imports.len(), 2);
        assert!(res.imports.contains(DDG_IMPORT));
        assert!(res.imports.contains(SERPER_IMPORT));
        assert_eq!(
            res.initializers,
            vec![
                "DuckDuckGoTools()".to_string(),
                "SerperTools(api_key=os.getenv(\"SERPER_API_KEY\"))".to_string(),
            ]
        );
        assert_eq!(res.injected, vec!["serper".to_string()]);
    }

    #[test]
    fn explicit_serper_suppresses_injection() {
        let res = ToolCatalog::global().resolve(&["serper", "duckduckgo"]);
        assert!(!res.has_injected_fallback());
        assert_eq!(res.initializers.len(), 2);
        assert!(res.initializers[0].starts_with("SerperTools"));
    }

    #[test]
    fn fallback_appended_after_requested() {
        let res = ToolCatalog::global().resolve(&["web", "yfinance", "python"]);
        assert_eq!(res.initializers.len(), 4);
        assert!(res.initializers[3].starts_with("SerperTools"));
        assert_eq!(res.initializers[1], "YFinanceTools(stock_price=True, company_info=True)");
    }

    #[test]
    fn non_search_tools_no_injection() {
        let res = ToolCatalog::global().resolve(&["reasoning", "file"]);
        assert!(!res.has_injected_fallback());
        assert_eq!(res.imports.len(), 2);
    }

    #[test]
    fn imports_sorted() {
        let res = ToolCatalog::global().resolve(&["yfinance", "file", "duckduckgo"]);
        let imports: Vec<_> = res.imports.iter().cloned().collect();
        let mut sorted = imports.clone();
        sorted.sort();
        assert_eq!(imports, sorted);
    }

    #[test]
    fn unknown_tool_becomes_placeholder() {
        let res = ToolCatalog::global().resolve(&["telepathy"]);
        assert!(res.imports.is_empty());
        assert!(res.initializers.is_empty());
        assert_eq!(
            res.unresolved,
            vec!["# Tool 'telepathy' not found in catalog".to_string()]
        );
    }

    #[test]
    fn placeholder_stays_single_line() {
        let comment = placeholder_comment("evil\nimport os");
        assert!(!comment.contains('\n'));
        assert!(comment.starts_with("# "));
    }

    #[test]
    fn duplicates_contribute_once() {
        let res = ToolCatalog::global()
            .clone()
            .without_fallback_injection()
            .resolve(&["python", "code", "Python"]);
        assert_eq!(res.initializers, vec!["PythonTools()".to_string()]);
    }

    #[test]
    fn injection_can_be_disabled() {
        let catalog = default_catalog().without_fallback_injection();
        let res = catalog.resolve(&["duckduckgo"]);
        assert_eq!(res.imports.len(), 1);
        assert!(!res.has_injected_fallback());
    }

    #[test]
    fn empty_input_resolves_empty() {
        let res = ToolCatalog::global().resolve::<&str>(&[]);
        assert!(res.is_empty());
    }

    #[test]
    fn register_rejects_duplicate_alias() {
        let mut catalog = default_catalog();
        let err = catalog
            .register(ToolEntry::new("other", "import o", "O()", ToolClass::Other).with_aliases(["Web"]))
            .unwrap_err();
        assert_eq!(
            err,
            CatalogError::DuplicateAlias {
                alias: "web".into(),
                existing: "duckduckgo".into(),
            }
        );
    }

    #[test]
    fn register_rejects_blank_aliases() {
        let mut catalog = ToolCatalog::new();
        let mut entry = ToolEntry::new("  ", "import o", "O()", ToolClass::Other);
        entry.aliases = vec!["   ".into()];
        assert!(matches!(catalog.register(entry), Err(CatalogError::NoAliases(_))));
    }

    #[test]
    fn set_fallback_requires_secondary() {
        let mut catalog = default_catalog();
        assert!(matches!(
            catalog.set_fallback("python"),
            Err(CatalogError::NotSecondaryProvider(_))
        ));
        assert!(matches!(
            catalog.set_fallback("nothing"),
            Err(CatalogError::UnknownTool(_))
        ));
        assert!(catalog.set_fallback("google_search").is_ok());
    }
}
