//! Extraction errors
//!
//! Both kinds carry the raw model output and the cleaned candidate text so
//! a caller can show exactly what failed to parse.

use forge_plan::FieldViolation;
use std::fmt;

/// Why extraction failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtractionErrorKind {
    /// Candidate text is not a JSON document
    MalformedJson,
    /// JSON parsed but does not describe a valid plan
    SchemaInvalid,
}

impl ExtractionErrorKind {
    /// Stable code for logs and wire formats
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MalformedJson => "MALFORMED_JSON",
            Self::SchemaInvalid => "SCHEMA_INVALID",
        }
    }
}

impl fmt::Display for ExtractionErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Plan extraction failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("plan extraction failed ({kind}): {detail}")]
pub struct ExtractionError {
    kind: ExtractionErrorKind,
    detail: String,
    candidate: String,
    raw: String,
    violations: Vec<FieldViolation>,
}

impl ExtractionError {
    /// Candidate could not be parsed as JSON
    #[must_use]
    pub fn malformed(detail: impl Into<String>, candidate: impl Into<String>, raw: impl Into<String>) -> Self {
        Self {
            kind: ExtractionErrorKind::MalformedJson,
            detail: detail.into(),
            candidate: candidate.into(),
            raw: raw.into(),
            violations: Vec::new(),
        }
    }

    /// Parsed document violates the plan constraints
    #[must_use]
    pub fn schema_invalid(
        detail: impl Into<String>,
        candidate: impl Into<String>,
        raw: impl Into<String>,
    ) -> Self {
        Self {
            kind: ExtractionErrorKind::SchemaInvalid,
            detail: detail.into(),
            candidate: candidate.into(),
            raw: raw.into(),
            violations: Vec::new(),
        }
    }

    /// Attach violated fields
    #[must_use]
    pub fn with_violations(mut self, violations: Vec<FieldViolation>) -> Self {
        self.violations = violations;
        self
    }

    /// Failure kind
    #[inline]
    #[must_use]
    pub fn kind(&self) -> ExtractionErrorKind {
        self.kind
    }

    /// Human-readable detail
    #[inline]
    #[must_use]
    pub fn detail(&self) -> &str {
        &self.detail
    }

    /// Text handed to the JSON parser
    #[inline]
    #[must_use]
    pub fn candidate(&self) -> &str {
        &self.candidate
    }

    /// Original model output
    #[inline]
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Violated fields (schema failures only)
    #[inline]
    #[must_use]
    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    /// Extraction failures end the session but leave no side effects
    #[inline]
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        true
    }
}
