//! Error types for plan validation
//!
//! Validation collects every violated field instead of stopping at the
//! first one, so callers can report the whole problem at once.

use std::fmt;

/// A single violated field constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    /// Field name as it appears in the serialized plan
    pub field: String,
    /// Human-readable reason
    pub reason: String,
}

impl FieldViolation {
    /// Create new violation
    #[inline]
    #[must_use]
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

/// Plan construction errors
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    /// One or more field constraints were violated
    #[error("invalid plan: {}", join_violations(.0))]
    Invalid(Vec<FieldViolation>),

    /// Plan text could not be decoded as a plan record
    #[error("malformed plan document: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl PlanError {
    /// Violated fields (empty for decode failures)
    #[must_use]
    pub fn violations(&self) -> &[FieldViolation] {
        match self {
            Self::Invalid(violations) => violations,
            Self::Malformed(_) => &[],
        }
    }

    /// Check whether a given field was reported
    #[must_use]
    pub fn has_violation(&self, field: &str) -> bool {
        self.violations().iter().any(|v| v.field == field)
    }
}

fn join_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
