//! Error types for the forge pipeline
//!
//! Provides error handling for:
//! - Collaborator failures (analysis, planning, user input)
//! - Plan extraction and validation
//! - Artifact persistence and listing
//! - Configuration loading

use crate::elicitation::TransitionError;
use forge_extract::ExtractionError;
use forge_plan::PlanError;
use forge_synth::DelimiterError;
use std::path::PathBuf;

/// Failure reported by an external collaborator
#[derive(Debug, thiserror::Error)]
pub enum CollaboratorError {
    /// Could not reach the collaborator
    #[error("transport error: {0}")]
    Transport(String),

    /// Collaborator answered with something unusable
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Reading caller input failed
    #[error("input error: {0}")]
    Input(#[from] std::io::Error),
}

impl CollaboratorError {
    /// Whether retrying the same call might succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

/// Persistence and listing errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Filesystem operation failed
    #[error("io error at {path}: {source}")]
    Io {
        /// Path involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Temporary file could not be moved into place
    #[error("failed to persist {path}: {source}")]
    Persist {
        /// Destination path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    /// Create IO error for path
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("cannot read config {path}: {source}")]
    Read {
        /// Config path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for this schema
    #[error("invalid config syntax: {0}")]
    Parse(#[from] toml::de::Error),

    /// Values parse but are unusable
    #[error("invalid config value: {0}")]
    Invalid(String),
}

/// Main pipeline error type
#[derive(Debug, thiserror::Error)]
pub enum ForgeError {
    /// External collaborator failed
    #[error("collaborator failed: {0}")]
    Collaborator(#[from] CollaboratorError),

    /// Model output did not yield a valid plan
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    /// Caller-supplied plan is invalid
    #[error(transparent)]
    Plan(#[from] PlanError),

    /// Persistence failed
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration failed
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Rendered source failed the structural check
    #[error("generated source is malformed: {0}")]
    MalformedOutput(#[from] DelimiterError),

    /// Prompt or report serialization failed
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Dialogue driven out of order
    #[error(transparent)]
    IllegalTransition(#[from] TransitionError),
}

impl ForgeError {
    /// Short stable name of the failure class
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Collaborator(_) => "collaborator",
            Self::Extraction(err) => err.kind().as_str(),
            Self::Plan(_) => "invalid_plan",
            Self::Store(_) => "store",
            Self::Config(_) => "config",
            Self::MalformedOutput(_) => "malformed_output",
            Self::Serialization(_) => "serialization",
            Self::IllegalTransition(_) => "illegal_transition",
        }
    }

    /// Session ends cleanly and the caller may start another
    #[inline]
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Extraction(err) => err.is_recoverable(),
            Self::Plan(_) => true,
            Self::Collaborator(err) => err.is_retryable(),
            Self::Store(_)
            | Self::Config(_)
            | Self::MalformedOutput(_)
            | Self::Serialization(_)
            | Self::IllegalTransition(_) => false,
        }
    }
}
