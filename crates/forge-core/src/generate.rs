//! One-shot generation from a validated plan

use crate::collaborators::ArtifactStore;
use crate::error::ForgeError;
use crate::store::artifact_filename;
use chrono::{DateTime, Utc};
use forge_plan::{AgentPlan, Variant};
use forge_synth::{check_delimiters, CodeSynthesizer, Synthesis};
use serde::Serialize;
use std::path::PathBuf;

/// Result of rendering (and optionally persisting) a plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationReport {
    /// Generated source
    pub code: String,
    /// Plan as supplied
    pub plan: AgentPlan,
    /// Plan as rendered
    pub effective_plan: AgentPlan,
    /// Template used
    pub variant: Variant,
    /// File name the source is (or would be) stored under
    pub filename: String,
    /// Location, when persisted
    pub filepath: Option<PathBuf>,
    /// Line count of `code`
    pub lines: usize,
    /// Size of `code` in bytes
    pub size_bytes: usize,
    /// When rendering finished
    pub created_at: DateTime<Utc>,
}

impl GenerationReport {
    /// Whether the source was persisted
    #[inline]
    #[must_use]
    pub fn is_saved(&self) -> bool {
        self.filepath.is_some()
    }
}

/// Render `plan` and check the result is structurally sound
///
/// # Errors
/// [`ForgeError::MalformedOutput`] if the rendered source has unbalanced
/// delimiters; nothing is persisted in that case
pub fn render_checked(
    plan: &AgentPlan,
    synthesizer: &CodeSynthesizer<'_>,
) -> Result<Synthesis, ForgeError> {
    let synthesis = synthesizer.render(plan);
    if let Err(err) = check_delimiters(&synthesis.source) {
        tracing::error!(error = %err, name = plan.name(), "rendered source failed delimiter check");
        return Err(err.into());
    }
    Ok(synthesis)
}

/// Render `plan` and persist it when a store is given
///
/// # Errors
/// Malformed output or any store failure, verbatim
pub fn generate(
    plan: &AgentPlan,
    synthesizer: &CodeSynthesizer<'_>,
    store: Option<&dyn ArtifactStore>,
) -> Result<GenerationReport, ForgeError> {
    let synthesis = render_checked(plan, synthesizer)?;
    let identifier = plan.identifier();

    let (filename, filepath) = match store {
        Some(store) => {
            let saved = store.save(&identifier, &synthesis.source)?;
            (saved.filename, Some(saved.path))
        }
        None => (artifact_filename(&identifier), None),
    };

    tracing::info!(
        name = plan.name(),
        variant = %synthesis.variant,
        saved = filepath.is_some(),
        "generated agent"
    );

    Ok(GenerationReport {
        lines: synthesis.source.split('\n').count(),
        size_bytes: synthesis.source.len(),
        code: synthesis.source,
        plan: plan.clone(),
        effective_plan: synthesis.effective_plan,
        variant: synthesis.variant,
        filename,
        filepath,
        created_at: Utc::now(),
    })
}
