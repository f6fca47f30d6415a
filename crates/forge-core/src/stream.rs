//! Progress events for streamed generation
//!
//! The event sequence a transport forwards to a client while a plan is
//! rendered and persisted. Percentages never decrease and reach 100 only on
//! `complete`. Pacing between events belongs to the transport.

use crate::collaborators::ArtifactStore;
use crate::generate::render_checked;
use crate::store::artifact_filename;
use forge_plan::AgentPlan;
use forge_synth::CodeSynthesizer;
use serde::Serialize;
use std::path::PathBuf;

/// Percentage once the source is rendered
pub const CODE_READY_PERCENT: u8 = 70;

/// Span of percentages covered by code chunks
pub const CHUNK_PERCENT_SPAN: u8 = 20;

/// Percentage while persisting
pub const SAVING_PERCENT: u8 = 95;

/// Named step of a streamed generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Request accepted
    Analyzing,
    /// Preparing the plan
    Planning,
    /// Rendering
    Generating,
    /// Source rendered
    CodeReady,
    /// Persisting
    Saving,
}

/// One server-sent event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// Generation started
    Start {
        /// First stage
        stage: Stage,
    },
    /// Progress update
    Progress {
        /// Stage reached, absent for chunk progress
        #[serde(skip_serializing_if = "Option::is_none")]
        stage: Option<Stage>,
        /// 0 to 100
        percentage: u8,
    },
    /// Slice of the generated source
    CodeChunk {
        /// Source text
        content: String,
    },
    /// Generation finished
    Complete {
        /// File name
        filename: String,
        /// Location, when persisted
        filepath: Option<PathBuf>,
        /// Line count of the source
        lines: usize,
        /// Always 100
        percentage: u8,
    },
    /// Generation failed; no `complete` follows
    Error {
        /// Failure description
        error: String,
    },
}

impl StreamEvent {
    fn progress(stage: Stage, percentage: u8) -> Self {
        Self::Progress {
            stage: Some(stage),
            percentage,
        }
    }

    /// Percentage carried by this event, if any
    #[must_use]
    pub fn percentage(&self) -> Option<u8> {
        match self {
            Self::Progress { percentage, .. } | Self::Complete { percentage, .. } => {
                Some(*percentage)
            }
            Self::Start { .. } | Self::CodeChunk { .. } | Self::Error { .. } => None,
        }
    }

    /// Whether this ends the stream
    #[inline]
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete { .. } | Self::Error { .. })
    }

    /// Render as a `text/event-stream` frame
    #[must_use]
    pub fn to_sse(&self) -> String {
        match serde_json::to_string(self) {
            Ok(json) => format!("data: {json}\n\n"),
            Err(err) => format!("data: {{\"type\":\"error\",\"error\":{:?}}}\n\n", err.to_string()),
        }
    }
}

/// Split `text` into slices of at most `size` characters
///
/// Never splits inside a character. A zero size is treated as one.
#[must_use]
pub fn char_chunks(text: &str, size: usize) -> Vec<&str> {
    let size = size.max(1);
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut count = 0;
    for (idx, _) in text.char_indices() {
        if count == size {
            chunks.push(&text[start..idx]);
            start = idx;
            count = 0;
        }
        count += 1;
    }
    if start < text.len() {
        chunks.push(&text[start..]);
    }
    chunks
}

fn chunk_percentage(offset: usize, total: usize) -> u8 {
    let span = usize::from(CHUNK_PERCENT_SPAN);
    let step = offset.saturating_mul(span) / total.max(1);
    CODE_READY_PERCENT.saturating_add(u8::try_from(step.min(span)).unwrap_or(CHUNK_PERCENT_SPAN))
}

/// Full event sequence for rendering `plan`
///
/// Persists through `store` when given. Any failure becomes a final
/// `error` event.
#[must_use]
pub fn generation_events(
    plan: &AgentPlan,
    synthesizer: &CodeSynthesizer<'_>,
    chunk_size: usize,
    store: Option<&dyn ArtifactStore>,
) -> Vec<StreamEvent> {
    let mut events = vec![
        StreamEvent::Start {
            stage: Stage::Analyzing,
        },
        StreamEvent::progress(Stage::Planning, 10),
        StreamEvent::progress(Stage::Generating, 30),
    ];

    let synthesis = match render_checked(plan, synthesizer) {
        Ok(synthesis) => synthesis,
        Err(err) => {
            events.push(StreamEvent::Error {
                error: err.to_string(),
            });
            return events;
        }
    };
    let code = synthesis.source;
    events.push(StreamEvent::progress(Stage::CodeReady, CODE_READY_PERCENT));

    let total_chars = code.chars().count();
    let mut offset = 0;
    for chunk in char_chunks(&code, chunk_size) {
        events.push(StreamEvent::CodeChunk {
            content: chunk.to_string(),
        });
        events.push(StreamEvent::Progress {
            stage: None,
            percentage: chunk_percentage(offset, total_chars),
        });
        offset += chunk.chars().count();
    }

    let identifier = plan.identifier();
    let (filename, filepath) = match store {
        Some(store) => {
            events.push(StreamEvent::progress(Stage::Saving, SAVING_PERCENT));
            match store.save(&identifier, &code) {
                Ok(saved) => (saved.filename, Some(saved.path)),
                Err(err) => {
                    tracing::error!(error = %err, "streamed generation failed to persist");
                    events.push(StreamEvent::Error {
                        error: err.to_string(),
                    });
                    return events;
                }
            }
        }
        None => (artifact_filename(&identifier), None),
    };

    events.push(StreamEvent::Complete {
        filename,
        filepath,
        lines: code.split('\n').count(),
        percentage: 100,
    });
    tracing::debug!(events = events.len(), "built generation stream");
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::{MockArtifactStore, SavedArtifact};
    use crate::error::StoreError;
    use pretty_assertions::assert_eq;

    fn plan() -> AgentPlan {
        AgentPlan::builder("Demo Web Research Agent", "search AI news")
            .tool("duckduckgo")
            .build()
            .unwrap()
    }

    #[test]
    fn chunks_respect_char_boundaries() {
        assert_eq!(char_chunks("abcdef", 4), vec!["abcd", "ef"]);
        assert_eq!(char_chunks("ñañaña", 2), vec!["ña", "ña", "ña"]);
        assert_eq!(char_chunks("", 3), Vec::<&str>::new());
        assert_eq!(char_chunks("ab", 0), vec!["a", "b"]);
    }

    #[test]
    fn chunk_progress_stays_in_band() {
        assert_eq!(chunk_percentage(0, 1000), 70);
        assert_eq!(chunk_percentage(500, 1000), 80);
        assert_eq!(chunk_percentage(999, 1000), 89);
    }

    #[test]
    fn sse_frame() {
        let frame = StreamEvent::Progress {
            stage: None,
            percentage: 75,
        }
        .to_sse();
        assert_eq!(frame, "data: {\"type\":\"progress\",\"percentage\":75}\n\n");

        let frame = StreamEvent::Start {
            stage: Stage::Analyzing,
        }
        .to_sse();
        assert_eq!(frame, "data: {\"type\":\"start\",\"stage\":\"analyzing\"}\n\n");
    }

    #[test]
    fn unsaved_stream_reassembles_source() {
        let synthesizer = CodeSynthesizer::new();
        let events = generation_events(&plan(), &synthesizer, 500, None);

        let code: String = events
            .iter()
            .filter_map(|event| match event {
                StreamEvent::CodeChunk { content } => Some(content.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(code, synthesizer.synthesize(&plan()));

        assert!(!events.contains(&StreamEvent::progress(Stage::Saving, SAVING_PERCENT)));
        match events.last() {
            Some(StreamEvent::Complete {
                filename,
                filepath,
                percentage,
                ..
            }) => {
                assert_eq!(filename, "demo_web_research_agent_agent.py");
                assert!(filepath.is_none());
                assert_eq!(*percentage, 100);
            }
            other => panic!("unexpected last event {other:?}"),
        }
    }

    #[test]
    fn percentages_never_decrease() {
        let events = generation_events(&plan(), &CodeSynthesizer::new(), 64, None);
        let percentages: Vec<u8> = events.iter().filter_map(StreamEvent::percentage).collect();
        assert!(percentages.windows(2).all(|pair| pair[0] <= pair[1]));
        assert_eq!(percentages.last(), Some(&100));
        assert_eq!(percentages.iter().filter(|p| **p == 100).count(), 1);
    }

    #[test]
    fn saved_stream_has_saving_step() {
        let mut store = MockArtifactStore::new();
        store.expect_save().times(1).returning(|id, _| {
            Ok(SavedArtifact {
                filename: format!("{id}_agent.py"),
                path: PathBuf::from("out").join(format!("{id}_agent.py")),
            })
        });

        let events = generation_events(&plan(), &CodeSynthesizer::new(), 500, Some(&store));
        let n = events.len();
        assert_eq!(events[n - 2], StreamEvent::progress(Stage::Saving, SAVING_PERCENT));
        assert!(matches!(&events[n - 1], StreamEvent::Complete { filepath: Some(_), .. }));
    }

    #[test]
    fn store_failure_ends_with_error() {
        let mut store = MockArtifactStore::new();
        store
            .expect_save()
            .returning(|_, _| Err(StoreError::io("out", std::io::Error::other("read-only"))));

        let events = generation_events(&plan(), &CodeSynthesizer::new(), 500, Some(&store));
        assert!(matches!(events.last(), Some(StreamEvent::Error { .. })));
        assert!(!events.iter().any(|event| matches!(event, StreamEvent::Complete { .. })));
    }
}
