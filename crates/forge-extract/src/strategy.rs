//! Unwrapping strategies
//!
//! Model output often wraps the plan JSON in prose or Markdown. Each
//! strategy proposes a candidate substring; the extractor tries them in
//! order and keeps the first proposal.

use once_cell::sync::Lazy;
use pulldown_cmark::{CodeBlockKind, Event, Parser as MdParser, Tag, TagEnd};
use regex::Regex;

/// Greedy span from the first `{` to the last `}`
static BRACE_SPAN: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"(?s)\{.*\}").ok());

/// A way of locating the plan document inside model output
pub trait UnwrapStrategy: Send + Sync {
    /// Name used in diagnostics
    fn name(&self) -> &'static str;

    /// Propose a candidate, or `None` if this strategy does not apply
    fn apply(&self, text: &str) -> Option<String>;
}

/// First fenced block whose info string starts with the given language tag
#[derive(Debug, Clone)]
pub struct TaggedFence {
    tag: String,
}

impl TaggedFence {
    /// Match blocks tagged `tag` (case-insensitive)
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
        }
    }

    /// Match ```` ```json ```` blocks
    #[must_use]
    pub fn json() -> Self {
        Self::new("json")
    }
}

impl UnwrapStrategy for TaggedFence {
    fn name(&self) -> &'static str {
        "tagged_fence"
    }

    fn apply(&self, text: &str) -> Option<String> {
        fenced_blocks(text)
            .into_iter()
            .find(|block| {
                block
                    .language
                    .as_deref()
                    .is_some_and(|lang| lang.eq_ignore_ascii_case(&self.tag))
            })
            .map(|block| block.content)
    }
}

/// First fenced block regardless of tag
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyFence;

impl UnwrapStrategy for AnyFence {
    fn name(&self) -> &'static str {
        "any_fence"
    }

    fn apply(&self, text: &str) -> Option<String> {
        fenced_blocks(text).into_iter().next().map(|block| block.content)
    }
}

/// A fenced code block found in Markdown text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FencedBlock {
    /// First word of the info string, if any
    pub language: Option<String>,
    /// Block body
    pub content: String,
}

/// Collect fenced code blocks in document order
///
/// Indented code blocks are ignored.
#[must_use]
pub fn fenced_blocks(text: &str) -> Vec<FencedBlock> {
    let mut blocks = Vec::new();
    let mut current: Option<FencedBlock> = None;

    for event in MdParser::new(text) {
        match event {
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) => {
                let language = info
                    .split_whitespace()
                    .next()
                    .map(str::to_string)
                    .filter(|lang| !lang.is_empty());
                current = Some(FencedBlock {
                    language,
                    content: String::new(),
                });
            }
            Event::Text(chunk) => {
                if let Some(block) = current.as_mut() {
                    block.content.push_str(&chunk);
                }
            }
            Event::End(TagEnd::CodeBlock) => {
                if let Some(block) = current.take() {
                    blocks.push(block);
                }
            }
            _ => {}
        }
    }

    blocks
}

/// Isolate the object span when the text does not start with `{`
///
/// Returns the trimmed input unchanged when it already starts with a brace
/// or contains no brace span.
#[must_use]
pub fn isolate_object(text: &str) -> (String, bool) {
    let trimmed = text.trim();
    if trimmed.starts_with('{') {
        return (trimmed.to_string(), false);
    }
    match BRACE_SPAN.as_ref().and_then(|re| re.find(trimmed)) {
        Some(span) => (span.as_str().to_string(), true),
        None => (trimmed.to_string(), false),
    }
}

/// Default strategy order: `json`-tagged fence, then any fence
#[must_use]
pub fn default_strategies() -> Vec<Box<dyn UnwrapStrategy>> {
    vec![Box::new(TaggedFence::json()), Box::new(AnyFence)]
}
