//! Accumulated clarification dialogue

use std::fmt;

const USER_PREFIX: &str = "User: ";
const ASSISTANT_PREFIX: &str = "Assistant: ";

/// Conversation text handed to the analyst and planner
///
/// Turns are concatenated in order; the text only ever grows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    text: String,
    exchanges: usize,
}

impl Transcript {
    /// Start from the initial request
    #[must_use]
    pub fn new(initial_request: &str) -> Self {
        Self {
            text: format!("{USER_PREFIX}{initial_request}"),
            exchanges: 0,
        }
    }

    /// Append a clarifying question and the user's answer
    pub fn push_exchange(&mut self, question: &str, answer: &str) {
        self.text.push_str("\n\n");
        self.text.push_str(ASSISTANT_PREFIX);
        self.text.push_str(question);
        self.text.push('\n');
        self.text.push_str(USER_PREFIX);
        self.text.push_str(answer);
        self.exchanges += 1;
    }

    /// Full text
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Number of question/answer pairs appended
    #[inline]
    #[must_use]
    pub fn exchanges(&self) -> usize {
        self.exchanges
    }

    /// Take the text
    #[inline]
    #[must_use]
    pub fn into_string(self) -> String {
        self.text
    }
}

impl fmt::Display for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
