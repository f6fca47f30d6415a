//! Indented source writer
//!
//! Nested constructs are written through closures, so the closing line of a
//! bracketed construct is always emitted at the depth it was opened.

const INDENT: &str = "    ";

/// Line-oriented Python source builder
#[derive(Debug, Clone)]
pub(crate) struct SourceWriter {
    lines: Vec<String>,
    depth: usize,
    comments: bool,
}

impl SourceWriter {
    pub(crate) fn new(comments: bool) -> Self {
        Self {
            lines: Vec::new(),
            depth: 0,
            comments,
        }
    }

    fn indent(&self) -> String {
        INDENT.repeat(self.depth)
    }

    /// Line at the current depth
    pub(crate) fn line(&mut self, text: impl AsRef<str>) -> &mut Self {
        let line = format!("{}{}", self.indent(), text.as_ref());
        self.lines.push(line);
        self
    }

    /// Empty line
    pub(crate) fn blank(&mut self) -> &mut Self {
        self.lines.push(String::new());
        self
    }

    /// Explanatory comment, dropped when comments are disabled
    pub(crate) fn comment(&mut self, text: &str) -> &mut Self {
        if self.comments {
            self.line(format!("# {text}"));
        }
        self
    }

    /// Lines written one level deeper than `header`
    pub(crate) fn block(&mut self, header: &str, body: impl FnOnce(&mut Self)) -> &mut Self {
        self.line(header);
        self.depth += 1;
        body(self);
        self.depth -= 1;
        self
    }

    /// `open` ... `close` with the body indented between them
    pub(crate) fn bracketed(
        &mut self,
        open: &str,
        close: &str,
        body: impl FnOnce(&mut Self),
    ) -> &mut Self {
        self.block(open, body);
        self.line(close)
    }

    /// `key=[` items `],` with one item per line
    pub(crate) fn list_arg<S: AsRef<str>>(&mut self, key: &str, items: &[S]) -> &mut Self {
        if items.is_empty() {
            return self.line(format!("{key}=[],"));
        }
        self.bracketed(&format!("{key}=["), "],", |w| {
            for item in items {
                w.line(format!("{},", item.as_ref()));
            }
        })
    }

    /// Finished source with a trailing newline
    pub(crate) fn finish(self) -> String {
        let mut out = self.lines.join("\n");
        out.push('\n');
        out
    }
}
