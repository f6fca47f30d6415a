//! Terminal adapters: user turns, confirmation and progress display

use forge_core::{
    CollaboratorError, Confirmer, PlanSummary, SessionEvent, SessionObserver, TurnProvider,
};
use std::cell::RefCell;
use std::io::{BufRead, Write};

/// Reads turns and confirmations from `input`, prompting on `output`
pub(crate) struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub(crate) fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, prompt: &str) -> Result<String, CollaboratorError> {
        write!(self.output, "{prompt}\n> ")?;
        self.output.flush()?;
        let mut line = String::new();
        self.input.read_line(&mut line)?;
        Ok(line.trim().to_string())
    }
}

impl<R: BufRead, W: Write> TurnProvider for Console<R, W> {
    fn initial_request(&mut self) -> Result<String, CollaboratorError> {
        self.ask(
            "What kind of agent do you need?\n(e.g. 'An agent that finds technology news')",
        )
    }

    fn reply(&mut self, question: &str) -> Result<String, CollaboratorError> {
        self.ask(&format!("\nForge:\n{question}"))
    }
}

impl<R: BufRead, W: Write> Confirmer for Console<R, W> {
    fn respond(&mut self, summary: &PlanSummary) -> Result<String, CollaboratorError> {
        self.ask(&format!("\nAgent plan:\n{summary}\n\nProceed with generation? (y/n):"))
    }
}

/// One console serving as both turn provider and confirmer
///
/// Stdin can only be locked once, so both roles share one [`Console`].
pub(crate) struct SharedConsole<'a, R, W>(pub(crate) &'a RefCell<Console<R, W>>);

impl<R: BufRead, W: Write> TurnProvider for SharedConsole<'_, R, W> {
    fn initial_request(&mut self) -> Result<String, CollaboratorError> {
        self.0.borrow_mut().initial_request()
    }

    fn reply(&mut self, question: &str) -> Result<String, CollaboratorError> {
        self.0.borrow_mut().reply(question)
    }
}

impl<R: BufRead, W: Write> Confirmer for SharedConsole<'_, R, W> {
    fn respond(&mut self, summary: &PlanSummary) -> Result<String, CollaboratorError> {
        self.0.borrow_mut().respond(summary)
    }
}

/// Prints session progress as plain lines
pub(crate) struct ConsoleObserver<W: Write> {
    out: RefCell<W>,
    max_iterations: usize,
}

impl<W: Write> ConsoleObserver<W> {
    pub(crate) fn new(out: W, max_iterations: usize) -> Self {
        Self {
            out: RefCell::new(out),
            max_iterations,
        }
    }
}

/// Human-readable line for an event, `None` for events shown elsewhere
pub(crate) fn describe_event(event: &SessionEvent, max_iterations: usize) -> Option<String> {
    match event {
        SessionEvent::Analyzing { iteration } => {
            Some(format!("Analyzing... ({iteration}/{max_iterations})"))
        }
        SessionEvent::ElicitationComplete { reason, .. } => Some(format!("Done: {reason}")),
        SessionEvent::Planning => Some("Creating agent plan...".to_string()),
        SessionEvent::ExtractionFailed { kind, detail } => {
            Some(format!("Could not build a plan ({kind}): {detail}"))
        }
        SessionEvent::Generating { variant } => Some(format!("Generating {variant} agent...")),
        SessionEvent::Saved { path, .. } => Some(format!(
            "Agent generated: {}\n\nTo use your agent:\n\
             1. Install the dependencies: pip install -r requirements.txt\n\
             2. Put the required API keys in your .env\n\
             3. Run: python {}",
            path.display(),
            path.display()
        )),
        SessionEvent::Declined => Some("Generation cancelled.".to_string()),
        SessionEvent::Aborted => Some("Cannot create an agent without a description.".to_string()),
        SessionEvent::RequestReceived { .. }
        | SessionEvent::Clarification { .. }
        | SessionEvent::PlanReady(_) => None,
    }
}

impl<W: Write> SessionObserver for ConsoleObserver<W> {
    fn on_event(&self, event: &SessionEvent) {
        if let Some(line) = describe_event(event, self.max_iterations) {
            let mut out = self.out.borrow_mut();
            if let Err(err) = writeln!(out, "\n{line}") {
                tracing::warn!(error = %err, "failed to write progress");
            }
        }
    }
}
