//! User-facing output.
//!
//! Commands never print directly; they hand each message to an
//! [`OutputSink`] together with an [`Emphasis`] hint. How a sink renders the
//! hint (colour, prefix, nothing at all) is up to the sink.

use std::io::Write;

/// How a message should stand out when displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emphasis {
    /// Ordinary text, including forwarded server output.
    Plain,
    /// Section headings such as the help title.
    Heading,
    /// Dimmed, secondary information.
    Muted,
    /// An operation completed.
    Success,
    /// Something the user should notice but that is not a failure.
    Warning,
    /// A command failed.
    Error,
}

/// Destination for user-facing messages.
pub trait OutputSink: Send + Sync {
    /// Writes one message.
    fn write(&self, message: &str, emphasis: Emphasis);
}

/// Writes every message to standard output, one per line.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl ConsoleSink {
    /// Create a new console sink
    pub fn new() -> Self {
        Self
    }
}

impl OutputSink for ConsoleSink {
    fn write(&self, message: &str, _emphasis: Emphasis) {
        let mut stdout = std::io::stdout().lock();
        // A closed stdout is not worth failing a command over.
        let _ = writeln!(stdout, "{}", message);
        let _ = stdout.flush();
    }
}
