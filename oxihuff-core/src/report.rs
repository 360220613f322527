//! Status reporting for front-ends.
//!
//! The codec describes what it is doing through a [`Reporter`]. Messages are
//! purely informational: a reporter cannot change control flow or return
//! values, and the codec never inspects what the reporter did with them.

use tracing::info;

/// Receiver for human-readable status messages.
pub trait Reporter {
    /// Deliver one status message.
    fn report(&mut self, message: &str);
}

impl<F> Reporter for F
where
    F: FnMut(&str),
{
    fn report(&mut self, message: &str) {
        self(message)
    }
}

/// Forwards every message to `tracing` at INFO level.
///
/// This is the default reporter. Nothing is printed unless the application
/// installs a `tracing` subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&mut self, message: &str) {
        info!(target: "oxihuff", "{message}");
    }
}

/// Discards every message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SilentReporter;

impl Reporter for SilentReporter {
    fn report(&mut self, _message: &str) {}
}

/// Collects messages in memory, in the order they were reported.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageLog {
    messages: Vec<String>,
}

impl MessageLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages received so far.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Whether any message contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.messages.iter().any(|m| m.contains(needle))
    }
}

impl Reporter for MessageLog {
    fn report(&mut self, message: &str) {
        self.messages.push(message.to_owned());
    }
}
