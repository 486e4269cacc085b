//! Error sinks.
//!
//! The queue keeps its own [`ErrorLog`] and can forward every reported error to
//! an additional [`ErrorSink`] supplied by the caller.

use serde_json::Value;

/// Receives errors reported while processing scrobble replies.
pub trait ErrorSink: Send {
    /// Record an error message and an optional diagnostic value.
    fn record(&mut self, message: &str, debug: Option<&Value>);
}

/// Append-only, ordered list of error messages.
#[derive(Debug, Default, Clone)]
pub struct ErrorLog {
    messages: Vec<String>,
}

impl ErrorLog {
    /// Create an empty log.
    pub const fn new() -> Self {
        Self {
            messages: Vec::new(),
        }
    }

    /// All recorded messages, oldest first.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Most recent message.
    pub fn last(&self) -> Option<&str> {
        self.messages.last().map(String::as_str)
    }

    /// Number of recorded messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl ErrorSink for ErrorLog {
    fn record(&mut self, message: &str, _debug: Option<&Value>) {
        if !message.is_empty() {
            self.messages.push(message.to_string());
        }
    }
}
