//! Structured diagnostics for user-facing validation problems.

use std::fmt;

/// A stable, user-facing problem report.
///
/// Diagnostics carry a stable negative code plus a human-readable
/// message and are returned as values from planning and commit —
/// parameter and path problems are recoverable conditions, not Rust
/// errors. Codes are unique per check so that callers and tests can
/// match on them without parsing messages.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// Stable negative identifying code.
    pub code: i32,
    /// Human-readable description.
    pub message: String,
}

impl Diagnostic {
    /// Build a diagnostic from a code and message.
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}
