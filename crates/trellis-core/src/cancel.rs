//! Cooperative cancellation for long-running filter commits.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A shared, externally owned cancellation flag.
///
/// The owner (typically a pipeline runner) keeps one clone and the
/// executing filter another; setting the flag is visible through
/// every clone. Cancellation is cooperative: per-element loops poll
/// [`CancelToken::is_cancelled`] at chunk boundaries and stop between
/// whole elements, never mid-element. A filter that observes the flag
/// reports a `Cancelled` outcome, not an error and not a partial
/// success.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// A fresh, un-cancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent; there is no way to un-cancel.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_token_not_cancelled() {
        assert!(!CancelToken::new().is_cancelled());
    }

    #[test]
    fn cancel_visible_through_clones() {
        let token = CancelToken::new();
        let observer = token.clone();
        token.cancel();
        assert!(observer.is_cancelled());
    }

    #[test]
    fn cancel_is_idempotent() {
        let token = CancelToken::new();
        token.cancel();
        token.cancel();
        assert!(token.is_cancelled());
    }
}
