//! Cooperative cancellation for long-running diffs.

use crate::error::{Result, SchemaDiffError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared stop flag checked at the diff engine's safe points.
///
/// Clone the token, hand one copy to
/// [`DiffEngine::with_cancellation`](crate::DiffEngine::with_cancellation)
/// and call [`stop`](Self::stop) on the other from any thread. The running diff surfaces
/// [`SchemaDiffError::Cancelled`] at the next checkpoint; partial progress is
/// discarded.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    stopped: Arc<AtomicBool>,
}

impl CancellationToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent and irrevocable.
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Relaxed)
    }

    pub(crate) fn check(&self) -> Result<()> {
        if self.is_stopped() {
            Err(SchemaDiffError::Cancelled)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_token_passes_check() {
        let token = CancellationToken::new();
        assert!(!token.is_stopped());
        assert!(token.check().is_ok());
    }

    #[test]
    fn test_stop_is_visible_through_clones() {
        let token = CancellationToken::new();
        let clone = token.clone();
        token.stop();
        assert!(clone.is_stopped());
        assert!(matches!(clone.check(), Err(SchemaDiffError::Cancelled)));
    }
}
