//! Cooperative cancellation token and wall-clock run budget.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Something long-running work can poll between batches.
pub trait Cancellable {
    /// Check if cancellation has been requested.
    fn is_cancelled(&self) -> bool;

    /// Request cancellation.
    fn cancel(&self);
}

/// Default implementation of a cancellation token.
#[derive(Debug, Clone)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a new cancellation token (not cancelled).
    pub fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

impl Cancellable for CancellationToken {
    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }
}

/// Explicit cancellation plus an optional wall-clock limit.
///
/// Checked only at batch boundaries, so partial results are always whole
/// batches.
#[derive(Debug, Clone)]
pub struct RunBudget {
    token: CancellationToken,
    started: Instant,
    limit: Option<Duration>,
}

impl RunBudget {
    /// A budget with no time limit.
    pub fn unbounded() -> Self {
        Self {
            token: CancellationToken::new(),
            started: Instant::now(),
            limit: None,
        }
    }

    pub fn with_limit(limit: Duration) -> Self {
        Self {
            limit: Some(limit),
            ..Self::unbounded()
        }
    }

    pub fn with_token(mut self, token: CancellationToken) -> Self {
        self.token = token;
        self
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// True once cancelled or once the wall-clock limit has passed.
    pub fn should_stop(&self) -> bool {
        if self.token.is_cancelled() {
            return true;
        }
        match self.limit {
            Some(limit) => self.started.elapsed() >= limit,
            None => false,
        }
    }
}

impl Default for RunBudget {
    fn default() -> Self {
        Self::unbounded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancelled_token_stops_budget() {
        let token = CancellationToken::new();
        let budget = RunBudget::unbounded().with_token(token.clone());
        assert!(!budget.should_stop());
        token.cancel();
        assert!(budget.should_stop());
    }

    #[test]
    fn zero_limit_is_immediately_exhausted() {
        let budget = RunBudget::with_limit(Duration::ZERO);
        assert!(budget.should_stop());
    }

    #[test]
    fn unbounded_budget_never_stops_on_its_own() {
        assert!(!RunBudget::unbounded().should_stop());
    }
}
