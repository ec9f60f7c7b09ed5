use super::ExecError;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(30);

/// Cooperative cancellation flag.
///
/// A child token observes its own flag and every ancestor's flag, so
/// cancelling a parent cancels all children but not the other way round.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
    parents: Vec<Arc<AtomicBool>>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn child(&self) -> Self {
        let mut parents = self.parents.clone();
        parents.push(Arc::clone(&self.flag));
        Self {
            flag: Arc::new(AtomicBool::new(false)),
            parents,
        }
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst) || self.parents.iter().any(|p| p.load(Ordering::SeqCst))
    }
}

/// Per-invocation context handed to every collaborator.
#[derive(Debug, Clone)]
pub struct ExecContext {
    cancel: CancelToken,
    query_timeout: Duration,
}

impl ExecContext {
    pub fn new(cancel: CancelToken) -> Self {
        Self {
            cancel,
            query_timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }

    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = timeout;
        self
    }

    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    pub fn query_timeout(&self) -> Duration {
        self.query_timeout
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Fails with [`ExecError::Cancelled`] once the context has been cancelled.
    pub fn check(&self) -> Result<(), ExecError> {
        if self.is_cancelled() {
            return Err(ExecError::Cancelled);
        }
        Ok(())
    }
}

impl Default for ExecContext {
    fn default() -> Self {
        Self::new(CancelToken::new())
    }
}
