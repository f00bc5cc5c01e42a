use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cancellation handle passed to digest resolvers.
///
/// Clones share the same flag; cancelling any clone cancels all of them.
#[derive(Debug, Clone, Default)]
pub struct ResolveContext {
    cancelled: Arc<AtomicBool>,
}

impl ResolveContext {
    /// Creates a context that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Returns true once [`ResolveContext::cancel`] was called on any clone.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}
