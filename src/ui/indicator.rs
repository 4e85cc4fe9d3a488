//! In-flight call indicator.
//!
//! # Responsibilities
//! - Signal the start of every dispatched request
//! - Signal the end exactly once, whatever the outcome

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// A loading indicator driven by the HTTP access layer.
pub trait CallIndicator: Send + Sync {
    fn start_call(&self);
    fn end_call(&self);
}

/// Indicator that ignores all calls.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopIndicator;

impl CallIndicator for NoopIndicator {
    fn start_call(&self) {}
    fn end_call(&self) {}
}

/// Indicator tracking in-flight and completed calls.
#[derive(Debug, Default)]
pub struct CountingIndicator {
    active: AtomicUsize,
    started: AtomicUsize,
    ended: AtomicUsize,
}

impl CountingIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls started but not yet ended.
    pub fn active(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    pub fn ended(&self) -> usize {
        self.ended.load(Ordering::SeqCst)
    }
}

impl CallIndicator for CountingIndicator {
    fn start_call(&self) {
        self.started.fetch_add(1, Ordering::SeqCst);
        let active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::trace!(active, "API call started");
    }

    fn end_call(&self) {
        self.ended.fetch_add(1, Ordering::SeqCst);
        let prev = self
            .active
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| Some(n.saturating_sub(1)))
            .unwrap_or(0);
        tracing::trace!(active = prev.saturating_sub(1), "API call ended");
    }
}

/// Ends the call on drop, so cancellation still balances the indicator.
pub struct CallGuard {
    indicator: Arc<dyn CallIndicator>,
}

impl CallGuard {
    /// Start a call and return the guard that ends it.
    pub fn start(indicator: Arc<dyn CallIndicator>) -> Self {
        indicator.start_call();
        Self { indicator }
    }
}

impl Drop for CallGuard {
    fn drop(&mut self) {
        self.indicator.end_call();
    }
}
