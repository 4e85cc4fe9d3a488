//! Latest-result suppression.
//!
//! When the same logical request is issued repeatedly (search-as-you-type,
//! filter changes) only the most recent one should be honored. Each issue
//! stores a fresh token under its key; on completion the result is kept only
//! if the token is still the latest for that key.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

/// Identity of one issued call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Token(u64);

/// Per-owner table of the latest token for each key.
#[derive(Debug, Default)]
pub struct LatestTokenTable {
    latest: DashMap<String, Token>,
    next: AtomicU64,
}

impl LatestTokenTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new call for `key`, superseding any earlier one.
    pub fn issue(&self, key: &str) -> Token {
        let token = Token(self.next.fetch_add(1, Ordering::SeqCst));
        self.latest.insert(key.to_string(), token);
        token
    }

    /// True if `token` is still the latest call for `key`.
    pub fn is_latest(&self, key: &str, token: &Token) -> bool {
        self.latest.get(key).is_some_and(|t| *t == *token)
    }

    /// Await `future`, returning its output only if no newer call for `key`
    /// was issued in the meantime.
    pub async fn resolve_latest<F: Future>(&self, key: &str, future: F) -> Option<F::Output> {
        let token = self.issue(key);
        let output = future.await;

        if self.is_latest(key, &token) {
            Some(output)
        } else {
            tracing::trace!(key, "Discarding superseded result");
            None
        }
    }

    /// Forget `key`; outstanding calls for it will be discarded.
    pub fn forget(&self, key: &str) {
        self.latest.remove(key);
    }
}
