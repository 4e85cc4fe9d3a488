//! Cross-cutting request/response interception.
//!
//! # Responsibilities
//! - Drive the call indicator around every request
//! - Alert on server errors (persistent danger snackbar)
//! - Detect session timeouts and alert once per client
//! - Log failures locally in development mode
//!
//! # Design Decisions
//! - Observes and annotates errors, never swallows them
//! - The one-shot timeout flag is atomic, so concurrent failures still alert once
//! - The dialog outcome is awaited on a spawned task; the error propagates immediately

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::http::error::{ApiError, DEFAULT_SERVER_ERROR};
use crate::observability::metrics;
use crate::ui::{
    CallGuard, CallIndicator, DialogAlert, DialogOutcome, Navigator, Notifier, SessionExit, Snackbar,
    SnackbarType,
};

pub const SESSION_TIMEOUT_TITLE: &str = "Session Timeout";
pub const SESSION_TIMEOUT_MESSAGE: &str =
    "Your session has timed out due to inactivity. Click OK to log in again.";

pub(crate) struct Interceptor {
    pub(crate) indicator: Arc<dyn CallIndicator>,
    pub(crate) notifier: Arc<dyn Notifier>,
    pub(crate) navigator: Arc<dyn Navigator>,
    pub(crate) dev_mode: bool,
    pub(crate) session_timeout_detection: bool,
    pub(crate) session_timeout_redirect: Option<String>,
    pub(crate) session_timeout_alert_shown: AtomicBool,
}

impl Interceptor {
    /// Mark a request as dispatched. Dropping the guard ends the call.
    pub(crate) fn on_request(&self) -> CallGuard {
        CallGuard::start(self.indicator.clone())
    }

    /// Apply side effects for a failed request and hand the error back.
    pub(crate) fn on_error(&self, err: ApiError) -> ApiError {
        match &err {
            ApiError::Server { .. } => {
                self.log_error("Server error", &err);

                let message = err.server_message().unwrap_or(DEFAULT_SERVER_ERROR);
                self.notifier.display_snackbar(
                    Snackbar::new(SnackbarType::Danger, format!("Server error: {message}")).indefinite(),
                );
            }
            ApiError::Client { .. } => {
                if self.session_timeout_detection
                    && err.is_session_timeout()
                    && !self.session_timeout_alert_shown.swap(true, Ordering::SeqCst)
                {
                    metrics::record_session_timeout();
                    self.show_timeout_alert();
                }

                self.log_error("Client error", &err);
            }
            ApiError::Network(_) => self.log_error("Error request", &err),
            ApiError::Setup(_) => self.log_error("Error message", &err),
            ApiError::Unexpected { .. } | ApiError::Configuration(_) | ApiError::Decode(_) => {}
        }

        err
    }

    /// True once the timeout alert has been shown by this client.
    pub(crate) fn timeout_alert_shown(&self) -> bool {
        self.session_timeout_alert_shown.load(Ordering::SeqCst)
    }

    fn log_error(&self, context: &str, err: &ApiError) {
        if self.dev_mode {
            tracing::error!(status = ?err.status(), error = %err, "{}", context);
        }
    }

    fn show_timeout_alert(&self) {
        tracing::warn!("Session timeout detected");

        let outcome = self
            .notifier
            .display_dialog_alert(DialogAlert::new(SESSION_TIMEOUT_TITLE, SESSION_TIMEOUT_MESSAGE));
        let navigator = self.navigator.clone();
        let exit = match &self.session_timeout_redirect {
            Some(url) => SessionExit::Redirect(url.clone()),
            None => SessionExit::Reload,
        };

        tokio::spawn(async move {
            match outcome.await.unwrap_or(DialogOutcome::Dismissed) {
                DialogOutcome::Confirmed => navigator.navigate(exit),
                DialogOutcome::Dismissed => {
                    tracing::debug!("Session timeout alert dismissed without confirmation");
                }
            }
        });
    }
}
