//! Collaborator interfaces consumed by the HTTP access layer.
//!
//! # Data Flow
//! ```text
//! ApiClient
//!     → indicator.rs (start_call / end_call around every request)
//!     → notifier.rs (snackbars for server errors, session timeout dialog)
//!     → Navigator (redirect or reload once the dialog is acknowledged)
//!     ← CredentialProvider (headers merged into outgoing requests)
//! ```
//!
//! # Design Decisions
//! - The core depends on traits only; hosts plug in their own surfaces
//! - Opening a dialog is synchronous, its outcome arrives on a oneshot channel
//! - Default implementations log through `tracing`

pub mod indicator;
pub mod notifier;

pub use indicator::{CallGuard, CallIndicator, CountingIndicator, NoopIndicator};
pub use notifier::{
    DialogAlert, DialogOutcome, LogNavigator, LogNotifier, Navigator, Notifier, SessionExit,
    Snackbar, SnackbarPosition, SnackbarType,
};

use reqwest::header::HeaderMap;

/// Source of session headers merged into every outgoing request.
pub trait CredentialProvider: Send + Sync {
    fn headers(&self) -> HeaderMap;
}

impl CredentialProvider for HeaderMap {
    fn headers(&self) -> HeaderMap {
        self.clone()
    }
}
