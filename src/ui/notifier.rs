//! User-facing notifications and navigation.
//!
//! # Responsibilities
//! - Describe snackbars and alert dialogs as plain values
//! - Deliver dialog outcomes back to the caller
//! - Leave the page after a session timeout (redirect or reload)

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

/// Visual style of a snackbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnackbarType {
    White,
    Black,
    Light,
    Dark,
    Primary,
    Info,
    Success,
    Warning,
    Danger,
}

/// Where a snackbar is anchored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SnackbarPosition {
    Top,
    #[default]
    Bottom,
    TopRight,
    TopLeft,
    BottomRight,
    BottomLeft,
}

/// A transient message bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snackbar {
    pub message: String,
    pub kind: SnackbarType,
    pub position: SnackbarPosition,
    /// Display time; ignored when `indefinite` is set.
    pub duration: Option<Duration>,
    /// Stay until dismissed by the user.
    pub indefinite: bool,
}

impl Snackbar {
    pub fn new(kind: SnackbarType, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind,
            position: SnackbarPosition::default(),
            duration: None,
            indefinite: false,
        }
    }

    /// Green confirmation bar.
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(SnackbarType::Success, message)
    }

    /// Red error bar shown for five seconds.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(SnackbarType::Danger, message).with_duration(Duration::from_secs(5))
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn with_position(mut self, position: SnackbarPosition) -> Self {
        self.position = position;
        self
    }

    pub fn indefinite(mut self) -> Self {
        self.indefinite = true;
        self
    }
}

/// A blocking alert with a single confirm action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogAlert {
    pub title: String,
    pub message: String,
    pub confirm_text: String,
}

impl DialogAlert {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            confirm_text: "OK".to_string(),
        }
    }
}

/// How the user closed a dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogOutcome {
    Confirmed,
    Dismissed,
}

/// Surface that displays snackbars and dialogs.
pub trait Notifier: Send + Sync {
    fn display_snackbar(&self, snackbar: Snackbar);

    /// Open an alert. The receiver resolves once the user closes it; a dropped
    /// sender counts as [`DialogOutcome::Dismissed`].
    fn display_dialog_alert(&self, alert: DialogAlert) -> oneshot::Receiver<DialogOutcome>;
}

/// Where to go when the session is over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionExit {
    Redirect(String),
    Reload,
}

/// Page navigation owned by the host application.
pub trait Navigator: Send + Sync {
    fn navigate(&self, exit: SessionExit);
}

/// Notifier writing to the log; dialogs confirm immediately.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn display_snackbar(&self, snackbar: Snackbar) {
        match snackbar.kind {
            SnackbarType::Danger => tracing::error!(message = %snackbar.message, "Snackbar"),
            SnackbarType::Warning => tracing::warn!(message = %snackbar.message, "Snackbar"),
            _ => tracing::info!(message = %snackbar.message, "Snackbar"),
        }
    }

    fn display_dialog_alert(&self, alert: DialogAlert) -> oneshot::Receiver<DialogOutcome> {
        tracing::warn!(title = %alert.title, message = %alert.message, "Dialog alert");
        let (tx, rx) = oneshot::channel();
        let _ = tx.send(DialogOutcome::Confirmed);
        rx
    }
}

/// Navigator writing to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn navigate(&self, exit: SessionExit) {
        match exit {
            SessionExit::Redirect(url) => tracing::info!(url = %url, "Redirecting after session end"),
            SessionExit::Reload => tracing::info!("Reloading after session end"),
        }
    }
}
