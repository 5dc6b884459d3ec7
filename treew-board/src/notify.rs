//! User-facing feedback seam

use serde::Serialize;
use std::time::Duration;
use tracing::{error, info, warn};

/// How long a toast stays visible unless told otherwise
pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_millis(3000);

/// Visual severity of a toast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastLevel {
    Success,
    Danger,
    Warning,
    Info,
}

/// A notification as handed to the UI
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Toast {
    pub level: ToastLevel,
    pub header: String,
    pub message: String,
    pub duration: Duration,
}

impl Toast {
    /// Create a toast with the default duration
    pub fn new(level: ToastLevel, header: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            header: header.into(),
            message: message.into(),
            duration: DEFAULT_TOAST_DURATION,
        }
    }

    pub fn success(header: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ToastLevel::Success, header, message)
    }

    pub fn danger(header: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ToastLevel::Danger, header, message)
    }

    pub fn warning(header: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ToastLevel::Warning, header, message)
    }

    pub fn info(header: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ToastLevel::Info, header, message)
    }

    /// Override the display duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }
}

/// Fire-and-forget feedback channel towards the user.
///
/// Implementors only need [`NotificationSink::notify`]; the success and
/// failure helpers build the matching toast.
pub trait NotificationSink: Send + Sync {
    /// Surface a toast
    fn notify(&self, toast: Toast);

    /// Report a successful operation
    fn notify_success(&self, title: &str, body: &str) {
        self.notify(Toast::success(title, body));
    }

    /// Report a failed operation
    fn notify_failure(&self, title: &str, body: &str) {
        self.notify(Toast::danger(title, body));
    }
}

/// Sink that writes notifications to the tracing log
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, toast: Toast) {
        match toast.level {
            ToastLevel::Success | ToastLevel::Info => {
                info!(header = %toast.header, "{}", toast.message)
            }
            ToastLevel::Warning => warn!(header = %toast.header, "{}", toast.message),
            ToastLevel::Danger => error!(header = %toast.header, "{}", toast.message),
        }
    }
}
