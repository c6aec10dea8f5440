//! Transient status banner.

use std::fmt;

/// Visual category of a notification; rendered as a CSS class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a notification is in its show/fade/remove lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationPhase {
    /// Fully shown.
    Visible,
    /// Fade-out transition running; removed once it completes.
    Fading,
}

/// The single banner slot's content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Monotonic id; timer events carry it so stale timers can be ignored.
    pub id: u64,
    pub kind: NotificationKind,
    pub message: String,
    pub phase: NotificationPhase,
}
