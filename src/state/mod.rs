//! Pure UI state: data model, transitions, and user-facing texts.
//!
//! Nothing in this module performs I/O. The controller feeds [`UiEvent`]s
//! into [`UiState::apply`] and the renderer draws cloned snapshots.
//!
//! - `session`: [`SessionId`] and [`validate_id`]
//! - `notification`: the single transient banner
//! - `ui`: [`UiState`] and its reducer

mod notification;
mod session;
mod ui;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use notification::{Notification, NotificationKind, NotificationPhase};
pub use session::{InvalidSessionId, SessionId, validate_id};
pub use ui::{ChatMessage, Role, UiEvent, UiState};

/// First bot bubble of every conversation.
pub const GREETING: &str = "Hello! I'm your AI assistant for BookMyDocAI. How can I help you today? You can book, cancel, or reschedule appointments, or check doctor availability.";

/// Bot bubble appended when a chat request fails for any reason.
pub const CHAT_FALLBACK: &str =
    "Sorry, I encountered an error processing your request. Please try again.";

pub const MSG_INVALID_ID: &str = "Please enter a valid 7-8 digit ID number";
pub const MSG_LOGIN_OK: &str = "Login successful";
pub const MSG_LOGIN_FAILED: &str = "Login failed";
pub const MSG_LOGOUT_OK: &str = "Logged out successfully";
pub const MSG_LOGOUT_FAILED: &str = "Logout failed";
pub const MSG_SEND_FAILED: &str = "Failed to send message";
pub const MSG_LOGIN_FOR_DOCTOR: &str = "Please login first to check doctor availability";
pub const MSG_LOGIN_FOR_SPECIALIZATION: &str =
    "Please login first to check specialization availability";

/// Canned queries offered by the "Example Queries" dialog.
pub const EXAMPLE_QUERIES: &[&str] = &[
    "Is there any general dentist available on 05-08-2024?",
    "Check if Dr. John Doe is available on 05-08-2024",
    "Book an appointment with Dr. Emily Johnson on 07-08-2024 09:00",
    "Cancel my appointment with Dr. Jane Smith on 07-08-2024 09:00",
    "Reschedule my appointment from 07-08-2024 09:00 to 08-08-2024 10:30 with Dr. Kevin Anderson",
];

/// Doctors and specialization tags, fetched once at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directory {
    pub doctors: Vec<String>,
    pub specializations: Vec<String>,
}

impl Directory {
    pub fn get(&self, kind: DirectoryKind, index: usize) -> Option<&str> {
        let list = match kind {
            DirectoryKind::Doctor => &self.doctors,
            DirectoryKind::Specialization => &self.specializations,
        };
        list.get(index).map(String::as_str)
    }
}

/// Which directory list an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DirectoryKind {
    Doctor,
    Specialization,
}

impl DirectoryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Doctor => "doctor",
            Self::Specialization => "specialization",
        }
    }
}

impl fmt::Display for DirectoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
