//! UI state snapshot and its reducer.

use super::notification::{Notification, NotificationKind, NotificationPhase};
use super::session::SessionId;
use super::{CHAT_FALLBACK, Directory, GREETING};

/// Author of a chat bubble.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Bot,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Bot => "bot",
        }
    }
}

/// One bubble in the chat log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: Role,
    pub text: String,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            role: Role::Bot,
            text: text.into(),
        }
    }
}

/// Everything the renderer needs to draw the page.
///
/// Login-vs-chat visibility is derived from [`UiState::session`], never
/// stored separately, so the two cannot disagree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiState {
    pub session: Option<SessionId>,
    /// Contents of the ID input box.
    pub id_input: String,
    /// Contents of the message box.
    pub draft: String,
    /// Append-only chat log; reset only on logout.
    pub messages: Vec<ChatMessage>,
    pub directory: Directory,
    pub loading: bool,
    pub notification: Option<Notification>,
    pub examples_open: bool,
    next_notification_id: u64,
    version: u64,
}

/// A state transition. Applying one never performs I/O.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// Session restored from storage or confirmed by the backend.
    SessionStarted(SessionId),
    /// Backend confirmed logout.
    SessionEnded,
    IdInputChanged(String),
    DraftChanged(String),
    RequestStarted,
    RequestFinished,
    /// Optimistic append of the user's message; also clears the draft.
    UserMessage(String),
    BotMessage(String),
    /// Appends the fixed fallback reply.
    ChatFailed,
    DirectoryLoaded(Directory),
    Notify {
        kind: NotificationKind,
        message: String,
    },
    NotificationFaded(u64),
    NotificationExpired(u64),
    ExamplesOpened,
    ExamplesClosed,
}

impl UiState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.is_some()
    }

    /// Bumped by every event that changes the state.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn apply(&mut self, event: UiEvent) {
        match event {
            UiEvent::SessionStarted(id) => {
                self.session = Some(id);
                if self.messages.is_empty() {
                    self.messages.push(ChatMessage::bot(GREETING));
                }
            }
            UiEvent::SessionEnded => {
                self.session = None;
                self.id_input.clear();
                self.draft.clear();
                self.examples_open = false;
                self.messages.clear();
                self.messages.push(ChatMessage::bot(GREETING));
            }
            UiEvent::IdInputChanged(value) => self.id_input = value,
            UiEvent::DraftChanged(value) => self.draft = value,
            UiEvent::RequestStarted => self.loading = true,
            UiEvent::RequestFinished => self.loading = false,
            UiEvent::UserMessage(text) => {
                self.draft.clear();
                self.messages.push(ChatMessage::user(text));
            }
            UiEvent::BotMessage(text) => self.messages.push(ChatMessage::bot(text)),
            UiEvent::ChatFailed => self.messages.push(ChatMessage::bot(CHAT_FALLBACK)),
            UiEvent::DirectoryLoaded(directory) => self.directory = directory,
            UiEvent::Notify { kind, message } => {
                self.next_notification_id += 1;
                self.notification = Some(Notification {
                    id: self.next_notification_id,
                    kind,
                    message,
                    phase: NotificationPhase::Visible,
                });
            }
            UiEvent::NotificationFaded(id) => {
                let Some(current) = self.notification.as_mut().filter(|n| n.id == id) else {
                    return;
                };
                current.phase = NotificationPhase::Fading;
            }
            UiEvent::NotificationExpired(id) => {
                if !self.notification.as_ref().is_some_and(|n| n.id == id) {
                    return;
                }
                self.notification = None;
            }
            UiEvent::ExamplesOpened => self.examples_open = true,
            UiEvent::ExamplesClosed => self.examples_open = false,
        }
        self.version = self.version.wrapping_add(1);
    }
}
