//! UI controller: user actions in, backend calls out, state transitions applied.
//!
//! Each action issues at most one backend request. Actions are not
//! serialized against each other; two overlapping sends may complete in
//! either order.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::backend::Backend;
use crate::error::{BackendError, StorageError};
use crate::render::text::directory_query;
use crate::state::{
    DirectoryKind, EXAMPLE_QUERIES, MSG_INVALID_ID, MSG_LOGIN_FAILED, MSG_LOGIN_FOR_DOCTOR,
    MSG_LOGIN_FOR_SPECIALIZATION, MSG_LOGIN_OK, MSG_LOGOUT_FAILED, MSG_LOGOUT_OK,
    MSG_SEND_FAILED, NotificationKind, SessionId, UiEvent, UiState,
};
use crate::storage::SessionStorage;

/// How long a notification stays up, and how long its fade-out lasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationTiming {
    pub display: Duration,
    pub fade: Duration,
}

impl Default for NotificationTiming {
    fn default() -> Self {
        Self {
            display: Duration::from_millis(3000),
            fade: Duration::from_millis(300),
        }
    }
}

/// Drives the UI state from user actions and backend responses.
///
/// Cheap to clone; clones share the same state.
#[derive(Clone)]
pub struct UiController {
    state: Arc<RwLock<UiState>>,
    backend: Arc<dyn Backend>,
    storage: Arc<dyn SessionStorage>,
    timing: NotificationTiming,
}

impl fmt::Debug for UiController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UiController")
            .field("timing", &self.timing)
            .finish_non_exhaustive()
    }
}

impl UiController {
    pub fn new(backend: Arc<dyn Backend>, storage: Arc<dyn SessionStorage>) -> Self {
        Self::with_timing(backend, storage, NotificationTiming::default())
    }

    pub fn with_timing(
        backend: Arc<dyn Backend>,
        storage: Arc<dyn SessionStorage>,
        timing: NotificationTiming,
    ) -> Self {
        Self {
            state: Arc::new(RwLock::new(UiState::new())),
            backend,
            storage,
            timing,
        }
    }

    /// Copy of the current state for rendering.
    pub async fn snapshot(&self) -> UiState {
        self.state.read().await.clone()
    }

    async fn dispatch(&self, event: UiEvent) {
        self.state.write().await.apply(event);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Startup
    // ─────────────────────────────────────────────────────────────────────────

    /// Restore a persisted session, then start the one-time directory fetch.
    ///
    /// The restored session is trusted as-is; the backend is not consulted.
    /// The returned handle completes when the directory fetch finishes.
    pub async fn startup(&self) -> JoinHandle<()> {
        self.restore_session().await;
        let controller = self.clone();
        tokio::spawn(async move { controller.load_directory().await })
    }

    pub async fn restore_session(&self) {
        let raw = match self.storage.load().await {
            Ok(Some(raw)) => raw,
            Ok(None) => return,
            Err(e @ StorageError::Json(_)) => {
                warn!(name: "controller.session.discarded", error = %e, "Discarding unreadable stored session");
                self.clear_stored_session().await;
                return;
            }
            Err(e) => {
                warn!(name: "controller.session.load_failed", error = %e, "Failed to read stored session");
                return;
            }
        };

        match SessionId::parse(&raw) {
            Ok(id) => {
                info!(name: "controller.session.restored", user_id = %id, "Restored stored session");
                self.enter_session(id).await;
            }
            Err(e) => {
                warn!(name: "controller.session.discarded", error = %e, "Discarding malformed stored session");
                self.clear_stored_session().await;
            }
        }
    }

    /// Fetch doctors and specializations. Failures are logged only.
    pub async fn load_directory(&self) {
        match self.backend.directory().await {
            Ok(directory) => {
                info!(
                    name: "controller.directory.loaded",
                    doctors = directory.doctors.len(),
                    specializations = directory.specializations.len(),
                    "Directory loaded"
                );
                self.dispatch(UiEvent::DirectoryLoaded(directory)).await;
            }
            Err(e) => {
                error!(name: "controller.directory.failed", error = %e, "Failed to fetch doctors and specializations");
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Login / logout
    // ─────────────────────────────────────────────────────────────────────────

    /// Handle the login form: validate locally, then [`login`](Self::login).
    ///
    /// Invalid input never reaches the backend.
    pub async fn submit_login(&self, raw: &str) {
        self.dispatch(UiEvent::IdInputChanged(raw.to_owned())).await;
        match SessionId::parse(raw.trim()) {
            Ok(id) => self.login(id).await,
            Err(_) => self.notify(NotificationKind::Error, MSG_INVALID_ID).await,
        }
    }

    pub async fn login(&self, id: SessionId) {
        self.dispatch(UiEvent::RequestStarted).await;
        let result = self.backend.login(&id).await;
        self.dispatch(UiEvent::RequestFinished).await;

        match result {
            Ok(_) => {
                info!(name: "controller.login.succeeded", user_id = %id, "Login succeeded");
                self.enter_session(id).await;
                self.notify(NotificationKind::Success, MSG_LOGIN_OK).await;
            }
            Err(e) => {
                warn!(name: "controller.login.failed", error = %e, "Login failed");
                self.notify(NotificationKind::Error, failure_message(&e, MSG_LOGIN_FAILED))
                    .await;
            }
        }
    }

    async fn enter_session(&self, id: SessionId) {
        if let Err(e) = self.storage.store(id.as_str()).await {
            warn!(name: "controller.session.store_failed", error = %e, "Failed to persist session");
        }
        self.dispatch(UiEvent::SessionStarted(id)).await;
    }

    async fn clear_stored_session(&self) {
        if let Err(e) = self.storage.clear().await {
            warn!(name: "controller.session.clear_failed", error = %e, "Failed to clear stored session");
        }
    }

    /// Log out. On failure local state is left untouched, even though the
    /// backend may already have dropped the session.
    pub async fn logout(&self) {
        self.dispatch(UiEvent::RequestStarted).await;
        let result = self.backend.logout().await;
        self.dispatch(UiEvent::RequestFinished).await;

        match result {
            Ok(_) => {
                self.clear_stored_session().await;
                self.dispatch(UiEvent::SessionEnded).await;
                info!(name: "controller.logout.succeeded", "Logged out");
                self.notify(NotificationKind::Success, MSG_LOGOUT_OK).await;
            }
            Err(e) => {
                warn!(name: "controller.logout.failed", error = %e, "Logout failed");
                self.notify(NotificationKind::Error, failure_message(&e, MSG_LOGOUT_FAILED))
                    .await;
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Chat
    // ─────────────────────────────────────────────────────────────────────────

    /// Send a chat message.
    ///
    /// The user's bubble is appended before the request goes out and stays
    /// in the log whatever the outcome.
    pub async fn send_message(&self, text: &str) {
        let message = text.trim();
        if message.is_empty() {
            return;
        }

        self.dispatch(UiEvent::UserMessage(message.to_owned())).await;
        self.dispatch(UiEvent::RequestStarted).await;
        let result = self.backend.chat(message).await;
        self.dispatch(UiEvent::RequestFinished).await;

        match result {
            Ok(reply) => {
                debug!(name: "controller.chat.replied", chars = reply.message.len(), "Bot replied");
                self.dispatch(UiEvent::BotMessage(reply.message)).await;
            }
            Err(e) => {
                warn!(name: "controller.chat.failed", error = %e, "Chat request failed");
                self.dispatch(UiEvent::ChatFailed).await;
                self.notify(NotificationKind::Error, failure_message(&e, MSG_SEND_FAILED))
                    .await;
            }
        }
    }

    pub async fn set_draft(&self, text: impl Into<String>) {
        self.dispatch(UiEvent::DraftChanged(text.into())).await;
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Shortcuts
    // ─────────────────────────────────────────────────────────────────────────

    /// Click on a doctor or specialization.
    ///
    /// Logged in: pre-fills the message box with a templated question.
    /// Logged out: shows a prompt to log in.
    pub async fn select_directory_entry(&self, kind: DirectoryKind, index: usize) {
        let (logged_in, entry) = {
            let state = self.state.read().await;
            (
                state.is_logged_in(),
                state.directory.get(kind, index).map(str::to_owned),
            )
        };
        let Some(entry) = entry else {
            debug!(%kind, index, "Ignoring click on unknown directory entry");
            return;
        };

        if logged_in {
            self.set_draft(directory_query(kind, &entry)).await;
        } else {
            let prompt = match kind {
                DirectoryKind::Doctor => MSG_LOGIN_FOR_DOCTOR,
                DirectoryKind::Specialization => MSG_LOGIN_FOR_SPECIALIZATION,
            };
            self.notify(NotificationKind::Info, prompt).await;
        }
    }

    pub async fn open_examples(&self) {
        self.dispatch(UiEvent::ExamplesOpened).await;
    }

    pub async fn close_examples(&self) {
        self.dispatch(UiEvent::ExamplesClosed).await;
    }

    /// Copy an example query into the message box and close the dialog.
    pub async fn choose_example(&self, index: usize) {
        let mut state = self.state.write().await;
        if let Some(query) = EXAMPLE_QUERIES.get(index) {
            state.apply(UiEvent::DraftChanged((*query).to_owned()));
        } else {
            debug!(index, "Ignoring unknown example query");
        }
        state.apply(UiEvent::ExamplesClosed);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Notifications
    // ─────────────────────────────────────────────────────────────────────────

    /// Show a banner, replacing any current one, and schedule its removal.
    pub async fn notify(&self, kind: NotificationKind, message: impl Into<String>) {
        let id = {
            let mut state = self.state.write().await;
            state.apply(UiEvent::Notify {
                kind,
                message: message.into(),
            });
            state.notification.as_ref().map(|n| n.id)
        };
        if let Some(id) = id {
            self.schedule_dismissal(id);
        }
    }

    fn schedule_dismissal(&self, id: u64) {
        let state = Arc::clone(&self.state);
        let timing = self.timing;
        tokio::spawn(async move {
            tokio::time::sleep(timing.display).await;
            state.write().await.apply(UiEvent::NotificationFaded(id));
            tokio::time::sleep(timing.fade).await;
            state.write().await.apply(UiEvent::NotificationExpired(id));
        });
    }
}

fn failure_message(err: &BackendError, fallback: &str) -> String {
    err.server_message().unwrap_or(fallback).to_owned()
}
