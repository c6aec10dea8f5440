//! Shared test doubles.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bookmydoc_ui::backend::{Backend, ChatReply, StatusBody};
use bookmydoc_ui::controller::UiController;
use bookmydoc_ui::error::{BackendError, Result};
use bookmydoc_ui::state::{Directory, SessionId};
use bookmydoc_ui::storage::MemorySessionStorage;
use tokio::sync::Notify;

/// Scripted backend recording every call it receives.
#[derive(Debug, Default)]
pub struct FakeBackend {
    pub calls: Mutex<Vec<String>>,
    /// `Some(message)` makes the call fail with that optional server message.
    pub login_error: Option<Option<String>>,
    pub logout_error: Option<Option<String>>,
    pub chat_error: Option<Option<String>>,
    pub directory: Option<Directory>,
    /// When set, chat replies wait until notified.
    pub chat_gate: Option<Arc<Notify>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self {
            directory: Some(sample_directory()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    fn api_error(status: u16, message: &Option<String>) -> BackendError {
        BackendError::Api {
            status,
            message: message.clone(),
        }
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn login(&self, id: &SessionId) -> Result<StatusBody> {
        self.record(format!("login:{id}"));
        match &self.login_error {
            Some(message) => Err(Self::api_error(400, message)),
            None => Ok(StatusBody {
                status: Some("success".into()),
                message: Some("Login successful".into()),
            }),
        }
    }

    async fn logout(&self) -> Result<StatusBody> {
        self.record("logout");
        match &self.logout_error {
            Some(message) => Err(Self::api_error(500, message)),
            None => Ok(StatusBody::default()),
        }
    }

    async fn chat(&self, message: &str) -> Result<ChatReply> {
        self.record(format!("chat:{message}"));
        if let Some(gate) = &self.chat_gate {
            gate.notified().await;
        }
        match &self.chat_error {
            Some(error) => Err(Self::api_error(500, error)),
            None => Ok(ChatReply {
                message: format!("You said: {message}"),
            }),
        }
    }

    async fn directory(&self) -> Result<Directory> {
        self.record("directory");
        self.directory.clone().ok_or(BackendError::Api {
            status: 503,
            message: None,
        })
    }
}

pub fn sample_directory() -> Directory {
    Directory {
        doctors: vec!["john doe".into(), "emily johnson".into()],
        specializations: vec!["general_dentist".into(), "oral_surgeon".into()],
    }
}

pub fn controller_with(
    backend: FakeBackend,
    storage: MemorySessionStorage,
) -> (UiController, Arc<FakeBackend>, Arc<MemorySessionStorage>) {
    let backend = Arc::new(backend);
    let storage = Arc::new(storage);
    let controller = UiController::new(backend.clone(), storage.clone());
    (controller, backend, storage)
}

pub fn session(raw: &str) -> SessionId {
    SessionId::parse(raw).unwrap()
}
