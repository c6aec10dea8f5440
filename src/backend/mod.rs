//! Appointment backend API.
//!
//! The backend owns authentication, the chat agent and the doctor data; this
//! crate only consumes its HTTP responses. [`Backend`] is the seam the
//! controller depends on, [`HttpBackend`] the production implementation.
//!
//! | Call | Request | Success body |
//! |------|---------|--------------|
//! | `POST /login` | `{"id_number": "..."}` | `{"status", "message"}` |
//! | `POST /logout` | none | `{"status", "message"}` |
//! | `POST /chat` | `{"message": "..."}` | `{"message": "..."}` |
//! | `GET /doctors` | none | `{"doctors": [...], "specializations": [...]}` |
//!
//! Error responses may carry `{"message": "..."}`.

mod client;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::state::{Directory, SessionId};

pub use client::HttpBackend;

/// Body of `POST /login`.
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub id_number: &'a str,
}

/// Body of `POST /chat`.
#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub message: &'a str,
}

/// Generic `{status, message}` body used by login/logout and by errors.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusBody {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Successful `POST /chat` response: the bot's reply.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatReply {
    pub message: String,
}

/// The calls the UI controller makes against the backend.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn login(&self, id: &SessionId) -> Result<StatusBody>;

    async fn logout(&self) -> Result<StatusBody>;

    async fn chat(&self, message: &str) -> Result<ChatReply>;

    async fn directory(&self) -> Result<Directory>;
}
