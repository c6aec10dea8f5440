//! `reqwest` implementation of [`Backend`].

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use super::{Backend, ChatReply, ChatRequest, LoginRequest, StatusBody};
use crate::error::{BackendError, Result};
use crate::state::{Directory, SessionId};

/// HTTP client for the appointment backend.
///
/// The backend tracks the logged-in user in a session cookie, so the
/// underlying client keeps a cookie jar for its whole lifetime.
///
/// # Example
///
/// ```rust,no_run
/// use bookmydoc_ui::backend::{Backend, HttpBackend};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let backend = HttpBackend::new("http://localhost:5000")?;
/// let directory = backend.directory().await?;
/// println!("{} doctors", directory.doctors.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpBackend {
    base_url: Url,
    http: reqwest::Client,
}

impl HttpBackend {
    /// Create a client for the backend at `base_url`.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        let http = reqwest::Client::builder().cookie_store(true).build()?;
        Self::with_client(base_url, http)
    }

    /// Create a client with a custom reqwest client.
    pub fn with_client(base_url: impl AsRef<str>, http: reqwest::Client) -> Result<Self> {
        let mut base_url = Url::parse(base_url.as_ref())?;
        // Relative joins replace the last segment unless the path ends in '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        let body = response.text().await?;
        if status.is_success() {
            Ok(serde_json::from_str(&body)?)
        } else {
            // Error bodies are optional and may not be JSON at all.
            let message = serde_json::from_str::<StatusBody>(&body)
                .ok()
                .and_then(|b| b.message);
            debug!(status = status.as_u16(), ?message, "Backend returned an error status");
            Err(BackendError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn login(&self, id: &SessionId) -> Result<StatusBody> {
        let response = self
            .http
            .post(self.url("login")?)
            .json(&LoginRequest {
                id_number: id.as_str(),
            })
            .send()
            .await?;
        Self::handle_response(response).await
    }

    async fn logout(&self) -> Result<StatusBody> {
        let response = self
            .http
            .post(self.url("logout")?)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await?;
        Self::handle_response(response).await
    }

    async fn chat(&self, message: &str) -> Result<ChatReply> {
        let response = self
            .http
            .post(self.url("chat")?)
            .json(&ChatRequest { message })
            .send()
            .await?;
        Self::handle_response(response).await
    }

    async fn directory(&self) -> Result<Directory> {
        let response = self.http.get(self.url("doctors")?).send().await?;
        Self::handle_response(response).await
    }
}
