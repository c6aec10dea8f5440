//! Session identifier and its client-side format check.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Returns `true` when `id` is exactly 7 or 8 ASCII decimal digits.
///
/// This is a pre-submission filter only; the backend performs its own check.
pub fn validate_id(id: &str) -> bool {
    (7..=8).contains(&id.len()) && id.bytes().all(|b| b.is_ascii_digit())
}

/// Rejected session identifier.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid session id: expected 7-8 digits, got {0:?}")]
pub struct InvalidSessionId(pub String);

/// A session identifier that passed [`validate_id`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SessionId(String);

impl SessionId {
    /// Validate and wrap a raw identifier. No trimming is performed.
    pub fn parse(raw: &str) -> Result<Self, InvalidSessionId> {
        if validate_id(raw) {
            Ok(Self(raw.to_owned()))
        } else {
            Err(InvalidSessionId(raw.to_owned()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SessionId {
    type Error = InvalidSessionId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if validate_id(&value) {
            Ok(Self(value))
        } else {
            Err(InvalidSessionId(value))
        }
    }
}

impl From<SessionId> for String {
    fn from(id: SessionId) -> Self {
        id.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
