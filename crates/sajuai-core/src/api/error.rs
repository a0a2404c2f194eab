use std::fmt;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::storage::StoreError;

/// Failure before any HTTP status was received
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("{0}")]
    Network(String),
}

/// Broad failure class, for callers that only need to pick a reaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Network unreachable or timed out; the caller may offer a retry
    Transport,
    /// The session is missing or no longer valid; the user must sign in again
    Authorization,
    /// The server rejected the call; its message should be shown as-is
    Domain,
    /// Local problem: encoding, decoding or session persistence failure
    Client,
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("Unauthorized - token may be expired")]
    Unauthorized,

    #[error("Session expired - please sign in again")]
    SessionExpired,

    #[error("Access denied: {0}")]
    AccessDenied(ErrorBody),

    #[error("Resource not found: {0}")]
    NotFound(ErrorBody),

    #[error("Rate limited - please wait before retrying")]
    RateLimited,

    #[error("Request rejected ({status}): {body}")]
    Rejected { status: u16, body: ErrorBody },

    #[error("Server error: {0}")]
    ServerError(ErrorBody),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Failed to persist session: {0}")]
    Storage(#[from] StoreError),
}

impl From<TransportError> for ApiError {
    fn from(e: TransportError) -> Self {
        match e {
            TransportError::Timeout(after) => ApiError::Timeout(after),
            TransportError::Network(msg) => ApiError::Network(msg),
        }
    }
}

impl ApiError {
    pub fn from_status(status: u16, body: &[u8]) -> Self {
        let parsed = ErrorBody::parse(body);
        match status {
            401 => ApiError::Unauthorized,
            403 => ApiError::AccessDenied(parsed),
            404 => ApiError::NotFound(parsed),
            429 => ApiError::RateLimited,
            500..=599 => ApiError::ServerError(parsed),
            _ => ApiError::Rejected {
                status,
                body: parsed,
            },
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Network(_) | ApiError::Timeout(_) => ErrorKind::Transport,
            ApiError::Unauthorized | ApiError::SessionExpired => ErrorKind::Authorization,
            ApiError::AccessDenied(_)
            | ApiError::NotFound(_)
            | ApiError::RateLimited
            | ApiError::Rejected { .. }
            | ApiError::ServerError(_) => ErrorKind::Domain,
            ApiError::InvalidResponse(_) | ApiError::InvalidRequest(_) | ApiError::Storage(_) => {
                ErrorKind::Client
            }
        }
    }

    /// Server-provided error payload, when the backend sent one
    pub fn payload(&self) -> Option<&ErrorPayload> {
        match self {
            ApiError::AccessDenied(body)
            | ApiError::NotFound(body)
            | ApiError::ServerError(body)
            | ApiError::Rejected { body, .. } => body.payload.as_ref(),
            _ => None,
        }
    }

    /// True when the session has been (or must be) dropped
    pub fn requires_sign_in(&self) -> bool {
        self.kind() == ErrorKind::Authorization
    }
}

/// Error body as sent by the backend's exception handler
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    pub status: Option<u16>,
    pub error: Option<String>,
    pub message: Option<String>,
    pub path: Option<String>,
    pub timestamp: Option<serde_json::Value>,
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// A non-success response body: the parsed payload if it was one, plus the
/// raw text (truncated) for everything else.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ErrorBody {
    pub payload: Option<ErrorPayload>,
    pub raw: String,
}

impl ErrorBody {
    pub fn parse(body: &[u8]) -> Self {
        let payload = serde_json::from_slice::<ErrorPayload>(body)
            .ok()
            .filter(|p| p.message.is_some() || p.error.is_some());
        let text = String::from_utf8_lossy(body);
        Self {
            payload,
            raw: truncate_body(text.trim()),
        }
    }

    /// Most specific message available
    pub fn message(&self) -> Option<&str> {
        self.payload
            .as_ref()
            .and_then(|p| p.message.as_deref().or(p.error.as_deref()))
            .or_else(|| Some(self.raw.as_str()).filter(|r| !r.is_empty()))
    }
}

impl fmt::Display for ErrorBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message().unwrap_or("(empty body)"))
    }
}

/// Truncate a response body to avoid logging excessive data
fn truncate_body(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY_LENGTH {
        return body.to_string();
    }
    let mut end = MAX_ERROR_BODY_LENGTH;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
}
