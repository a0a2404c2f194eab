use bytes::Bytes;
use serde::{de::DeserializeOwned, Serialize};

use super::ApiError;

pub const AUTHORIZATION: &str = "Authorization";
pub const CONTENT_TYPE: &str = "Content-Type";
pub const ACCEPT: &str = "Accept";
const JSON: &str = "application/json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
        }
    }
}

/// Immutable description of a backend call.
///
/// `path` is relative to the configured base URL (e.g. `/saju/history`).
/// The client never mutates a request it was given; the interceptor
/// produces a new copy carrying the credential for each attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Bytes>,
}

impl ApiRequest {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: vec![
                (CONTENT_TYPE.to_string(), JSON.to_string()),
                (ACCEPT.to_string(), JSON.to_string()),
            ],
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ApiError> {
        let encoded = serde_json::to_vec(body)
            .map_err(|e| ApiError::InvalidRequest(format!("Failed to encode request body: {}", e)))?;
        self.body = Some(Bytes::from(encoded));
        Ok(self)
    }

    /// Set a header, replacing any existing value (names compare case-insensitively)
    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
        self.headers.push((name.to_string(), value.into()));
        self
    }

    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Copy of this request carrying `token` as a bearer credential
    pub fn with_bearer(&self, token: &str) -> Self {
        self.clone().header(AUTHORIZATION, format!("Bearer {}", token))
    }
}

/// Response as seen by the client: status plus raw body
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Bytes,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }

    /// Decode the body as JSON. An empty body decodes as JSON `null`, so
    /// `()`, `Option<T>` and `serde_json::Value` all accept it.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        let body: &[u8] = if self.body.iter().all(u8::is_ascii_whitespace) {
            b"null"
        } else {
            &self.body
        };
        serde_json::from_slice(body)
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse JSON response: {}", e)))
    }
}

/// One trip through the interceptor pipeline: the token the request was
/// sent with and whether it is already the post-refresh retry.
#[derive(Debug, Clone)]
pub(crate) struct Attempt {
    pub token: Option<String>,
    pub retried: bool,
}

impl Attempt {
    pub fn first(token: Option<String>) -> Self {
        Self {
            token,
            retried: false,
        }
    }

    pub fn retry_with(token: String) -> Self {
        Self {
            token: Some(token),
            retried: true,
        }
    }
}
