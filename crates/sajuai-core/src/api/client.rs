//! Authenticated API client for the SajuAI backend.
//!
//! Every call goes through the same pipeline:
//!
//! 1. The request interceptor copies the request and attaches the current
//!    access token as a bearer credential.
//! 2. A 401 on a first attempt hands over to the refresh coordinator, which
//!    exchanges the refresh token (once, shared by all concurrent callers)
//!    and resends the request with the new access token.
//! 3. A 401 on the retry, or a failed refresh, clears the session and
//!    surfaces `ApiError::SessionExpired`.
//! 4. Everything else is logged and returned to the caller unchanged.

use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::auth::TokenStore;
use crate::config::Config;
use crate::models::TokenPair;

use super::error::ApiError;
use super::request::{ApiRequest, Attempt, HttpResponse};
use super::transport::{ReqwestTransport, Transport};

/// Path of the token refresh exchange
pub(crate) const REFRESH_PATH: &str = "/auth/refresh";

/// API client for SajuAI.
/// Clone is cheap - the transport, token store and refresh lock are shared.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    tokens: Arc<TokenStore>,
    /// Serializes refresh exchanges so concurrent 401s trigger only one
    refresh_lock: Arc<Mutex<()>>,
}

impl ApiClient {
    /// Create a client talking to the configured backend over HTTP
    pub fn new(config: &Config, tokens: Arc<TokenStore>) -> Result<Self, ApiError> {
        let transport = ReqwestTransport::new(config.api_url.clone(), config.timeout())?;
        debug!(api_url = %config.api_url, timeout_secs = config.timeout_secs, "API client created");
        Ok(Self::with_transport(Arc::new(transport), tokens))
    }

    pub fn with_transport(transport: Arc<dyn Transport>, tokens: Arc<TokenStore>) -> Self {
        Self {
            transport,
            tokens,
            refresh_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn token_store(&self) -> &Arc<TokenStore> {
        &self.tokens
    }

    /// Request interceptor: copy of `request` carrying `token`, if any
    fn authorize(request: &ApiRequest, token: Option<&str>) -> ApiRequest {
        match token {
            Some(token) if !token.is_empty() => request.with_bearer(token),
            _ => request.clone(),
        }
    }

    /// Send `request`, recovering from one expired access token.
    ///
    /// Returns the successful response; any non-2xx status is mapped to an
    /// `ApiError`.
    pub async fn execute(&self, request: ApiRequest) -> Result<HttpResponse, ApiError> {
        let mut attempt = Attempt::first(self.tokens.access_token());

        loop {
            let outgoing = Self::authorize(&request, attempt.token.as_deref());
            debug!(
                method = request.method.as_str(),
                path = %request.path,
                retried = attempt.retried,
                "Sending request"
            );

            let response = match self.transport.send(outgoing).await {
                Ok(response) => response,
                Err(e) => {
                    warn!(path = %request.path, error = %e, "Network error");
                    return Err(e.into());
                }
            };

            if response.is_success() {
                return Ok(response);
            }

            if !response.is_unauthorized() {
                let err = ApiError::from_status(response.status, &response.body);
                warn!(path = %request.path, status = response.status, error = %err, "API error");
                return Err(err);
            }

            if attempt.retried {
                warn!(path = %request.path, "Still unauthorized after token refresh, clearing session");
                self.invalidate_session();
                return Err(ApiError::SessionExpired);
            }

            let token = self.refresh_after_unauthorized(attempt.token.as_deref()).await?;
            attempt = Attempt::retry_with(token);
        }
    }

    /// Obtain a usable access token after a 401 on a request sent with
    /// `stale`.
    ///
    /// Holding the refresh lock, a caller first checks whether somebody else
    /// already replaced `stale`; only if not does it spend the refresh token.
    /// The exchange runs as its own task that owns the lock guard, so
    /// dropping the caller mid-exchange neither loses the rotated pair nor
    /// lets a waiter spend the old refresh token again.
    async fn refresh_after_unauthorized(&self, stale: Option<&str>) -> Result<String, ApiError> {
        let guard = self.refresh_lock.clone().lock_owned().await;

        if let Some(current) = self.tokens.access_token() {
            if stale != Some(current.as_str()) {
                debug!("Access token already refreshed by another request");
                return Ok(current);
            }
        }

        let Some(refresh_token) = self.tokens.refresh_token() else {
            // A session that vanished while we waited was dropped by a failed refresh
            if stale.is_some() && !self.tokens.is_authenticated() {
                return Err(ApiError::SessionExpired);
            }
            debug!("No refresh token available, propagating 401");
            return Err(ApiError::Unauthorized);
        };

        let client = self.clone();
        let bearer = stale.map(str::to_string);
        let exchange = tokio::spawn(async move {
            let _guard = guard;
            client.rotate_tokens(&refresh_token, bearer.as_deref()).await
        });

        match exchange.await {
            Ok(result) => result,
            Err(e) => {
                warn!(error = %e, "Token refresh task failed");
                Err(ApiError::InvalidResponse(format!("Token refresh task failed: {}", e)))
            }
        }
    }

    /// Spend `refresh_token` and store the new pair. Must run under the
    /// refresh lock.
    async fn rotate_tokens(
        &self,
        refresh_token: &str,
        bearer: Option<&str>,
    ) -> Result<String, ApiError> {
        let pair = match self.exchange_refresh_token(refresh_token, bearer).await {
            Ok(pair) => pair,
            Err(e) => {
                warn!(error = %e, "Token refresh failed, clearing session");
                self.invalidate_session();
                return Err(ApiError::SessionExpired);
            }
        };

        let access_token = pair.access_token.clone();
        match self.tokens.set_tokens(pair) {
            Ok(true) => {}
            Ok(false) => {
                debug!("Session ended during token refresh, not retrying");
                return Err(ApiError::SessionExpired);
            }
            // The in-memory session already holds the new pair
            Err(e) => warn!(error = %e, "Failed to persist refreshed tokens"),
        }
        info!("Access token refreshed");
        Ok(access_token)
    }

    /// `POST /auth/refresh` straight through the transport, outside the
    /// retry loop
    async fn exchange_refresh_token(
        &self,
        refresh_token: &str,
        bearer: Option<&str>,
    ) -> Result<TokenPair, ApiError> {
        let request = ApiRequest::post(REFRESH_PATH)
            .json(&serde_json::json!({ "refreshToken": refresh_token }))?;
        let response = self
            .transport
            .send(Self::authorize(&request, bearer))
            .await?;

        if !response.is_success() {
            return Err(ApiError::from_status(response.status, &response.body));
        }
        response.json()
    }

    fn invalidate_session(&self) {
        if let Err(e) = self.tokens.clear() {
            warn!(error = %e, "Failed to clear persisted session");
        }
    }

    // ===== JSON helpers used by the resource modules =====

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.execute(ApiRequest::get(path)).await?.json()
    }

    pub(crate) async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.execute(ApiRequest::post(path).json(body)?)
            .await?
            .json()
    }

    /// POST with no request body
    pub(crate) async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.execute(ApiRequest::post(path)).await?.json()
    }

    /// GET returning the raw body, for non-JSON downloads
    pub(crate) async fn get_bytes(&self, path: &str) -> Result<bytes::Bytes, ApiError> {
        let request = ApiRequest::get(path).header(super::request::ACCEPT, "*/*");
        Ok(self.execute(request).await?.body)
    }
}
