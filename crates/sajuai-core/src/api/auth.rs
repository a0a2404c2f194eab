use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::auth::Session;
use crate::models::{LoginResponse, OAuthProvider, User, UserProfile};

use super::{ApiClient, ApiError};

impl ApiClient {
    /// Exchange an OAuth authorization code for tokens and the user record
    pub async fn oauth_callback(
        &self,
        provider: OAuthProvider,
        code: &str,
    ) -> Result<LoginResponse, ApiError> {
        let path = format!("/auth/oauth/{}/callback", provider.callback_segment());
        self.post(&path, &json!({ "code": code })).await
    }

    /// Complete an OAuth sign-in and store the resulting session
    pub async fn login_with_oauth(
        &self,
        provider: OAuthProvider,
        code: &str,
    ) -> Result<User, ApiError> {
        let login = self.oauth_callback(provider, code).await?;
        let session = Session::from(login);
        let user = session.user.clone();
        self.token_store().set(session)?;
        info!(user_id = user.id, %provider, "Signed in");
        Ok(user)
    }

    pub async fn current_user(&self) -> Result<User, ApiError> {
        self.get("/auth/me").await
    }

    /// Ask the backend who we are and refresh the stored user.
    ///
    /// Returns `None` when not signed in or the session is no longer
    /// accepted; that is the normal signed-out outcome, not an error.
    pub async fn check_auth(&self) -> Option<User> {
        match self.current_user().await {
            Ok(user) => {
                if let Err(e) = self.token_store().update_user(user.clone()) {
                    warn!(error = %e, "Failed to persist user");
                }
                Some(user)
            }
            Err(e) => {
                debug!(error = %e, "Not authenticated");
                None
            }
        }
    }

    /// Invalidate the refresh token on the server and drop the local session.
    ///
    /// The local session is cleared even when the server call fails; the
    /// server error is still returned.
    pub async fn logout(&self) -> Result<(), ApiError> {
        let server_result = self.revoke_refresh_token().await;
        self.token_store().clear()?;
        info!("Signed out");
        server_result
    }

    /// `POST /auth/logout` with the current refresh token. If the call
    /// itself triggered a refresh, the token it carried is already dead, so
    /// the rotated one is revoked too.
    async fn revoke_refresh_token(&self) -> Result<(), ApiError> {
        let Some(mut sent) = self.token_store().refresh_token() else {
            return Ok(());
        };
        loop {
            self.post::<Value, _>("/auth/logout", &json!({ "refreshToken": sent }))
                .await?;
            match self.token_store().refresh_token() {
                Some(current) if current != sent => {
                    debug!("Refresh token rotated during logout, revoking the new one");
                    sent = current;
                }
                _ => return Ok(()),
            }
        }
    }

    /// Unlink an OAuth provider from the account
    pub async fn disconnect_provider(&self, provider: OAuthProvider) -> Result<Value, ApiError> {
        let path = format!("/auth/disconnect/{}", provider.wire_name());
        self.post_empty(&path).await
    }

    /// Saved birth profile, if the user has one
    pub async fn get_profile(&self) -> Result<Option<UserProfile>, ApiError> {
        self.get("/auth/profile").await
    }

    pub async fn save_profile(&self, profile: &UserProfile) -> Result<UserProfile, ApiError> {
        self.post("/auth/profile", profile).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use crate::api::client::tests::{client_for, signed_in_store, FakeBackend};
    use crate::api::transport::MockTransport;
    use crate::api::{ApiClient, HttpResponse};
    use crate::auth::TokenStore;
    use crate::models::{Gender, OAuthProvider, UserProfile};
    use crate::storage::MemoryStorage;

    const LOGIN_BODY: &str = r#"{"accessToken":"A1","refreshToken":"R1","user":{"id":5,"email":"k@kakao.com","username":"카카오유저","provider":"KAKAO"}}"#;

    #[tokio::test]
    async fn test_login_with_oauth_stores_session() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|req| {
                req.path == "/auth/oauth/kakao/callback"
                    && req.body.as_deref() == Some(br#"{"code":"abc"}"#.as_slice())
            })
            .times(1)
            .returning(|_| Ok(HttpResponse::new(200, LOGIN_BODY)));

        let storage = Arc::new(MemoryStorage::new());
        let store = Arc::new(TokenStore::new(storage.clone()));
        let client = ApiClient::with_transport(Arc::new(transport), store.clone());

        let user = client
            .login_with_oauth(OAuthProvider::Kakao, "abc")
            .await
            .unwrap();

        assert_eq!(user.id, 5);
        assert_eq!(store.access_token().as_deref(), Some("A1"));
        assert_eq!(store.refresh_token().as_deref(), Some("R1"));

        // Persisted for the next start
        let restarted = TokenStore::open(storage);
        assert_eq!(restarted.user_id(), Some(5));
    }

    #[tokio::test]
    async fn test_logout_sends_refresh_token_and_clears() {
        let backend = Arc::new(FakeBackend::new("A1").respond(
            "/auth/logout",
            200,
            r#"{"message":"Logged out successfully"}"#,
        ));
        let store = signed_in_store("A1", "R1");
        let client = client_for(&backend, &store);

        client.logout().await.unwrap();

        assert_eq!(backend.paths(), vec!["/auth/logout".to_string()]);
        assert_eq!(
            *backend.last_body.lock().unwrap(),
            Some(json!({ "refreshToken": "R1" }))
        );
        assert!(!store.is_authenticated());
    }

    #[tokio::test]
    async fn test_logout_with_expired_access_token_revokes_rotated_token() {
        let backend = Arc::new(FakeBackend::new("A2").with_refresh_pairs(&[("A2", "R2")]));
        let store = signed_in_store("A1", "R1");
        let client = client_for(&backend, &store);

        client.logout().await.unwrap();

        assert_eq!(*backend.refresh_tokens_seen.lock().unwrap(), vec!["R1".to_string()]);
        assert_eq!(
            *backend.last_body.lock().unwrap(),
            Some(json!({ "refreshToken": "R2" }))
        );
        assert_eq!(backend.refresh_count(), 1);
        assert!(!store.is_authenticated());
    }

    #[tokio::test]
    async fn test_logout_clears_even_when_server_fails() {
        let backend = Arc::new(FakeBackend::new("A1").respond(
            "/auth/logout",
            500,
            r#"{"message":"Logout failed"}"#,
        ));
        let store = signed_in_store("A1", "R1");
        let client = client_for(&backend, &store);

        let err = client.logout().await.unwrap_err();
        assert_eq!(err.to_string(), "Server error: Logout failed");
        assert!(!store.is_authenticated());
    }

    #[tokio::test]
    async fn test_check_auth_updates_user() {
        let backend = Arc::new(FakeBackend::new("A1").respond(
            "/auth/me",
            200,
            r#"{"id":1,"email":"tester@example.com","username":"새이름","provider":"GOOGLE","isActive":true}"#,
        ));
        let store = signed_in_store("A1", "R1");
        let client = client_for(&backend, &store);

        let user = client.check_auth().await.expect("signed in");
        assert_eq!(user.username.as_deref(), Some("새이름"));
        assert_eq!(
            store.user().and_then(|u| u.username),
            Some("새이름".to_string())
        );
    }

    #[tokio::test]
    async fn test_check_auth_signed_out_is_none() {
        let backend = Arc::new(FakeBackend::new("A1"));
        let store = Arc::new(TokenStore::new(Arc::new(MemoryStorage::new())));
        let client = client_for(&backend, &store);

        assert!(client.check_auth().await.is_none());
    }

    #[tokio::test]
    async fn test_disconnect_uses_upper_case_provider() {
        let backend = Arc::new(FakeBackend::new("A1"));
        let store = signed_in_store("A1", "R1");
        let client = client_for(&backend, &store);

        client
            .disconnect_provider(OAuthProvider::Google)
            .await
            .unwrap();
        assert_eq!(backend.paths(), vec!["/auth/disconnect/GOOGLE".to_string()]);
    }

    #[tokio::test]
    async fn test_profile_roundtrip() {
        let saved = r#"{"id":3,"userId":1,"year":1988,"month":8,"day":8,"hour":8,"minute":0,"gender":"MALE","isLunar":true}"#;
        let backend = Arc::new(FakeBackend::new("A1").respond("/auth/profile", 200, saved));
        let store = signed_in_store("A1", "R1");
        let client = client_for(&backend, &store);

        let profile = UserProfile {
            id: None,
            user_id: None,
            name: None,
            year: 1988,
            month: 8,
            day: 8,
            hour: 8,
            minute: 0,
            gender: Gender::Male,
            is_lunar: true,
            birth_data_id: None,
        };
        let stored = client.save_profile(&profile).await.unwrap();
        assert_eq!(stored.id, Some(3));
        assert_eq!(
            *backend.last_body.lock().unwrap(),
            Some(json!({"year":1988,"month":8,"day":8,"hour":8,"minute":0,"gender":"MALE","isLunar":true}))
        );

        let fetched = client.get_profile().await.unwrap();
        assert_eq!(fetched, Some(stored));
    }

    #[tokio::test]
    async fn test_missing_profile_is_none() {
        let backend = Arc::new(FakeBackend::new("A1").respond("/auth/profile", 200, ""));
        let store = signed_in_store("A1", "R1");
        let client = client_for(&backend, &store);

        assert_eq!(client.get_profile().await.unwrap(), None);
    }
}
