use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::birth::Gender;

/// Supported OAuth sign-in providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OAuthProvider {
    Google,
    Kakao,
}

impl OAuthProvider {
    /// Lower-case segment used in `/auth/oauth/{provider}/callback`
    pub fn callback_segment(&self) -> &'static str {
        match self {
            OAuthProvider::Google => "google",
            OAuthProvider::Kakao => "kakao",
        }
    }

    /// Upper-case name the backend uses in `/auth/disconnect/{provider}`
    pub fn wire_name(&self) -> &'static str {
        match self {
            OAuthProvider::Google => "GOOGLE",
            OAuthProvider::Kakao => "KAKAO",
        }
    }
}

impl fmt::Display for OAuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.callback_segment())
    }
}

impl FromStr for OAuthProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "google" => Ok(OAuthProvider::Google),
            "kakao" => Ok(OAuthProvider::Kakao),
            other => Err(format!("unknown OAuth provider: {}", other)),
        }
    }
}

/// Signed-in user as reported by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub email: Option<String>,
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image_url: Option<String>,
    pub provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_profile: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl User {
    /// Name to show for this user, falling back to email then id
    pub fn display_name(&self) -> String {
        self.username
            .clone()
            .filter(|n| !n.is_empty())
            .or_else(|| self.email.clone())
            .unwrap_or_else(|| format!("user #{}", self.id))
    }
}

/// Access/refresh token pair returned by the refresh exchange
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// OAuth callback exchange response
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: User,
}

/// Saved birth profile attached to an account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub gender: Gender,
    pub is_lunar: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_data_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_parsing_and_segments() {
        assert_eq!("Google".parse::<OAuthProvider>(), Ok(OAuthProvider::Google));
        assert_eq!("KAKAO".parse::<OAuthProvider>(), Ok(OAuthProvider::Kakao));
        assert!("naver".parse::<OAuthProvider>().is_err());

        assert_eq!(OAuthProvider::Kakao.callback_segment(), "kakao");
        assert_eq!(OAuthProvider::Google.wire_name(), "GOOGLE");
    }

    #[test]
    fn test_parse_login_response() {
        let json = r#"{"accessToken":"A1","refreshToken":"R1","user":{"id":7,"email":"a@b.kr","username":"김철수","profileImageUrl":null,"provider":"KAKAO","hasProfile":false}}"#;
        let login: LoginResponse = serde_json::from_str(json).expect("login json");

        assert_eq!(login.access_token, "A1");
        assert_eq!(login.refresh_token, "R1");
        assert_eq!(login.user.id, 7);
        assert_eq!(login.user.provider.as_deref(), Some("KAKAO"));
        assert_eq!(login.user.has_profile, Some(false));
        assert_eq!(login.user.display_name(), "김철수");
    }

    #[test]
    fn test_user_display_name_fallbacks() {
        let mut user = User {
            id: 3,
            email: Some("x@y.com".to_string()),
            username: Some(String::new()),
            profile_image_url: None,
            provider: None,
            has_profile: None,
            is_active: None,
        };
        assert_eq!(user.display_name(), "x@y.com");

        user.email = None;
        assert_eq!(user.display_name(), "user #3");
    }
}
