use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::{LoginResponse, TokenPair, User};

/// Bearer credential pair. Values are opaque to the client.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    pub access_token: String,
    pub refresh_token: String,
}

// Keep tokens out of logs and panic messages
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}

impl From<TokenPair> for Credential {
    fn from(pair: TokenPair) -> Self {
        Self {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub user: User,
    pub credential: Credential,
}

impl Session {
    pub fn new(user: User, credential: Credential) -> Self {
        Self { user, credential }
    }
}

impl From<LoginResponse> for Session {
    fn from(login: LoginResponse) -> Self {
        Self {
            user: login.user,
            credential: Credential {
                access_token: login.access_token,
                refresh_token: login.refresh_token,
            },
        }
    }
}
