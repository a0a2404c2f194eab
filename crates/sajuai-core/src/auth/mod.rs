//! Session state for the signed-in user.
//!
//! This module provides:
//! - `Session`, `Credential`: the user identity and bearer token pair
//! - `TokenStore`: the single owner of the current session, persisted
//!   through a `Storage` backend and restored at startup
//!
//! The store is constructed once by the application and shared by
//! `Arc` with the API client; there is no global session.

pub mod session;
pub mod token_store;

pub use session::{Credential, Session};
pub use token_store::{TokenStore, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, USER_KEY};
