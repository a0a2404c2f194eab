//! Core library for the SajuAI client.
//!
//! This crate contains the client-side logic shared by front-ends:
//! - `api`: authenticated HTTP client with transparent token refresh, plus
//!   one typed method per backend endpoint
//! - `auth`: the signed-in session and its persistent `TokenStore`
//! - `cache`: last and recent Saju analysis results
//! - `config`: file and environment configuration
//! - `models`: request and response records
//! - `storage`: file, keychain and in-memory key/value backends

pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod models;
pub mod storage;

pub use api::{ApiClient, ApiError, ErrorKind};
pub use auth::{Session, TokenStore};
pub use cache::ResultCache;
pub use config::Config;
pub use storage::{FileStorage, KeyringStorage, MemoryStorage, Storage, StoreError};
