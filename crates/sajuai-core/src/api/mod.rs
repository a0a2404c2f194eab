//! REST API client module for the SajuAI backend.
//!
//! `ApiClient` owns the request pipeline (bearer attachment, single-flight
//! token refresh, error mapping). The resource modules add one typed method
//! per backend endpoint:
//!
//! - `auth`: OAuth login, token refresh, logout, profile
//! - `saju`: four-pillars analysis and history
//! - `fortune`: daily fortune, lucky items, zodiac, daily message, gacha,
//!   hourly and Tojeong fortunes
//! - `calendar`: lunar/solar conversion and lucky-day search
//! - `compatibility`, `tarot`, `dream`, `name`: one reading each

pub mod auth;
pub mod calendar;
pub mod client;
pub mod compatibility;
pub mod dream;
pub mod error;
pub mod fortune;
pub mod name;
pub mod request;
pub mod saju;
pub mod tarot;
pub mod transport;

pub use client::ApiClient;
pub use error::{ApiError, ErrorBody, ErrorKind, ErrorPayload, TransportError};
pub use request::{ApiRequest, HttpMethod, HttpResponse};
pub use transport::{ReqwestTransport, Transport};
