//! Local cache of Saju analysis results.
//!
//! `ResultCache` keeps the most recent analysis and a short list of recent
//! ones on top of any `Storage` backend, so the last reading can be shown
//! again without a network round trip. Entries carry the time they were
//! cached.

pub mod manager;

pub use manager::{CachedData, ResultCache, MAX_RECENT};
