//! Data models exchanged with the SajuAI backend.
//!
//! - `User`, `UserProfile`, `OAuthProvider`: account and login types
//! - `BirthData`, `Gender`: the birth record most fortune calls take
//! - Fortune request records: zodiac, calendar, compatibility, tarot,
//!   dream, lucky day, name analysis, tojeong
//! - `AnalysisResult`: a Saju analysis as returned by the backend
//!
//! Field names follow the backend's camelCase JSON.

pub mod analysis;
pub mod birth;
pub mod fortune;
pub mod user;

pub use analysis::AnalysisResult;
pub use birth::{BirthData, Gender};
pub use fortune::{
    CalendarConversionRequest, ChineseZodiac, CompatibilityRequest,
    DreamInterpretationRequest, LuckyDayRequest, NameAnalysisRequest, PersonBirth,
    TarotReadingRequest, TojeongRequest, ZodiacFortuneRequest,
};
pub use user::{LoginResponse, OAuthProvider, TokenPair, User, UserProfile};
