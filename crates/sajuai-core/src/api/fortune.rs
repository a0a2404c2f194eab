//! Fortune endpoints. Responses are passed through as JSON; their shape is
//! owned by the backend and only rendered by callers.

use serde_json::Value;

use crate::models::{BirthData, TojeongRequest, ZodiacFortuneRequest};

use super::{ApiClient, ApiError};

impl ApiClient {
    pub async fn daily_fortune(&self, birth: &BirthData) -> Result<Value, ApiError> {
        self.post("/fortune/daily", birth).await
    }

    pub async fn lucky_items(&self, birth: &BirthData) -> Result<Value, ApiError> {
        self.post("/fortune/lucky-items", birth).await
    }

    pub async fn zodiac_fortune(&self, request: &ZodiacFortuneRequest) -> Result<Value, ApiError> {
        self.post("/fortune/zodiac", request).await
    }

    /// Short encouragement message for today
    pub async fn daily_message(&self) -> Result<Value, ApiError> {
        self.get("/fortune/daily-message").await
    }

    /// Draw a random fortune slip
    pub async fn fortune_gacha(&self) -> Result<Value, ApiError> {
        self.get("/fortune/gacha").await
    }

    /// Today's fortune per two-hour block
    pub async fn hourly_fortune(&self) -> Result<Value, ApiError> {
        self.get("/fortune/hourly").await
    }

    /// Tojeong Bigyeol yearly reading
    pub async fn tojeong_fortune(&self, request: &TojeongRequest) -> Result<Value, ApiError> {
        self.post("/tojeong/fortune", request).await
    }
}
