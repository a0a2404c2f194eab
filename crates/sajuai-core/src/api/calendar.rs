use serde_json::Value;

use crate::models::{CalendarConversionRequest, LuckyDayRequest};

use super::{ApiClient, ApiError};

impl ApiClient {
    /// Convert a date between the lunar and solar calendars
    pub async fn convert_calendar(
        &self,
        request: &CalendarConversionRequest,
    ) -> Result<Value, ApiError> {
        self.post("/calendar/convert", request).await
    }

    /// Auspicious days for `request.purpose` within a date range
    pub async fn find_lucky_days(&self, request: &LuckyDayRequest) -> Result<Value, ApiError> {
        self.post("/lucky-day/find", request).await
    }
}
