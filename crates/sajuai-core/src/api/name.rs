use serde_json::Value;

use crate::models::NameAnalysisRequest;

use super::{ApiClient, ApiError};

impl ApiClient {
    /// Name analysis (or naming suggestions when `purpose` is `NEW`)
    pub async fn analyze_name(&self, request: &NameAnalysisRequest) -> Result<Value, ApiError> {
        self.post("/name/analyze", request).await
    }
}
