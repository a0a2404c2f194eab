use bytes::Bytes;
use tracing::info;

use crate::models::{AnalysisResult, BirthData};

use super::{ApiClient, ApiError};

impl ApiClient {
    /// Run a four-pillars analysis for `birth`
    pub async fn analyze_saju(&self, birth: &BirthData) -> Result<AnalysisResult, ApiError> {
        let result: AnalysisResult = self.post("/saju/analyze", birth).await?;
        info!(id = ?result.id, "Saju analysis received");
        Ok(result)
    }

    /// Past analyses of the signed-in user, newest first
    pub async fn saju_history(&self) -> Result<Vec<AnalysisResult>, ApiError> {
        self.get("/saju/history").await
    }

    pub async fn saju_result(&self, id: i64) -> Result<AnalysisResult, ApiError> {
        self.get(&format!("/saju/{}", id)).await
    }

    /// Rendered PDF report for a stored analysis
    pub async fn download_saju_pdf(&self, id: i64) -> Result<Bytes, ApiError> {
        self.get_bytes(&format!("/saju/{}/pdf", id)).await
    }
}
