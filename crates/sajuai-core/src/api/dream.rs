use serde_json::Value;

use crate::models::DreamInterpretationRequest;

use super::{ApiClient, ApiError};

impl ApiClient {
    pub async fn interpret_dream(
        &self,
        request: &DreamInterpretationRequest,
    ) -> Result<Value, ApiError> {
        self.post("/dream/interpret", request).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use crate::api::client::tests::{client_for, signed_in_store, FakeBackend};
    use crate::models::DreamInterpretationRequest;

    #[tokio::test]
    async fn test_dream_retries_after_refresh() {
        let backend = Arc::new(FakeBackend::new("A2").with_refresh_pairs(&[("A2", "R2")]));
        let store = signed_in_store("A1", "R1");
        let client = client_for(&backend, &store);

        let request = DreamInterpretationRequest {
            dream_content: "돼지가 집으로 들어오는 꿈".to_string(),
            category: None,
            name: None,
            mood: Some("기쁨".to_string()),
        };
        let result = client.interpret_dream(&request).await.unwrap();

        assert_eq!(result["path"], json!("/dream/interpret"));
        assert_eq!(backend.refresh_count(), 1);
        // The retry carried the same body
        assert_eq!(
            *backend.last_body.lock().unwrap(),
            Some(json!({"dreamContent": "돼지가 집으로 들어오는 꿈", "mood": "기쁨"}))
        );
    }
}
