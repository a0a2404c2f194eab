use serde_json::Value;

use crate::models::TarotReadingRequest;

use super::{ApiClient, ApiError};

impl ApiClient {
    pub async fn tarot_reading(&self, request: &TarotReadingRequest) -> Result<Value, ApiError> {
        self.post("/tarot/reading", request).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use crate::api::client::tests::{client_for, signed_in_store, FakeBackend};
    use crate::models::TarotReadingRequest;

    #[tokio::test]
    async fn test_tarot_omits_empty_optionals() {
        let backend = Arc::new(FakeBackend::new("A1"));
        let store = signed_in_store("A1", "R1");
        let client = client_for(&backend, &store);

        client
            .tarot_reading(&TarotReadingRequest {
                question: "이직해도 될까요?".to_string(),
                category: Some("CAREER".to_string()),
                name: None,
            })
            .await
            .unwrap();

        assert_eq!(backend.paths(), vec!["/tarot/reading"]);
        assert_eq!(
            *backend.last_body.lock().unwrap(),
            Some(json!({"question": "이직해도 될까요?", "category": "CAREER"}))
        );
    }
}
