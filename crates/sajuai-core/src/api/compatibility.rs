use serde_json::Value;

use crate::models::CompatibilityRequest;

use super::{ApiClient, ApiError};

impl ApiClient {
    pub async fn analyze_compatibility(
        &self,
        request: &CompatibilityRequest,
    ) -> Result<Value, ApiError> {
        self.post("/compatibility/analyze", request).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use crate::api::client::tests::{client_for, signed_in_store, FakeBackend};
    use crate::models::{CompatibilityRequest, Gender, PersonBirth};

    #[tokio::test]
    async fn test_compatibility_posts_flat_body() {
        let backend = Arc::new(FakeBackend::new("A1").respond(
            "/compatibility/analyze",
            200,
            r#"{"score":87}"#,
        ));
        let store = signed_in_store("A1", "R1");
        let client = client_for(&backend, &store);

        let person = |year, gender| PersonBirth {
            name: None,
            year,
            month: 1,
            day: 1,
            hour: 0,
            minute: 0,
            gender,
            is_lunar: false,
        };
        let result = client
            .analyze_compatibility(&CompatibilityRequest {
                person1: person(1991, Gender::Male),
                person2: person(1993, Gender::Female),
            })
            .await
            .unwrap();

        assert_eq!(result["score"], json!(87));
        let body = backend.last_body.lock().unwrap().clone().unwrap();
        assert_eq!(body["person1Year"], json!(1991));
        assert_eq!(body["person2Gender"], json!("FEMALE"));
    }
}
