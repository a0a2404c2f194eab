use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A Saju analysis record.
///
/// Only the identifying fields are typed; everything else the backend sends
/// (pillars, interpretation text, lucky colors, ...) is kept verbatim in
/// `details` so nothing is lost when a result is cached or re-rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl AnalysisResult {
    /// Look up a string field such as `personality` or `dayPillar`
    pub fn text(&self, field: &str) -> Option<&str> {
        self.details.get(field).and_then(Value::as_str)
    }

    /// The four pillars (year, month, day, hour) when present
    pub fn pillars(&self) -> Vec<&str> {
        ["yearPillar", "monthPillar", "dayPillar", "hourPillar"]
            .iter()
            .filter_map(|f| self.text(f))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_analysis_keeps_unknown_fields() {
        let json = r#"{"id":42,"year":1990,"month":5,"day":15,"hour":14,"minute":30,"gender":"MALE","isLunar":false,"yearPillar":"庚午","monthPillar":"辛巳","dayPillar":"甲子","hourPillar":"辛未","personality":"온화함","luckyNumbers":[3,8],"createdAt":"2025-03-01T09:15:00"}"#;
        let result: AnalysisResult = serde_json::from_str(json).expect("analysis json");

        assert_eq!(result.id, Some(42));
        assert!(result.created_at.is_some());
        assert_eq!(result.text("personality"), Some("온화함"));
        assert_eq!(result.pillars(), vec!["庚午", "辛巳", "甲子", "辛未"]);
        assert_eq!(result.details["luckyNumbers"], serde_json::json!([3, 8]));

        let back = serde_json::to_value(&result).unwrap();
        assert_eq!(back["id"], serde_json::json!(42));
        assert_eq!(back["dayPillar"], serde_json::json!("甲子"));
    }
}
