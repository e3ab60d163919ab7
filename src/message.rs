// src/message.rs
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// Body of `GET /health`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct HealthStatus {
    #[serde(default)]
    pub ai_handler: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

impl HealthStatus {
    pub fn ai_unavailable(&self) -> bool {
        self.ai_handler.as_deref() == Some("unavailable")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryRequest {
    pub message: String,
}

/// Body of `POST /api/query`. A body without `success` (for example a
/// `{"detail": ...}` error page) reads as an application failure.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub response: Option<String>,
}

/// Payload of `POST /api/predict`.
///
/// Integer fields that failed to coerce are `None`; float fields that failed
/// are NaN. Both go over the wire as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionRequest {
    pub day: Option<i64>,
    pub month: Option<i64>,
    pub year: Option<i64>,
    pub hour: Option<i64>,
    #[serde(serialize_with = "finite_or_null")]
    pub pt08_s1_co: f64,
    #[serde(serialize_with = "finite_or_null")]
    pub c6h6_gt: f64,
    #[serde(serialize_with = "finite_or_null")]
    pub pt08_s5_o3: f64,
    #[serde(serialize_with = "finite_or_null")]
    pub pt08_s2_nmhc: f64,
    #[serde(serialize_with = "finite_or_null")]
    pub pt08_s4_no2: f64,
}

impl PredictionRequest {
    /// `d/m/yyyy h:00`, the way the backend labels an hourly reading.
    pub fn timestamp_label(&self) -> String {
        fn part(v: Option<i64>) -> String {
            v.map_or_else(|| "NaN".to_string(), |v| v.to_string())
        }
        format!(
            "{}/{}/{} {}:00",
            part(self.day),
            part(self.month),
            part(self.year),
            part(self.hour)
        )
    }
}

fn finite_or_null<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.is_finite() {
        serializer.serialize_f64(*value)
    } else {
        serializer.serialize_none()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PredictionResult {
    pub pollution_level: i64,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PredictionResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub prediction: Option<PredictionResult>,
}

/// Path and query parameters of `GET /api/stats/{stat_type}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsQuery {
    #[serde(skip)]
    pub stat_type: String,
    pub start_day: i64,
    pub start_month: i64,
    pub end_day: i64,
    pub end_month: i64,
    pub year: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StatsResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub statistics: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_request() -> PredictionRequest {
        PredictionRequest {
            day: Some(1),
            month: Some(5),
            year: Some(2004),
            hour: Some(8),
            pt08_s1_co: 120.0,
            c6h6_gt: 5.3,
            pt08_s5_o3: 45.2,
            pt08_s2_nmhc: 220.7,
            pt08_s4_no2: 34.1,
        }
    }

    #[test]
    fn prediction_request_keeps_integer_and_float_fields() {
        let value = serde_json::to_value(sample_request()).unwrap();

        assert_eq!(value["day"].as_i64(), Some(1));
        assert_eq!(value["month"].as_i64(), Some(5));
        assert_eq!(value["year"].as_i64(), Some(2004));
        assert_eq!(value["hour"].as_i64(), Some(8));
        assert!(value["day"].is_i64());
        assert_eq!(value["pt08_s1_co"].as_f64(), Some(120.0));
        assert_eq!(value["c6h6_gt"].as_f64(), Some(5.3));
        assert_eq!(value["pt08_s5_o3"].as_f64(), Some(45.2));
        assert_eq!(value["pt08_s2_nmhc"].as_f64(), Some(220.7));
        assert_eq!(value["pt08_s4_no2"].as_f64(), Some(34.1));
    }

    #[test]
    fn not_a_number_fields_serialize_as_null() {
        let request = PredictionRequest {
            day: None,
            c6h6_gt: f64::NAN,
            pt08_s4_no2: f64::INFINITY,
            ..sample_request()
        };
        let value = serde_json::to_value(request).unwrap();
        assert!(value["day"].is_null());
        assert!(value["c6h6_gt"].is_null());
        assert!(value["pt08_s4_no2"].is_null());
        assert_eq!(value["month"], json!(5));
    }

    #[test]
    fn timestamp_label_formats_hour() {
        assert_eq!(sample_request().timestamp_label(), "1/5/2004 8:00");
    }

    #[test]
    fn responses_without_success_read_as_failure() {
        let resp: QueryResponse =
            serde_json::from_value(json!({"detail": "AI service unavailable"})).unwrap();
        assert!(!resp.success);
        assert!(resp.response.is_none());

        let resp: PredictionResponse = serde_json::from_value(json!({})).unwrap();
        assert!(!resp.success);
        assert!(resp.prediction.is_none());
    }

    #[test]
    fn health_flags_unavailable_handler_only() {
        let health: HealthStatus = serde_json::from_value(
            json!({"status": "healthy", "ai_handler": "unavailable", "version": "1.0.0"}),
        )
        .unwrap();
        assert!(health.ai_unavailable());
        assert_eq!(health.version.as_deref(), Some("1.0.0"));

        let health: HealthStatus = serde_json::from_value(json!({"status": "healthy"})).unwrap();
        assert!(!health.ai_unavailable());
    }

    #[test]
    fn stats_query_keeps_stat_type_out_of_params() {
        let query = StatsQuery {
            stat_type: "mean".into(),
            start_day: 1,
            start_month: 5,
            end_day: 30,
            end_month: 5,
            year: 2004,
        };
        let value = serde_json::to_value(query).unwrap();
        assert!(value.get("stat_type").is_none());
        assert_eq!(value["end_day"], json!(30));
    }
}
