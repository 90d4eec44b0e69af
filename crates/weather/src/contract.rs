//! JSON bodies exchanged with `POST /api/weather`.

use chrono::{NaiveDateTime, Timelike};
use foundation::math::GeoCoordinate;
use serde::{Deserialize, Serialize};

/// Years of history the backend aggregates over.
pub const DEFAULT_YEARS_BACK: u32 = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRequest {
    /// `YYYY-MM-DD`.
    pub target_date_str: String,
    pub lat: f64,
    pub lon: f64,
    /// `0..=23`.
    pub target_hour: u32,
    pub years_back: u32,
}

impl WeatherRequest {
    pub fn new(coord: GeoCoordinate, at: NaiveDateTime) -> Self {
        Self {
            target_date_str: at.format("%Y-%m-%d").to_string(),
            lat: coord.latitude,
            lon: coord.longitude,
            target_hour: at.hour(),
            years_back: DEFAULT_YEARS_BACK,
        }
    }

    pub fn with_years_back(mut self, years_back: u32) -> Self {
        self.years_back = years_back;
        self
    }
}

/// Heat-index based comfort rating computed by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comfort {
    pub heat_index: Option<f64>,
    pub comfort_score: Option<f64>,
    pub comfort_label: Option<String>,
}

/// `comfort` is normally an object but older backends send a bare label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ComfortField {
    Detail(Comfort),
    Text(String),
}

/// Every field is optional: the backend drops what it could not compute and
/// answers `{ "error": "..." }` when it has nothing at all.
#[allow(non_snake_case)]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherResponse {
    #[serde(default)]
    pub mean_T2M: Option<f64>,
    #[serde(default)]
    pub max_T2M: Option<f64>,
    #[serde(default)]
    pub min_T2M: Option<f64>,
    #[serde(default)]
    pub mean_RH: Option<f64>,
    #[serde(default)]
    pub max_RH: Option<f64>,
    #[serde(default)]
    pub min_RH: Option<f64>,
    #[serde(default)]
    pub rainy_day_percentage: Option<f64>,
    #[serde(default)]
    pub mean_PRECTOT: Option<f64>,
    #[serde(default)]
    pub precipitation: Option<f64>,
    #[serde(default)]
    pub mean_WIND: Option<f64>,
    #[serde(default)]
    pub files_used: Option<u64>,
    #[serde(default)]
    pub comfort: Option<ComfortField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use foundation::math::GeoCoordinate;

    use super::{ComfortField, WeatherRequest, WeatherResponse};

    #[test]
    fn request_carries_date_and_hour() {
        let at = NaiveDate::from_ymd_opt(2025, 3, 7)
            .and_then(|d| d.and_hms_opt(18, 45, 0))
            .unwrap();
        let req = WeatherRequest::new(GeoCoordinate::new(-33.9, 151.2), at);
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "target_date_str": "2025-03-07",
                "lat": -33.9,
                "lon": 151.2,
                "target_hour": 18,
                "years_back": 5
            })
        );
        assert_eq!(req.with_years_back(2).years_back, 2);
    }

    #[test]
    fn full_backend_body_decodes() {
        let body = r#"{
            "mean_T2M": 21.4, "max_T2M": 30.1, "min_T2M": 12.0,
            "mean_RH": 64.2, "max_RH": 98.0, "min_RH": 20.5,
            "rainy_day_percentage": 42.8, "files_used": 75,
            "comfort": { "heat_index": 21.68, "comfort_score": 90, "comfort_label": "Pleasant" }
        }"#;
        let resp: WeatherResponse = serde_json::from_str(body).unwrap();
        assert_eq!(resp.mean_T2M, Some(21.4));
        assert_eq!(resp.files_used, Some(75));
        let Some(ComfortField::Detail(comfort)) = resp.comfort else {
            panic!("expected comfort detail");
        };
        assert_eq!(comfort.comfort_label.as_deref(), Some("Pleasant"));
        assert_eq!(comfort.comfort_score, Some(90.0));
    }

    #[test]
    fn error_body_decodes() {
        let resp: WeatherResponse =
            serde_json::from_str(r#"{ "error": "No granules downloaded." }"#).unwrap();
        assert_eq!(resp.error.as_deref(), Some("No granules downloaded."));
        assert_eq!(resp.mean_T2M, None);
    }

    #[test]
    fn null_fields_and_bare_comfort_label_decode() {
        let resp: WeatherResponse =
            serde_json::from_str(r#"{ "rainy_day_percentage": null, "comfort": "Mild" }"#)
                .unwrap();
        assert_eq!(resp.rainy_day_percentage, None);
        assert_eq!(resp.comfort, Some(ComfortField::Text("Mild".to_string())));
    }
}
