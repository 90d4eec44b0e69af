use scene::overlay::OverlayKind;

use crate::contract::{ComfortField, WeatherResponse};

/// Rain percentage at or above which the overlay turns to thunder.
pub const THUNDER_RAIN_PERCENT: f64 = 75.0;
/// Rain percentage at or above which the overlay turns to rain.
pub const RAIN_PERCENT: f64 = 50.0;
/// Mean temperature (°C) below which the overlay turns to snow.
pub const SNOW_BELOW_C: f64 = 5.0;

/// Comfort text for the stats panel.
#[derive(Debug, Clone, PartialEq)]
pub enum ComfortDisplay {
    Rated { label: String, heat_index: Option<f64> },
    Text(String),
    Missing,
}

impl ComfortDisplay {
    pub fn from_field(field: Option<&ComfortField>) -> Self {
        match field {
            Some(ComfortField::Detail(c)) => match &c.comfort_label {
                Some(label) => ComfortDisplay::Rated {
                    label: label.clone(),
                    heat_index: c.heat_index,
                },
                None => ComfortDisplay::Missing,
            },
            Some(ComfortField::Text(text)) if !text.is_empty() => {
                ComfortDisplay::Text(text.clone())
            }
            _ => ComfortDisplay::Missing,
        }
    }
}

impl std::fmt::Display for ComfortDisplay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComfortDisplay::Rated {
                label,
                heat_index: Some(hi),
            } => write!(f, "{label} ({hi:.1}°C)"),
            ComfortDisplay::Rated {
                label,
                heat_index: None,
            } => f.write_str(label),
            ComfortDisplay::Text(text) => f.write_str(text),
            ComfortDisplay::Missing => f.write_str("—"),
        }
    }
}

/// The values shown in the stats panel.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSummary {
    pub avg_temp: Option<f64>,
    pub max_temp: Option<f64>,
    pub min_temp: Option<f64>,
    pub humidity: Option<f64>,
    pub rain_percentage: f64,
    pub comfort: ComfortDisplay,
    pub wind: f64,
    pub temperature: Option<f64>,
    pub files_used: Option<u64>,
}

impl Default for WeatherSummary {
    fn default() -> Self {
        Self {
            avg_temp: Some(0.0),
            max_temp: Some(0.0),
            min_temp: Some(0.0),
            humidity: Some(0.0),
            rain_percentage: 0.0,
            comfort: ComfortDisplay::Missing,
            wind: 0.0,
            temperature: Some(0.0),
            files_used: None,
        }
    }
}

impl WeatherSummary {
    pub fn from_response(resp: &WeatherResponse) -> Self {
        Self {
            avg_temp: resp.mean_T2M,
            max_temp: resp.max_T2M,
            min_temp: resp.min_T2M,
            humidity: resp.mean_RH,
            rain_percentage: resp
                .rainy_day_percentage
                .or(resp.mean_PRECTOT)
                .or(resp.precipitation)
                .unwrap_or(0.0),
            comfort: ComfortDisplay::from_field(resp.comfort.as_ref()),
            wind: resp.mean_WIND.unwrap_or(0.0),
            temperature: resp.mean_T2M,
            files_used: resp.files_used,
        }
    }

    /// Panel rows, one per statistic.
    pub fn panel_lines(&self) -> Vec<String> {
        vec![
            format!("AVG Temperature: {}", with_unit(self.avg_temp, 1, "°C")),
            format!("MAX Temperature: {}", with_unit(self.max_temp, 1, "°C")),
            format!("MIN Temperature: {}", with_unit(self.min_temp, 1, "°C")),
            format!("Humidity: {}", with_unit(self.humidity, 0, "%")),
            format!("Rain %: {:.1}%", self.rain_percentage),
            format!("Comfort: {}", self.comfort),
        ]
    }
}

fn with_unit(value: Option<f64>, decimals: usize, unit: &str) -> String {
    match value {
        Some(v) => format!("{v:.decimals$}{unit}"),
        None => "N/A".to_string(),
    }
}

/// Overlay matching a response.
///
/// Only `rainy_day_percentage` drives the rain decision; missing values
/// count as zero. Returns `None` when the percentage is not a number.
pub fn classify(resp: &WeatherResponse) -> Option<OverlayKind> {
    let mean_temp = resp.mean_T2M.unwrap_or(0.0);
    let rain = resp.rainy_day_percentage.unwrap_or(0.0);

    if mean_temp < SNOW_BELOW_C {
        Some(OverlayKind::Snow)
    } else if rain >= THUNDER_RAIN_PERCENT {
        Some(OverlayKind::Thunder)
    } else if rain >= RAIN_PERCENT {
        Some(OverlayKind::Rain)
    } else if rain < RAIN_PERCENT {
        Some(OverlayKind::Sunny)
    } else {
        None
    }
}
