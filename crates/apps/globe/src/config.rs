use std::env;
use std::path::PathBuf;

pub const DEFAULT_WEATHER_API_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_PLACES_PATH: &str = "data/ne_110m_populated_places.json";

#[derive(Clone, Debug, PartialEq)]
pub struct GlobeConfig {
    pub weather_api_url: String,
    pub places_path: PathBuf,
    pub years_back: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Invalid { key: &'static str, value: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Invalid { key, value } => write!(f, "invalid {key}: {value:?}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self {
            weather_api_url: DEFAULT_WEATHER_API_URL.to_string(),
            places_path: PathBuf::from(DEFAULT_PLACES_PATH),
            years_back: weather::DEFAULT_YEARS_BACK,
        }
    }
}

impl GlobeConfig {
    /// Reads `WEATHER_API_URL`, `GLOBE_PLACES_PATH` and `WEATHER_YEARS_BACK`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let weather_api_url = match lookup("WEATHER_API_URL") {
            Some(url) if url.starts_with("http://") || url.starts_with("https://") => url,
            Some(url) => {
                return Err(ConfigError::Invalid {
                    key: "WEATHER_API_URL",
                    value: url,
                })
            }
            None => defaults.weather_api_url,
        };

        let places_path = lookup("GLOBE_PLACES_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.places_path);

        let years_back = match lookup("WEATHER_YEARS_BACK") {
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "WEATHER_YEARS_BACK",
                        value: raw,
                    })
                }
            },
            None => defaults.years_back,
        };

        Ok(Self {
            weather_api_url,
            places_path,
            years_back,
        })
    }
}
