//! Populated-places catalog backing the city search panel.
//!
//! Source data is a Natural Earth populated-places GeoJSON
//! `FeatureCollection` with point geometries stored as `[lng, lat]`.

use std::path::Path;

use foundation::math::GeoCoordinate;
use serde::{Deserialize, Serialize};

/// Population assumed when a feature has no usable `POP_MAX`.
pub const DEFAULT_POPULATION: u64 = 1000;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct City {
    pub name: String,
    pub country: String,
    #[serde(serialize_with = "serialize_coordinate")]
    pub coordinate: GeoCoordinate,
    pub population: u64,
}

fn serialize_coordinate<S: serde::Serializer>(
    coord: &GeoCoordinate,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    [coord.latitude, coord.longitude].serialize(serializer)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    Io(String),
    Parse(String),
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::Io(msg) => write!(f, "places file unreadable: {msg}"),
            CatalogError::Parse(msg) => write!(f, "places file malformed: {msg}"),
        }
    }
}

impl std::error::Error for CatalogError {}

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    geometry: Option<Geometry>,
    #[serde(default)]
    properties: Properties,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum Geometry {
    Point { coordinates: Vec<f64> },
    #[serde(other)]
    Other,
}

#[derive(Debug, Default, Deserialize)]
struct Properties {
    #[serde(rename = "NAMEASCII")]
    name: Option<String>,
    #[serde(rename = "ADM0NAME")]
    country: Option<String>,
    #[serde(rename = "POP_MAX")]
    pop_max: Option<f64>,
}

impl Feature {
    fn into_city(self) -> Option<City> {
        let Some(Geometry::Point { coordinates }) = self.geometry else {
            return None;
        };
        let [lng, lat] = coordinates.get(..2)? else {
            return None;
        };
        let name = self.properties.name?;

        // Zero counts as missing.
        let population = match self.properties.pop_max {
            Some(p) if p.is_finite() && p >= 1.0 => p as u64,
            _ => DEFAULT_POPULATION,
        };

        Some(City {
            name,
            country: self.properties.country.unwrap_or_default(),
            coordinate: GeoCoordinate::new(*lat, *lng),
            population,
        })
    }
}

#[derive(Debug, Default, Clone)]
pub struct Catalog {
    cities: Vec<City>,
}

impl Catalog {
    pub fn new(cities: Vec<City>) -> Self {
        Self { cities }
    }

    /// Parse a populated-places `FeatureCollection`.
    ///
    /// Features without a point geometry or a name are skipped.
    pub fn from_geojson_str(raw: &str) -> Result<Self, CatalogError> {
        let collection: FeatureCollection =
            serde_json::from_str(raw).map_err(|e| CatalogError::Parse(e.to_string()))?;
        let cities = collection
            .features
            .into_iter()
            .filter_map(Feature::into_city)
            .collect();
        Ok(Self { cities })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| CatalogError::Io(format!("{}: {e}", path.display())))?;
        Self::from_geojson_str(&raw)
    }

    pub fn cities(&self) -> &[City] {
        &self.cities
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    /// Case-insensitive substring match on city or country name, in file
    /// order. An empty query matches nothing.
    pub fn search(&self, query: &str) -> Vec<&City> {
        if query.is_empty() {
            return Vec::new();
        }
        let needle = query.to_lowercase();
        self.cities
            .iter()
            .filter(|c| {
                c.name.to_lowercase().contains(&needle)
                    || c.country.to_lowercase().contains(&needle)
            })
            .collect()
    }
}
