//! City pins and their floating labels.
//!
//! Pins are cones standing on the globe surface, sized by population, with
//! their tip pointing at the globe core. Once the camera settles over a city
//! only that city's pin and label stay visible.

use foundation::math::{GLOBE_RADIUS, GeoCoordinate, Vec3, project};

/// Label distance above the pin top.
const LABEL_CLEARANCE: f64 = 2.0;

/// Identity of a pin as `"lat,lng"`, matching how locations are selected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PinKey(String);

impl PinKey {
    pub fn from_coordinate(coord: GeoCoordinate) -> Self {
        PinKey(format!(
            "{},{}",
            format_number(coord.latitude),
            format_number(coord.longitude)
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PinKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Shortest round-trip formatting, without a trailing `.0` or negative zero.
fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    format!("{value}")
}

/// Pin cone height for a population.
pub fn pin_height(population: u64) -> f64 {
    ((population as f64) + 1.0).ln() * 0.5
}

#[derive(Debug, Clone, PartialEq)]
pub struct CityPin {
    pub name: String,
    pub coordinate: GeoCoordinate,
    pub population: u64,
    pub height: f64,
    /// Cone centre, half its height above the surface.
    pub position: Vec3,
    /// Unit quaternion `[x, y, z, w]` turning the cone's +Y axis toward the
    /// globe centre.
    pub rotation: [f64; 4],
}

impl CityPin {
    pub fn new(name: impl Into<String>, coordinate: GeoCoordinate, population: u64) -> Self {
        let height = pin_height(population);
        let position = project(coordinate, GLOBE_RADIUS, height / 2.0);
        let down = -position.normalize();
        Self {
            name: name.into(),
            coordinate,
            population,
            height,
            position,
            rotation: quat_from_unit_vectors(Vec3::new(0.0, 1.0, 0.0), down),
        }
    }

    pub fn key(&self) -> PinKey {
        PinKey::from_coordinate(self.coordinate)
    }

    /// Direction the cone's +Y axis points after rotation.
    pub fn axis(&self) -> Vec3 {
        quat_rotate_vec3(self.rotation, Vec3::new(0.0, 1.0, 0.0))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CityLabel {
    pub name: String,
    pub coordinate: GeoCoordinate,
    pub population: u64,
    pub position: Vec3,
}

impl CityLabel {
    pub fn for_pin(pin: &CityPin) -> Self {
        Self {
            name: pin.name.clone(),
            coordinate: pin.coordinate,
            population: pin.population,
            position: project(pin.coordinate, GLOBE_RADIUS, pin.height + LABEL_CLEARANCE),
        }
    }

    pub fn key(&self) -> PinKey {
        PinKey::from_coordinate(self.coordinate)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PinStyle {
    pub color: &'static str,
    pub emissive: &'static str,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LabelStyle {
    pub color: &'static str,
    pub font_size: f64,
}

/// A drawable item and whether it is the highlighted destination.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Visible<'a, T> {
    pub item: &'a T,
    pub highlighted: bool,
}

impl Visible<'_, CityPin> {
    pub fn style(&self) -> PinStyle {
        PinStyle {
            color: if self.highlighted { "gold" } else { "orange" },
            emissive: "orange",
        }
    }
}

impl Visible<'_, CityLabel> {
    pub fn style(&self) -> LabelStyle {
        if self.highlighted {
            LabelStyle {
                color: "gold",
                font_size: 2.0,
            }
        } else {
            LabelStyle {
                color: "white",
                font_size: 1.0,
            }
        }
    }
}

/// Every pin when nothing is animated; otherwise only the animated one.
pub fn visible_pins<'a>(
    pins: &'a [CityPin],
    animated: Option<&PinKey>,
) -> Vec<Visible<'a, CityPin>> {
    filter_visible(pins, animated, CityPin::key)
}

pub fn visible_labels<'a>(
    labels: &'a [CityLabel],
    animated: Option<&PinKey>,
) -> Vec<Visible<'a, CityLabel>> {
    filter_visible(labels, animated, CityLabel::key)
}

fn filter_visible<'a, T>(
    items: &'a [T],
    animated: Option<&PinKey>,
    key: impl Fn(&T) -> PinKey,
) -> Vec<Visible<'a, T>> {
    match animated {
        None => items
            .iter()
            .map(|item| Visible {
                item,
                highlighted: false,
            })
            .collect(),
        Some(animated) => items
            .iter()
            .filter(|item| key(item) == *animated)
            .map(|item| Visible {
                item,
                highlighted: true,
            })
            .collect(),
    }
}

/// Quaternion rotating unit vector `a` onto unit vector `b`.
fn quat_from_unit_vectors(a: Vec3, b: Vec3) -> [f64; 4] {
    let dot = a.dot(b).clamp(-1.0, 1.0);

    // Nearly opposite vectors: pick arbitrary orthogonal axis.
    if dot < -0.999999 {
        let mut axis = Vec3::new(1.0, 0.0, 0.0).cross(a);
        if axis.dot(axis) < 1e-12 {
            axis = Vec3::new(0.0, 1.0, 0.0).cross(a);
        }
        let axis = axis.normalize();
        return [axis.x, axis.y, axis.z, 0.0];
    }

    if dot > 0.999999 {
        return [0.0, 0.0, 0.0, 1.0];
    }

    let axis = a.cross(b);
    quat_normalize([axis.x, axis.y, axis.z, 1.0 + dot])
}

fn quat_normalize(q: [f64; 4]) -> [f64; 4] {
    let n = (q[0] * q[0] + q[1] * q[1] + q[2] * q[2] + q[3] * q[3]).sqrt();
    if n > 1e-10 {
        [q[0] / n, q[1] / n, q[2] / n, q[3] / n]
    } else {
        [0.0, 0.0, 0.0, 1.0]
    }
}

fn quat_rotate_vec3(q: [f64; 4], v: Vec3) -> Vec3 {
    let qv = Vec3::new(q[0], q[1], q[2]);
    let t = qv.cross(v).scale(2.0);
    v + t.scale(q[3]) + qv.cross(t)
}
