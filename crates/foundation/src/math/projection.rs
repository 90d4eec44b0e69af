//! Geographic coordinates and their placement on the rendered globe.
//!
//! The globe is a sphere centred on the scene origin with +Y through the
//! north pole. Azimuth is offset by 90° so that longitude 0 faces +Z, which
//! lines the prime meridian up with the seam of the globe texture.

use super::Vec3;

/// Radius of the rendered globe in scene units.
pub const GLOBE_RADIUS: f64 = 100.0;

/// Latitude/longitude pair in degrees.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GeoCoordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoCoordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// The coordinate with both components forced into their valid ranges.
    pub fn clamped(self) -> Self {
        Self::new(
            clamp_latitude(self.latitude),
            clamp_longitude(self.longitude),
        )
    }

    pub fn is_in_range(self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Map a coordinate to a scene-space point `radius + height` units from the
/// origin.
///
/// Inputs are not validated: out-of-range angles still produce a point.
pub fn project(coord: GeoCoordinate, radius: f64, height: f64) -> Vec3 {
    let phi = (90.0 - coord.latitude).to_radians();
    let theta = (-(coord.longitude - 90.0)).to_radians();
    let r = radius + height;

    Vec3::new(
        r * phi.sin() * theta.cos(),
        r * phi.cos(),
        r * phi.sin() * theta.sin(),
    )
}

/// Clamp user input to `[-90, 90]`; NaN becomes 0.
pub fn clamp_latitude(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(-90.0, 90.0)
}

/// Clamp user input to `[-180, 180]`; NaN becomes 0.
pub fn clamp_longitude(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(-180.0, 180.0)
}

#[cfg(test)]
mod tests {
    use super::{GLOBE_RADIUS, GeoCoordinate, clamp_latitude, clamp_longitude, project};
    use crate::math::Vec3;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    fn assert_point(p: Vec3, expected: [f64; 3]) {
        assert_close(p.x, expected[0], 1e-9);
        assert_close(p.y, expected[1], 1e-9);
        assert_close(p.z, expected[2], 1e-9);
    }

    #[test]
    fn equator_prime_meridian_faces_positive_z() {
        let p = project(GeoCoordinate::new(0.0, 0.0), GLOBE_RADIUS, 0.0);
        assert_point(p, [0.0, 0.0, GLOBE_RADIUS]);
    }

    #[test]
    fn equator_90e_faces_positive_x() {
        let p = project(GeoCoordinate::new(0.0, 90.0), 350.0, 0.0);
        assert_point(p, [350.0, 0.0, 0.0]);
    }

    #[test]
    fn poles_sit_on_the_y_axis() {
        let north = project(GeoCoordinate::new(90.0, 0.0), 120.0, 0.0);
        let south = project(GeoCoordinate::new(-90.0, 0.0), 120.0, 0.0);
        assert_point(north, [0.0, 120.0, 0.0]);
        assert_point(south, [0.0, -120.0, 0.0]);
    }

    #[test]
    fn height_extends_the_radius() {
        let coord = GeoCoordinate::new(48.85, 2.35);
        let p = project(coord, 100.0, 5.0);
        assert_close(p.length(), 105.0, 1e-9);
    }

    #[test]
    fn zero_radius_collapses_to_origin() {
        let p = project(GeoCoordinate::new(-33.9, 151.2), 0.0, 0.0);
        assert_eq!(p.length(), 0.0);
    }

    #[test]
    fn projection_is_deterministic() {
        for lat in [-90.0, -45.5, 0.0, 12.25, 90.0] {
            for lng in [-180.0, -73.9, 0.0, 100.1, 180.0] {
                let coord = GeoCoordinate::new(lat, lng);
                let a = project(coord, 100.0, 2.5);
                let b = project(coord, 100.0, 2.5);
                assert_eq!(a.x.to_bits(), b.x.to_bits());
                assert_eq!(a.y.to_bits(), b.y.to_bits());
                assert_eq!(a.z.to_bits(), b.z.to_bits());
            }
        }
    }

    #[test]
    fn out_of_range_input_still_projects() {
        let p = project(GeoCoordinate::new(120.0, 400.0), 100.0, 0.0);
        assert!(p.x.is_finite() && p.y.is_finite() && p.z.is_finite());
        assert_close(p.length(), 100.0, 1e-9);
    }

    #[test]
    fn clamps_match_input_panel_rules() {
        assert_eq!(clamp_latitude(95.0), 90.0);
        assert_eq!(clamp_latitude(-91.0), -90.0);
        assert_eq!(clamp_latitude(f64::NAN), 0.0);
        assert_eq!(clamp_longitude(181.0), 180.0);
        assert_eq!(clamp_longitude(-200.0), -180.0);
        assert_eq!(clamp_longitude(f64::NAN), 0.0);

        let c = GeoCoordinate::new(100.0, -190.0).clamped();
        assert_eq!(c, GeoCoordinate::new(90.0, -180.0));
        assert!(c.is_in_range());
    }
}
