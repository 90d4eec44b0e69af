/// Arcs whose sine falls below this are treated as degenerate.
const ANTIPARALLEL_EPSILON: f64 = 1e-9;

/// Scene-space Cartesian point or direction.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn as_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(self, other: Self) -> Self {
        Self::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    pub fn length(self) -> f64 {
        self.dot(self).sqrt()
    }

    pub fn scale(self, s: f64) -> Self {
        Self::new(self.x * s, self.y * s, self.z * s)
    }

    /// Unit vector in the same direction, or zero for a degenerate input.
    pub fn normalize(self) -> Self {
        let n = self.length();
        if n > 1e-10 { self.scale(1.0 / n) } else { Self::ZERO }
    }

    /// Same direction, rescaled to `length`.
    pub fn with_length(self, length: f64) -> Self {
        self.normalize().scale(length)
    }

    pub fn distance(self, other: Self) -> f64 {
        (self - other).length()
    }

    /// Unsigned angle between two vectors in radians, in `[0, π]`.
    ///
    /// Identical (or zero-length) inputs yield exactly `0.0`.
    pub fn angle_to(self, other: Self) -> f64 {
        self.cross(other).length().atan2(self.dot(other))
    }

    /// Straight-line blend. `t = 0` is exactly `self`, `t = 1` exactly `other`.
    pub fn lerp(self, other: Self, t: f64) -> Self {
        self.scale(1.0 - t) + other.scale(t)
    }

    /// Interpolation along the great-circle arc from `self` to `other`.
    ///
    /// Returns `self` unchanged when the angle between them is zero.
    pub fn slerp(self, other: Self, t: f64) -> Self {
        let angle = self.angle_to(other);
        if angle == 0.0 {
            return self;
        }

        let sin_angle = angle.sin();
        if sin_angle.abs() < ANTIPARALLEL_EPSILON {
            if angle < std::f64::consts::FRAC_PI_2 {
                return self.lerp(other, t);
            }
            return self.slerp_antiparallel(other, angle, t);
        }

        let wa = ((1.0 - t) * angle).sin() / sin_angle;
        let wb = (t * angle).sin() / sin_angle;
        self.scale(wa) + other.scale(wb)
    }

    /// The arc between opposite vectors is not unique; swing around any axis
    /// perpendicular to `self`.
    fn slerp_antiparallel(self, other: Self, angle: f64, t: f64) -> Self {
        if t >= 1.0 {
            return other;
        }
        let mut axis = Self::new(1.0, 0.0, 0.0).cross(self);
        if axis.dot(axis) < 1e-12 {
            axis = Self::new(0.0, 1.0, 0.0).cross(self);
        }
        let axis = axis.normalize();

        let phi = angle * t;
        let rotated = self.scale(phi.cos()) + axis.cross(self).scale(phi.sin());

        let start_len = self.length();
        if start_len == 0.0 {
            return rotated;
        }
        let len = start_len * (1.0 - t) + other.length() * t;
        rotated.scale(len / start_len)
    }
}

impl std::ops::Add for Vec3 {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        Self::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl std::ops::Sub for Vec3 {
    type Output = Self;

    fn sub(self, other: Self) -> Self::Output {
        Self::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl std::ops::Neg for Vec3 {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self::new(-self.x, -self.y, -self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::Vec3;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn assert_vec_close(a: Vec3, b: Vec3, eps: f64) {
        let diff = a.distance(b);
        assert!(diff <= eps, "expected {a:?} ~= {b:?} (diff {diff})");
    }

    #[test]
    fn vec3_add_sub_dot() {
        let a = Vec3::new(1.0, 2.0, -1.0);
        let b = Vec3::new(0.5, -2.0, 3.0);
        assert_eq!(a + b, Vec3::new(1.5, 0.0, 2.0));
        assert_eq!(a - b, Vec3::new(0.5, 4.0, -4.0));
        assert_eq!(a.dot(b), -6.5);
    }

    #[test]
    fn with_length_keeps_direction() {
        let v = Vec3::new(300.0, 0.0, 0.0).with_length(350.0);
        assert_eq!(v, Vec3::new(350.0, 0.0, 0.0));
        assert_eq!(Vec3::ZERO.with_length(10.0), Vec3::ZERO);
    }

    #[test]
    fn angle_between_axes() {
        let x = Vec3::new(1.0, 0.0, 0.0);
        let z = Vec3::new(0.0, 0.0, 5.0);
        assert!((x.angle_to(z) - FRAC_PI_2).abs() < 1e-12);
        assert!((x.angle_to(-x) - PI).abs() < 1e-12);
        assert_eq!(z.angle_to(z), 0.0);
    }

    #[test]
    fn lerp_hits_endpoints_exactly() {
        let a = Vec3::new(350.0, 0.0, 0.0);
        let b = Vec3::new(0.1, 0.2, 120.0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_vec_close(a.lerp(b, 0.5), Vec3::new(175.05, 0.1, 60.0), 1e-9);
    }

    #[test]
    fn slerp_hits_endpoints() {
        let a = Vec3::new(350.0, 0.0, 0.0);
        let b = Vec3::new(0.0, 200.0, 280.0).with_length(350.0);
        assert_eq!(a.slerp(b, 0.0), a);
        assert_vec_close(a.slerp(b, 1.0), b, 1e-9);
    }

    #[test]
    fn slerp_stays_on_sphere() {
        let a = Vec3::new(350.0, 0.0, 0.0);
        let b = Vec3::new(0.0, 0.0, 350.0);
        for i in 0..=10 {
            let p = a.slerp(b, i as f64 / 10.0);
            assert!((p.length() - 350.0).abs() < 1e-9);
        }
        let mid = a.slerp(b, 0.5);
        let s = 350.0 * (PI / 4.0).cos();
        assert_vec_close(mid, Vec3::new(s, 0.0, s), 1e-9);
    }

    #[test]
    fn slerp_of_identical_vectors_returns_start() {
        let a = Vec3::new(3.0, 4.0, 0.0);
        for t in [0.0, 0.25, 0.5, 1.0] {
            assert_eq!(a.slerp(a, t), a);
        }
    }

    #[test]
    fn slerp_of_opposite_vectors_is_finite() {
        let a = Vec3::new(-350.0, 0.0, 0.0);
        let b = Vec3::new(350.0, 0.0, 0.0);
        for i in 0..=8 {
            let p = a.slerp(b, i as f64 / 8.0);
            assert!(p.x.is_finite() && p.y.is_finite() && p.z.is_finite());
            assert!((p.length() - 350.0).abs() < 1e-6);
        }
        assert_eq!(a.slerp(b, 1.0), b);
    }
}
