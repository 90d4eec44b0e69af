use foundation::math::Vec3;

/// The rendering surface as seen by camera animations.
///
/// `look_at` is the orbit controls' target point.
pub trait CameraRig {
    fn camera_position(&self) -> Vec3;
    fn set_camera_position(&mut self, position: Vec3);
    fn look_at(&self) -> Vec3;
    fn set_look_at(&mut self, target: Vec3);
}

/// Closest the user may orbit to the globe centre.
pub const ORBIT_MIN_DISTANCE: f64 = 120.0;
/// Farthest the user may orbit from the globe centre.
pub const ORBIT_MAX_DISTANCE: f64 = 350.0;

/// Perspective camera with orbit controls around the globe.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    pub position: Vec3,
    pub target: Vec3,
    pub fov_y_deg: f64,
    pub min_distance: f64,
    pub max_distance: f64,
    /// User rotation is locked while weather data is loading.
    pub rotate_enabled: bool,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            position: Vec3::new(300.0, 0.0, 0.0),
            target: Vec3::ZERO,
            fov_y_deg: 45.0,
            min_distance: ORBIT_MIN_DISTANCE,
            max_distance: ORBIT_MAX_DISTANCE,
            rotate_enabled: true,
        }
    }
}

impl OrbitCamera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Distance from the globe centre.
    pub fn distance(&self) -> f64 {
        self.position.length()
    }

    /// Exponential wheel zoom (positive = out), clamped to the orbit limits.
    pub fn on_wheel(&mut self, delta: f64) {
        let zoom_factor = (delta * 0.002).exp();
        let distance = (self.distance() * zoom_factor).clamp(self.min_distance, self.max_distance);
        self.position = self.position.with_length(distance);
    }
}

impl CameraRig for OrbitCamera {
    fn camera_position(&self) -> Vec3 {
        self.position
    }

    fn set_camera_position(&mut self, position: Vec3) {
        self.position = position;
    }

    fn look_at(&self) -> Vec3 {
        self.target
    }

    fn set_look_at(&mut self, target: Vec3) {
        self.target = target;
    }
}
