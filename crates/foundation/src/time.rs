/// Time primitives
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd)]
pub struct Time(pub f64); // seconds

impl Time {
    pub const ZERO: Self = Time(0.0);

    pub fn from_millis(ms: f64) -> Self {
        Time(ms / 1000.0)
    }

    pub fn as_millis(self) -> f64 {
        self.0 * 1000.0
    }

    /// Milliseconds elapsed since `earlier`; never negative.
    pub fn millis_since(self, earlier: Time) -> f64 {
        ((self.0 - earlier.0) * 1000.0).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::Time;

    #[test]
    fn millis_since_clamps_backwards_clocks() {
        let a = Time(1.5);
        let b = Time(1.0);
        assert!((a.millis_since(b) - 500.0).abs() < 1e-9);
        assert_eq!(b.millis_since(a), 0.0);
    }

    #[test]
    fn millis_round_trip() {
        assert_eq!(Time::from_millis(250.0), Time(0.25));
        assert!((Time(0.4).as_millis() - 400.0).abs() < 1e-9);
    }
}
