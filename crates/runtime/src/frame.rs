use foundation::time::Time;

/// Frame metadata handed to every animation step.
///
/// `Frame::new` gives a fixed-rate timebase that can be recorded and
/// replayed; `Frame::at` accepts the host's clock for variable-rate
/// rendering loops.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    /// 0-based frame index.
    pub index: u64,
    /// Delta time since the previous frame (seconds).
    pub dt_s: f64,
    /// Time at the start of the frame (seconds).
    pub time: Time,
}

impl Frame {
    pub fn new(index: u64, dt_s: f64) -> Self {
        Self {
            index,
            dt_s,
            time: Time(index as f64 * dt_s),
        }
    }

    pub fn at(index: u64, time: Time, dt_s: f64) -> Self {
        Self { index, dt_s, time }
    }

    pub fn next(self) -> Self {
        Self::new(self.index + 1, self.dt_s)
    }

    /// Next frame on a variable-rate clock.
    pub fn advance(self, dt_s: f64) -> Self {
        Self::at(self.index + 1, Time(self.time.0 + dt_s), dt_s)
    }
}

#[cfg(test)]
mod tests {
    use super::Frame;
    use foundation::time::Time;

    #[test]
    fn frame_time_is_deterministic() {
        let a = Frame::new(10, 1.0 / 60.0);
        let b = Frame::new(10, 1.0 / 60.0);
        assert_eq!(a, b);
        assert_eq!(a.time, Time(10.0 / 60.0));
    }

    #[test]
    fn next_advances_index_and_time() {
        let f0 = Frame::new(0, 0.5);
        let f1 = f0.next();
        assert_eq!(f1.index, 1);
        assert_eq!(f1.time, Time(0.5));
    }

    #[test]
    fn advance_follows_host_clock() {
        let f0 = Frame::at(3, Time(1.0), 0.016);
        let f1 = f0.advance(0.25);
        assert_eq!(f1.index, 4);
        assert_eq!(f1.time, Time(1.25));
        assert_eq!(f1.dt_s, 0.25);
    }
}
