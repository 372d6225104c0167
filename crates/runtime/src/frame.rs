use foundation::time::Time;

/// Per-frame metadata for the dashboard loop.
///
/// The browser drives the loop, so deltas vary frame to frame. Keeping the
/// index and accumulated time together makes event timestamps cheap and
/// unambiguous.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    /// 0-based frame index.
    pub index: u64,
    /// Delta time since the previous frame (seconds).
    pub dt_s: f64,
    /// Accumulated time at the start of the frame (seconds).
    pub time: Time,
}

impl Frame {
    pub fn first() -> Self {
        Self {
            index: 0,
            dt_s: 0.0,
            time: Time(0.0),
        }
    }

    /// Next frame after `dt_s` seconds of wall time.
    pub fn advance(self, dt_s: f64) -> Self {
        Self {
            index: self.index + 1,
            dt_s,
            time: Time(self.time.0 + dt_s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Frame;
    use foundation::time::Time;

    #[test]
    fn first_frame_is_zeroed() {
        let f = Frame::first();
        assert_eq!(f.index, 0);
        assert_eq!(f.time, Time(0.0));
    }

    #[test]
    fn advance_accumulates_variable_deltas() {
        let f = Frame::first().advance(0.016).advance(0.034);
        assert_eq!(f.index, 2);
        assert_eq!(f.dt_s, 0.034);
        assert_eq!(f.time, Time(0.05));
    }
}
