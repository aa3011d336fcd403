/// Timing snapshot for one real frame.
///
/// Produced by the scheduler after render; read-only for everyone else.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameStats {
    /// 0-based index of the real frame.
    pub frame_index: u64,

    /// Seconds the previous real frame took (the clock sample).
    pub frame_time: f64,

    /// Fixed steps run during this frame, `0..=update_limit`.
    pub update_count: u32,

    /// Total fixed steps run since the scheduler was created.
    pub tick_index: u64,

    /// Unspent simulation time left after the drain loop.
    pub backlog: f64,

    /// `backlog / update_rate` clamped to `[0, 1)`, for render interpolation.
    pub alpha: f64,

    /// Step limit hit with at least one whole step still owed.
    pub lagging: bool,
}

impl FrameStats {
    /// Instantaneous frame rate; 0 when the frame took no measurable time.
    #[inline]
    pub fn fps(&self) -> f64 {
        if self.frame_time > 0.0 {
            1.0 / self.frame_time
        } else {
            0.0
        }
    }

    #[inline]
    pub fn frame_ms(&self) -> f64 {
        self.frame_time * 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fps_is_inverse_frame_time() {
        let stats = FrameStats {
            frame_time: 0.02,
            ..Default::default()
        };
        assert!((stats.fps() - 50.0).abs() < 1e-9);
        assert!((stats.frame_ms() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn fps_of_zero_length_frame_is_zero() {
        assert_eq!(FrameStats::default().fps(), 0.0);
    }
}
