use std::collections::VecDeque;
use std::time::Instant;

/// Time source sampled once per real frame.
pub trait Clock {
    /// Seconds elapsed since the previous sample (or since the baseline),
    /// then moves the baseline to now.
    fn restart(&mut self) -> f64;

    /// Re-establish the baseline without reporting elapsed time.
    fn reset(&mut self) {}
}

/// Wall clock backed by `Instant`.
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    last: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn restart(&mut self) -> f64 {
        let now = Instant::now();
        let dt = now.duration_since(self.last);
        self.last = now;
        dt.as_secs_f64()
    }

    fn reset(&mut self) {
        self.last = Instant::now();
    }
}

/// Replays a fixed list of frame times, then reports 0 forever.
#[derive(Debug, Clone, Default)]
pub struct ScriptedClock {
    frames: VecDeque<f64>,
}

impl ScriptedClock {
    pub fn new(frames: impl IntoIterator<Item = f64>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
        }
    }

    pub fn push(&mut self, frame_time: f64) {
        self.frames.push_back(frame_time);
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl Clock for ScriptedClock {
    fn restart(&mut self) -> f64 {
        self.frames.pop_front().unwrap_or(0.0).max(0.0)
    }
}

/// Clock that only moves when told to.
///
/// Time queued with `advance` survives `reset`; it is reported by the next
/// `restart`.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    pending: f64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self { pending: 0.0 }
    }

    /// Negative or non-finite amounts are ignored; time never runs backwards.
    pub fn advance(&mut self, secs: f64) {
        if secs.is_finite() && secs > 0.0 {
            self.pending += secs;
        }
    }

    #[inline]
    pub fn pending(&self) -> f64 {
        self.pending
    }
}

impl Clock for ManualClock {
    fn restart(&mut self) -> f64 {
        std::mem::take(&mut self.pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn monotonic_restart_measures_since_previous_sample() {
        let mut clock = MonotonicClock::new();
        std::thread::sleep(Duration::from_millis(5));
        let first = clock.restart();
        assert!(first >= 0.005, "first sample {first}");

        let second = clock.restart();
        assert!(second >= 0.0);
        assert!(second < first);
    }

    #[test]
    fn monotonic_reset_drops_elapsed_time() {
        let mut clock = MonotonicClock::new();
        std::thread::sleep(Duration::from_millis(20));
        clock.reset();
        assert!(clock.restart() < 0.02);
    }

    #[test]
    fn scripted_replays_then_reports_zero() {
        let mut clock = ScriptedClock::new([0.02, 0.2]);
        assert_eq!(clock.remaining(), 2);
        assert_eq!(clock.restart(), 0.02);
        assert_eq!(clock.restart(), 0.2);
        assert_eq!(clock.restart(), 0.0);
        assert_eq!(clock.restart(), 0.0);
    }

    #[test]
    fn scripted_clamps_negative_samples() {
        let mut clock = ScriptedClock::new([-1.0]);
        assert_eq!(clock.restart(), 0.0);
    }

    #[test]
    fn manual_accumulates_until_sampled() {
        let mut clock = ManualClock::new();
        clock.advance(0.25);
        clock.advance(0.25);
        clock.advance(-3.0);
        clock.advance(f64::NAN);
        assert_eq!(clock.pending(), 0.5);
        assert_eq!(clock.restart(), 0.5);
        assert_eq!(clock.restart(), 0.0);
    }
}
