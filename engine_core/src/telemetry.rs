use serde::{Deserialize, Serialize};

use crate::frame::FrameStats;
use crate::logsys::Logger;

/// Receives the stats of every real frame after it has been rendered.
///
/// Observers see timing only; they have no path back into the scheduler
/// or the simulation.
pub trait FrameObserver {
    fn on_frame(&mut self, stats: &FrameStats);
}

impl<F: FnMut(&FrameStats)> FrameObserver for F {
    fn on_frame(&mut self, stats: &FrameStats) {
        self(stats)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_fps")]
    pub log_fps: bool,

    #[serde(default = "default_fps_log_period_sec")]
    pub fps_log_period_sec: f64,
}

fn default_log_fps() -> bool {
    true
}
fn default_fps_log_period_sec() -> f64 {
    1.0
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_fps: default_log_fps(),
            fps_log_period_sec: default_fps_log_period_sec(),
        }
    }
}

/// fps readout and lag reporting.
///
/// Averages are taken over measured frame time, not wall time, so a
/// scripted clock gives reproducible numbers.
pub struct Telemetry {
    log: Logger,

    pub fps: f64,
    pub frame_ms: f64,
    pub update_count: u32,
    pub tick_index: u64,

    // fps accumulation
    window_time: f64,
    window_frames: u32,
    fps_period_sec: f64,
    fps_enabled: bool,

    // overload tracking
    lag_streak: u64,
    lagged_frames: u64,
}

impl Telemetry {
    pub fn new() -> Self {
        Self {
            log: Logger::new("Telemetry"),
            fps: 0.0,
            frame_ms: 0.0,
            update_count: 0,
            tick_index: 0,
            window_time: 0.0,
            window_frames: 0,
            fps_period_sec: default_fps_log_period_sec(),
            fps_enabled: default_log_fps(),
            lag_streak: 0,
            lagged_frames: 0,
        }
    }

    pub fn from_config(cfg: &TelemetryConfig) -> Self {
        let mut t = Self::new();
        t.configure_fps_logging(cfg.log_fps, cfg.fps_log_period_sec);
        t
    }

    pub fn configure_fps_logging(&mut self, enabled: bool, period_sec: f64) {
        self.fps_enabled = enabled;
        self.fps_period_sec = if period_sec.is_finite() {
            period_sec.max(0.25)
        } else {
            default_fps_log_period_sec()
        };
    }

    pub fn frame_tick(&mut self, stats: &FrameStats) {
        self.frame_ms = stats.frame_ms();
        self.update_count = stats.update_count;
        self.tick_index = stats.tick_index;

        self.track_lag(stats);

        self.window_frames += 1;
        self.window_time += stats.frame_time;

        if self.window_time >= self.fps_period_sec {
            self.fps = f64::from(self.window_frames) / self.window_time;

            if self.fps_enabled {
                self.log.info(format!(
                    "fps={:.1} frame_ms={:.2} steps={} tick={} backlog_ms={:.2}",
                    self.fps,
                    self.frame_ms,
                    stats.update_count,
                    stats.tick_index,
                    stats.backlog * 1000.0
                ));
            }

            self.window_frames = 0;
            self.window_time = 0.0;
        }
    }

    fn track_lag(&mut self, stats: &FrameStats) {
        if stats.lagging {
            self.lagged_frames += 1;
            self.lag_streak += 1;
            if self.lag_streak == 1 {
                self.log.warn(format!(
                    "step limit reached at frame {}: backlog_ms={:.2}",
                    stats.frame_index,
                    stats.backlog * 1000.0
                ));
            }
        } else if self.lag_streak > 0 {
            self.log.info(format!(
                "caught up after {} lagging frame(s)",
                self.lag_streak
            ));
            self.lag_streak = 0;
        }
    }

    #[inline]
    pub fn lagged_frames(&self) -> u64 {
        self.lagged_frames
    }

    #[inline]
    pub fn lag_streak(&self) -> u64 {
        self.lag_streak
    }
}

impl Default for Telemetry {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameObserver for Telemetry {
    fn on_frame(&mut self, stats: &FrameStats) {
        self.frame_tick(stats);
    }
}
