//! Fixed-timestep scheduling.
//!
//! Real time is measured per frame, accumulated, and spent in fixed-size
//! simulation steps with a hard per-frame cap; rendering happens once per
//! real frame no matter how many steps ran.

pub mod clock;
pub mod config;
pub mod error;
pub mod frame;
pub mod input;
pub mod logsys;
pub mod scheduler;
pub mod signals;
pub mod telemetry;

pub use crate::clock::{Clock, ManualClock, MonotonicClock, ScriptedClock};
pub use crate::config::TimestepConfig;
pub use crate::error::{TimestepError, TimestepResult};
pub use crate::frame::FrameStats;
pub use crate::input::{HeldKeys, InputState, Key};
pub use crate::scheduler::{FrameHandler, Scheduler};
pub use crate::signals::ShutdownFlag;
pub use crate::telemetry::{FrameObserver, Telemetry, TelemetryConfig};
