//! Headless fixed-timestep demo.
//!
//! A square spins and walks around a 640x480 arena at a fixed 60 Hz step
//! while frames are "rendered" as fast as the host allows.
//!
//! ```bash
//! timestep-demo
//! timestep-demo --frames 600 --hz 120
//! RUST_LOG=Demo=trace timestep-demo --render-cost-ms 250
//! ```

mod config;
mod demo;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use timestep_core::logsys::init_logging;
use timestep_core::{Scheduler, ShutdownFlag, Telemetry, TimestepConfig};

use crate::config::AppConfig;
use crate::demo::SpinnerDemo;

#[derive(Parser)]
#[command(name = "timestep-demo")]
#[command(author, version, about = "Fixed-timestep scheduler demo")]
struct Args {
    /// TOML config file (defaults are used when it does not exist)
    #[arg(long, short = 'c', default_value = "timestep.toml")]
    config: PathBuf,

    /// Simulation steps per second (overrides timestep.update_rate)
    #[arg(long)]
    hz: Option<f64>,

    /// Maximum simulation steps per rendered frame
    #[arg(long, short = 'l')]
    limit: Option<u32>,

    /// Stop after this many rendered frames
    #[arg(long, short = 'n')]
    frames: Option<u64>,

    /// Artificial cost of each rendered frame in milliseconds
    #[arg(long)]
    render_cost_ms: Option<u64>,

    /// Disable the periodic fps readout
    #[arg(long)]
    no_fps: bool,

    /// Log filter used when RUST_LOG is not set
    #[arg(long)]
    log: Option<String>,
}

impl Args {
    fn apply(&self, cfg: &mut AppConfig) -> Result<()> {
        if self.hz.is_some() || self.limit.is_some() {
            let limit = self.limit.unwrap_or(cfg.timestep.update_limit);
            cfg.timestep = match self.hz {
                Some(hz) => TimestepConfig::from_hz(hz, limit)?,
                None => TimestepConfig::new(cfg.timestep.update_rate, limit)?,
            };
        }
        if let Some(frames) = self.frames {
            cfg.max_frames = Some(frames);
        }
        if let Some(cost) = self.render_cost_ms {
            cfg.demo.render_cost_ms = cost;
        }
        if self.no_fps {
            cfg.telemetry.log_fps = false;
        }
        if let Some(filter) = &self.log {
            cfg.log_filter = filter.clone();
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut cfg = AppConfig::load_or_default(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    args.apply(&mut cfg)?;

    init_logging(&cfg.log_filter);
    log::info!(
        "{}: {:.1} Hz, up to {} steps per frame",
        cfg.title,
        cfg.timestep.update_hz(),
        cfg.timestep.update_limit
    );

    let shutdown = ShutdownFlag::new();
    if let Err(e) = shutdown.install_ctrlc() {
        log::warn!("ctrl-c handler not installed: {e}");
    }

    let mut scheduler = Scheduler::new(cfg.timestep)?;
    scheduler.add_observer(Telemetry::from_config(&cfg.telemetry));

    let mut demo = SpinnerDemo::new(&cfg.demo, shutdown, cfg.max_frames);
    scheduler.run(&mut demo)?;

    let p = demo.player();
    log::info!(
        "stopped: frames={} steps={} last_frame_ms={:.2} backlog={:.4}s player=({:.1}, {:.1}) rot={:.1}",
        demo.frames_rendered(),
        demo.steps(),
        demo.last_stats().frame_ms(),
        scheduler.accumulator(),
        p.x,
        p.y,
        p.rotation_deg
    );
    Ok(())
}
