use log::Level;

use crate::{
    clock::{Clock, MonotonicClock},
    config::TimestepConfig,
    error::TimestepResult,
    frame::FrameStats,
    logsys::Logger,
    telemetry::FrameObserver,
};

/// Relative slack when comparing the accumulator against one step, so that
/// `k * update_rate` of real time always yields `k` steps.
const STEP_EPSILON: f64 = 1e-9;

/// Upper bound for the interpolation factor.
const ALPHA_MAX: f64 = 0.999_999;

/// Host callbacks driven by the scheduler.
///
/// Per real frame the scheduler calls, strictly in this order:
/// `poll_input` + `update` once per fixed step (zero or more times), then
/// `render` exactly once, then `on_frame`. `should_continue` is consulted at
/// the top of every iteration of `Scheduler::run`.
pub trait FrameHandler {
    type Error;

    /// Drain pending input/window events. Called before every fixed step.
    fn poll_input(&mut self) -> Result<(), Self::Error>;

    /// Advance the simulation by exactly `dt` seconds (always `update_rate`).
    fn update(&mut self, dt: f64) -> Result<(), Self::Error>;

    /// Produce one frame from current state.
    fn render(&mut self) -> Result<(), Self::Error>;

    fn should_continue(&mut self) -> bool;

    /// Timing of the frame that just rendered. Instrumentation only.
    fn on_frame(&mut self, _stats: &FrameStats) {}
}

impl<H: FrameHandler + ?Sized> FrameHandler for &mut H {
    type Error = H::Error;

    fn poll_input(&mut self) -> Result<(), Self::Error> {
        (**self).poll_input()
    }

    fn update(&mut self, dt: f64) -> Result<(), Self::Error> {
        (**self).update(dt)
    }

    fn render(&mut self) -> Result<(), Self::Error> {
        (**self).render()
    }

    fn should_continue(&mut self) -> bool {
        (**self).should_continue()
    }

    fn on_frame(&mut self, stats: &FrameStats) {
        (**self).on_frame(stats)
    }
}

/// Four independent closures as a `FrameHandler`.
struct Callbacks<P, U, R, S> {
    poll_input: P,
    update: U,
    render: R,
    should_continue: S,
}

impl<E, P, U, R, S> FrameHandler for Callbacks<P, U, R, S>
where
    P: FnMut() -> Result<(), E>,
    U: FnMut(f64) -> Result<(), E>,
    R: FnMut() -> Result<(), E>,
    S: FnMut() -> bool,
{
    type Error = E;

    fn poll_input(&mut self) -> Result<(), E> {
        (self.poll_input)()
    }

    fn update(&mut self, dt: f64) -> Result<(), E> {
        (self.update)(dt)
    }

    fn render(&mut self) -> Result<(), E> {
        (self.render)()
    }

    fn should_continue(&mut self) -> bool {
        (self.should_continue)()
    }
}

/// Fixed-timestep run loop.
///
/// Real time measured by the clock is added to an accumulator, which is then
/// drained in `update_rate` sized steps, at most `update_limit` per frame.
/// Time that could not be drained stays in the accumulator and is worked off
/// in later frames; it is never dropped and never reported as an error.
pub struct Scheduler<C: Clock = MonotonicClock> {
    cfg: TimestepConfig,
    clock: C,
    log: Logger,

    accumulator: f64,
    frame_index: u64,
    tick_index: u64,
    last: Option<FrameStats>,

    observers: Vec<Box<dyn FrameObserver>>,
}

impl Scheduler<MonotonicClock> {
    /// Scheduler on the wall clock. The first frame measures from here.
    pub fn configure(update_rate: f64, update_limit: u32) -> TimestepResult<Self> {
        Self::new(TimestepConfig::new(update_rate, update_limit)?)
    }

    pub fn new(cfg: TimestepConfig) -> TimestepResult<Self> {
        Self::with_clock(cfg, MonotonicClock::new())
    }
}

impl<C: Clock> Scheduler<C> {
    pub fn with_clock(cfg: TimestepConfig, clock: C) -> TimestepResult<Self> {
        cfg.validate()?;
        Ok(Self {
            cfg,
            clock,
            log: Logger::new("Scheduler"),
            accumulator: 0.0,
            frame_index: 0,
            tick_index: 0,
            last: None,
            observers: Vec::new(),
        })
    }

    #[inline]
    pub fn config(&self) -> &TimestepConfig {
        &self.cfg
    }

    /// Unspent simulation time in seconds.
    #[inline]
    pub fn accumulator(&self) -> f64 {
        self.accumulator
    }

    /// Stats of the most recent frame, if any frame has run.
    #[inline]
    pub fn last_stats(&self) -> Option<&FrameStats> {
        self.last.as_ref()
    }

    #[inline]
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    #[inline]
    pub fn tick_index(&self) -> u64 {
        self.tick_index
    }

    #[inline]
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// For hosts that drive `frame` themselves and feed a manual clock.
    #[inline]
    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    pub fn add_observer<O: FrameObserver + 'static>(&mut self, observer: O) {
        self.observers.push(Box::new(observer));
    }

    /// Run until `handler.should_continue()` reports false.
    ///
    /// The clock baseline is re-established on entry, so time spent outside
    /// `run` is not charged to the simulation. Backlog carried over from an
    /// earlier `run` is kept. The first callback error ends the loop and is
    /// returned as is.
    pub fn run<H: FrameHandler>(&mut self, mut handler: H) -> Result<(), H::Error> {
        self.clock.reset();
        self.log.debug(format!(
            "run: update_rate={:.6}s ({:.1} Hz) update_limit={}",
            self.cfg.update_rate,
            self.cfg.update_hz(),
            self.cfg.update_limit
        ));

        let first_frame = self.frame_index;
        while handler.should_continue() {
            self.frame(&mut handler)?;
        }

        self.log.debug(format!(
            "run stopped after {} frame(s), backlog={:.6}s",
            self.frame_index - first_frame,
            self.accumulator
        ));
        Ok(())
    }

    /// `run` with one closure per callback.
    pub fn run_with<E, P, U, R, S>(
        &mut self,
        poll_input: P,
        update: U,
        render: R,
        should_continue: S,
    ) -> Result<(), E>
    where
        P: FnMut() -> Result<(), E>,
        U: FnMut(f64) -> Result<(), E>,
        R: FnMut() -> Result<(), E>,
        S: FnMut() -> bool,
    {
        self.run(Callbacks {
            poll_input,
            update,
            render,
            should_continue,
        })
    }

    /// One real frame: sample, accumulate, drain, render, report.
    pub fn frame<H: FrameHandler + ?Sized>(
        &mut self,
        handler: &mut H,
    ) -> Result<FrameStats, H::Error> {
        let rate = self.cfg.update_rate;
        let limit = self.cfg.update_limit;
        let eps = rate * STEP_EPSILON;

        let frame_time = self.clock.restart().max(0.0);
        self.accumulator += frame_time;

        let mut update_count: u32 = 0;
        while self.accumulator + eps >= rate && update_count < limit {
            handler.poll_input()?;
            handler.update(rate)?;

            self.accumulator -= rate;
            if self.accumulator < eps {
                self.accumulator = 0.0;
            }
            update_count += 1;
            self.tick_index += 1;

            if self.tick_index % 60 == 0 {
                self.log.debug(format!("fixed tick {}", self.tick_index));
            }
        }

        handler.render()?;

        let lagging = update_count == limit && self.accumulator + eps >= rate;
        let stats = FrameStats {
            frame_index: self.frame_index,
            frame_time,
            update_count,
            tick_index: self.tick_index,
            backlog: self.accumulator,
            alpha: (self.accumulator / rate).clamp(0.0, ALPHA_MAX),
            lagging,
        };

        if lagging {
            self.log.debug(format!(
                "frame {}: step limit {} hit, backlog={:.6}s",
                stats.frame_index, limit, stats.backlog
            ));
        } else if self.log.enabled(Level::Trace) {
            self.log.trace(format!(
                "frame {}: frame_time={:.6}s steps={}",
                stats.frame_index, frame_time, update_count
            ));
        }

        self.frame_index = self.frame_index.wrapping_add(1);
        self.last = Some(stats);

        for obs in self.observers.iter_mut() {
            obs.on_frame(&stats);
        }
        handler.on_frame(&stats);

        Ok(stats)
    }
}
