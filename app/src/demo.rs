use std::time::Duration;

use timestep_core::logsys::Logger;
use timestep_core::{FrameHandler, FrameStats, HeldKeys, InputState, Key, ShutdownFlag};

use crate::config::DemoConfig;

pub const ARENA_WIDTH: f32 = 640.0;
pub const ARENA_HEIGHT: f32 = 480.0;

/// Units moved per fixed step for each held arrow key.
pub const MOVE_PER_STEP: f32 = 5.0;
/// Degrees turned per fixed step.
pub const SPIN_PER_STEP: f32 = 1.0;

/// The spinning square. Position is its centre.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    pub rotation_deg: f32,
    pub size: f32,
}

impl Player {
    pub fn centred() -> Self {
        Self {
            x: ARENA_WIDTH / 2.0,
            y: ARENA_HEIGHT / 2.0,
            rotation_deg: 0.0,
            size: 50.0,
        }
    }

    /// One fixed step. Distances are per step, so the result only depends
    /// on how many steps ran, never on how long frames took.
    pub fn step(&mut self, input: &impl InputState) {
        let (dx, dy) = input.axis();
        self.x += f32::from(dx) * MOVE_PER_STEP;
        self.y += f32::from(dy) * MOVE_PER_STEP;

        let half = self.size / 2.0;
        self.x = self.x.clamp(half, ARENA_WIDTH - half);
        self.y = self.y.clamp(half, ARENA_HEIGHT - half);

        self.rotation_deg = (self.rotation_deg + SPIN_PER_STEP) % 360.0;
    }
}

/// Scripted stand-in for a keyboard: walks the arrow keys in a square,
/// holding each for `hold_ticks` polls.
#[derive(Debug, Clone)]
pub struct Autopilot {
    hold_ticks: u32,
    polls: u64,
    keys: HeldKeys,
}

impl Autopilot {
    const PATTERN: [Key; 4] = [Key::Right, Key::Down, Key::Left, Key::Up];

    pub fn new(hold_ticks: u32) -> Self {
        Self {
            hold_ticks: hold_ticks.max(1),
            polls: 0,
            keys: HeldKeys::none(),
        }
    }

    /// Sample the next input state. Called once before every fixed step.
    pub fn poll(&mut self) {
        let idx = (self.polls / u64::from(self.hold_ticks)) % Self::PATTERN.len() as u64;
        self.keys.clear();
        self.keys.press(Self::PATTERN[idx as usize]);
        self.polls += 1;
    }

    #[inline]
    pub fn keys(&self) -> HeldKeys {
        self.keys
    }
}

impl InputState for Autopilot {
    fn is_pressed(&self, key: Key) -> bool {
        self.keys.is_pressed(key)
    }
}

/// Host side of the demo: owns the simulation and plays every external
/// collaborator the scheduler talks to.
pub struct SpinnerDemo {
    log: Logger,

    player: Player,
    input: Autopilot,

    shutdown: ShutdownFlag,
    max_frames: Option<u64>,
    render_cost: Duration,

    frames_rendered: u64,
    steps: u64,
    last_stats: FrameStats,
}

impl SpinnerDemo {
    pub fn new(cfg: &DemoConfig, shutdown: ShutdownFlag, max_frames: Option<u64>) -> Self {
        Self {
            log: Logger::new("Demo"),
            player: Player::centred(),
            input: Autopilot::new(cfg.hold_ticks),
            shutdown,
            max_frames,
            render_cost: Duration::from_millis(cfg.render_cost_ms),
            frames_rendered: 0,
            steps: 0,
            last_stats: FrameStats::default(),
        }
    }

    #[inline]
    pub fn player(&self) -> &Player {
        &self.player
    }

    #[inline]
    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    #[inline]
    pub fn steps(&self) -> u64 {
        self.steps
    }

    #[inline]
    pub fn last_stats(&self) -> &FrameStats {
        &self.last_stats
    }
}

impl FrameHandler for SpinnerDemo {
    type Error = anyhow::Error;

    fn poll_input(&mut self) -> anyhow::Result<()> {
        self.input.poll();
        Ok(())
    }

    fn update(&mut self, _dt: f64) -> anyhow::Result<()> {
        self.player.step(&self.input);
        self.steps += 1;
        Ok(())
    }

    fn render(&mut self) -> anyhow::Result<()> {
        if !self.render_cost.is_zero() {
            std::thread::sleep(self.render_cost);
        }

        self.log.trace(format!(
            "draw player pos=({:.1}, {:.1}) rot={:.1} keys={:?}",
            self.player.x,
            self.player.y,
            self.player.rotation_deg,
            self.input.keys().iter().collect::<Vec<_>>()
        ));
        self.frames_rendered += 1;
        Ok(())
    }

    fn should_continue(&mut self) -> bool {
        if self.shutdown.is_set() {
            return false;
        }
        match self.max_frames {
            Some(max) => self.frames_rendered < max,
            None => true,
        }
    }

    fn on_frame(&mut self, stats: &FrameStats) {
        self.last_stats = *stats;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use timestep_core::{Scheduler, ScriptedClock, TimestepConfig};

    #[test]
    fn player_moves_and_spins_per_step() {
        let mut p = Player::centred();
        let keys: HeldKeys = [Key::Right, Key::Up].into_iter().collect();

        p.step(&keys);
        assert_eq!(p.x, 325.0);
        assert_eq!(p.y, 235.0);
        assert_eq!(p.rotation_deg, 1.0);
    }

    #[test]
    fn player_stays_inside_arena() {
        let mut p = Player::centred();
        let keys: HeldKeys = [Key::Left, Key::Up].into_iter().collect();
        for _ in 0..500 {
            p.step(&keys);
        }
        assert_eq!(p.x, 25.0);
        assert_eq!(p.y, 25.0);
        assert_eq!(p.rotation_deg, 140.0);
    }

    #[test]
    fn autopilot_walks_a_square() {
        let mut pilot = Autopilot::new(2);
        let mut seen = Vec::new();
        for _ in 0..8 {
            pilot.poll();
            seen.extend(pilot.keys().iter());
        }
        assert_eq!(
            seen,
            vec![
                Key::Right,
                Key::Right,
                Key::Down,
                Key::Down,
                Key::Left,
                Key::Left,
                Key::Up,
                Key::Up
            ]
        );
    }

    #[test]
    fn stops_on_frame_budget_or_shutdown() {
        let shutdown = ShutdownFlag::new();
        let mut demo = SpinnerDemo::new(&DemoConfig::default(), shutdown.clone(), Some(1));
        assert!(demo.should_continue());
        demo.render().unwrap();
        assert!(!demo.should_continue());

        let mut demo = SpinnerDemo::new(&DemoConfig::default(), shutdown.clone(), None);
        assert!(demo.should_continue());
        shutdown.set();
        assert!(!demo.should_continue());
    }

    fn simulate(frame_times: Vec<f64>) -> Player {
        let cfg = TimestepConfig::new(1.0 / 60.0, 10).unwrap();
        let frames = frame_times.len() as u64;
        let mut sched = Scheduler::with_clock(cfg, ScriptedClock::new(frame_times)).unwrap();
        let mut demo = SpinnerDemo::new(&DemoConfig::default(), ShutdownFlag::new(), Some(frames));
        sched.run(&mut demo).unwrap();
        assert_eq!(demo.frames_rendered(), frames);
        *demo.player()
    }

    #[test]
    fn outcome_depends_on_steps_not_frame_rate() {
        let step = 1.0 / 60.0;
        // 120 steps delivered as 120 small frames or as 12 frames of ten steps
        let smooth = simulate(vec![step; 120]);
        let chunky = simulate(vec![10.0 * step; 12]);
        assert_eq!(smooth, chunky);
        assert_eq!(smooth.rotation_deg, 120.0);
    }

    #[test]
    fn handler_sees_frame_stats() {
        let cfg = TimestepConfig::new(0.25, 2).unwrap();
        let mut sched = Scheduler::with_clock(cfg, ScriptedClock::new([1.0])).unwrap();
        let mut demo = SpinnerDemo::new(&DemoConfig::default(), ShutdownFlag::new(), Some(1));
        sched.run(&mut demo).unwrap();

        assert_eq!(demo.steps(), 2);
        assert_eq!(demo.last_stats().update_count, 2);
        assert!(demo.last_stats().lagging);
    }
}
