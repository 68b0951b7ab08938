//! Engine core: owns the dice world, the fixed stepper and the current
//! animation session, and runs the per-frame loop.
//!
//! Layout:
//! - init/     - construction and roll spawn
//! - step/     - one fixed sub-step (shake, guide, solve, clamp, finalize)
//! - perf/     - optional per-frame timings
//! - session   - session phases and the one-shot guards
//! - bridge    - game phase mapping
//! - facade    - wasm API

use rand_chacha::ChaCha8Rng;

use crate::domain::config::EngineConfig;
use crate::domain::error::EngineError;
use crate::domain::faces::Face;
use crate::domain::outcome::{Outcome, SharedTarget, DICE_COUNT};
use crate::integrator::FixedStepper;
use crate::rigid_body::DieState;
use crate::rigid_body_system::DiceWorld;

#[path = "perf/perf_timer.rs"]
mod perf_timer;
#[path = "perf/perf_stats.rs"]
mod perf_stats;
#[path = "step/step.rs"]
mod step;
#[path = "init/init.rs"]
mod init;
pub mod bridge;
pub mod session;
mod facade;

pub use bridge::{EngineState, GamePhase};
pub use facade::DiceEngine;
pub use perf_stats::PerfStats;
pub use session::{AnimationSession, GuidancePlan, SessionPhase};

use perf_timer::PerfTimer;

/// Receives the settled outcome. Called once per session.
pub trait SettledListener {
    fn on_settled(&mut self, outcome: Outcome);
}

impl<F: FnMut(Outcome)> SettledListener for F {
    fn on_settled(&mut self, outcome: Outcome) {
        self(outcome)
    }
}

/// What one `advance` call did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameReport {
    pub sub_steps: u32,
    pub phase: SessionPhase,
    pub progress: f32,
    /// Set only on the frame the session settled.
    pub settled: Option<Outcome>,
}

pub struct EngineCore {
    config: EngineConfig,
    world: DiceWorld,
    stepper: FixedStepper,
    session: AnimationSession,
    target: SharedTarget,
    rng: ChaCha8Rng,
    seed: u64,
    rounds: u64,
    listener: Option<Box<dyn SettledListener>>,
    last_outcome: Option<Outcome>,

    // Perf metrics
    perf_enabled: bool,
    perf_stats: PerfStats,
}

impl EngineCore {
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(init::create_engine_core(config))
    }

    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        Ok(init::create_engine_core(EngineConfig::from_json(json)?))
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn config_json(&self) -> String {
        self.config.to_json()
    }

    pub fn world(&self) -> &DiceWorld {
        &self.world
    }

    pub fn session(&self) -> &AnimationSession {
        &self.session
    }

    pub fn stepper(&self) -> &FixedStepper {
        &self.stepper
    }

    /// Begin a new roll: reset, respawn the dice and start shaking.
    ///
    /// The bound target is kept so an outcome known before the roll still
    /// applies. Returns false if a session is already running.
    pub fn start_session(&mut self) -> bool {
        if self.session.phase().is_running() {
            return false;
        }
        self.reset_session();
        self.rng = init::session_rng(self.seed, self.rounds);
        self.rounds += 1;
        init::spawn_dice(&mut self.world, &self.config, &mut self.rng);
        self.session.start();
        tracing::info!(
            seed = self.seed,
            round = self.rounds,
            target_bound = self.target.is_bound(),
            "roll started"
        );
        true
    }

    /// Back to idle: frame counter, guards and stepper cleared, dice back on
    /// their resting line and asleep with no solver state left from the
    /// previous round. The bound target is not touched.
    pub fn reset_session(&mut self) {
        self.session.reset();
        self.stepper.reset();
        self.last_outcome = None;
        self.world.reset(&self.config);
        tracing::debug!(rounds = self.rounds, "session reset");
    }

    /// Restart the roll sequence from `seed`. The next session draws from
    /// stream 0 of the new seed, exactly like a freshly built engine.
    pub fn reseed(&mut self, seed: u64) {
        self.seed = seed;
        self.rounds = 0;
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Sessions started since construction or the last `reseed`.
    pub fn rounds(&self) -> u64 {
        self.rounds
    }

    /// Validate and publish the authoritative outcome. Safe before, during or
    /// after the shake window.
    pub fn bind_target_outcome(&mut self, d1: u8, d2: u8, d3: u8) -> Result<Outcome, EngineError> {
        let outcome = Outcome::new(d1, d2, d3)?;
        self.bind_target(outcome);
        Ok(outcome)
    }

    pub fn bind_target(&mut self, outcome: Outcome) {
        self.target.store(outcome);
        tracing::debug!(
            outcome = %outcome,
            phase = self.session.phase().as_str(),
            "target bound"
        );
    }

    pub fn clear_target(&mut self) {
        self.target.clear();
    }

    pub fn target(&self) -> Option<Outcome> {
        self.target.load()
    }

    /// Shared slot for writers outside the frame loop.
    pub fn target_handle(&self) -> SharedTarget {
        self.target.clone()
    }

    pub fn on_game_phase(&mut self, phase: GamePhase) {
        bridge::on_game_phase(self, phase);
    }

    pub fn on_game_phase_str(&mut self, phase: &str) -> Result<(), EngineError> {
        self.on_game_phase(phase.parse()?);
        Ok(())
    }

    pub fn set_settled_listener(&mut self, listener: impl SettledListener + 'static) {
        self.listener = Some(Box::new(listener));
    }

    pub fn clear_settled_listener(&mut self) {
        self.listener = None;
    }

    /// Skip the rest of the budget. Snaps now if a target is bound, otherwise
    /// waits in the fallback until one is.
    pub fn force_settle(&mut self) -> Option<Outcome> {
        if !self.session.phase().is_running() {
            return None;
        }
        self.session.force();
        tracing::info!(
            frame = self.session.frame(),
            target_bound = self.target.is_bound(),
            "settle forced"
        );
        step::finalize_if_due(self)
    }

    /// Run the completion check outside the frame loop. Returns the outcome
    /// only on the call that settled the session.
    pub fn try_finalize(&mut self) -> Option<Outcome> {
        step::finalize_if_due(self)
    }

    /// Feed one rendered frame's elapsed seconds.
    pub fn advance(&mut self, elapsed: f32) -> FrameReport {
        let perf_on = self.perf_enabled;
        if perf_on {
            self.perf_stats.reset();
        }
        let frame_start = if perf_on { Some(PerfTimer::start()) } else { None };

        let mut sub_steps = 0;
        let mut settled = None;
        if self.session.phase().is_running() {
            let steps = self.stepper.accumulate(elapsed);
            for _ in 0..steps {
                sub_steps += 1;
                if let Some(outcome) = step::step(self) {
                    settled = Some(outcome);
                    break;
                }
            }
        }

        if let Some(t0) = frame_start {
            self.perf_stats.frame_ms = t0.elapsed_ms();
            self.perf_stats.sub_steps = sub_steps;
            self.perf_stats.simulated_ms =
                sub_steps as f64 * self.stepper.step_size() as f64 * 1000.0;
            self.perf_stats.accumulator_ms = self.stepper.accumulator() * 1000.0;
            self.perf_stats.session_frame = self.session.frame();
            self.perf_stats.progress = self.session.progress();
            self.perf_stats.settled = settled.is_some();
        }

        FrameReport {
            sub_steps,
            phase: self.session.phase(),
            progress: self.session.progress(),
            settled,
        }
    }

    fn notify_settled(&mut self, outcome: Outcome) {
        self.last_outcome = Some(outcome);
        if let Some(listener) = self.listener.as_mut() {
            listener.on_settled(outcome);
        }
    }

    /// Outcome of the current session once it has settled.
    pub fn last_outcome(&self) -> Option<Outcome> {
        self.last_outcome
    }

    pub fn engine_state(&self) -> EngineState {
        self.session.phase().into()
    }

    pub fn session_phase(&self) -> SessionPhase {
        self.session.phase()
    }

    pub fn progress(&self) -> f32 {
        self.session.progress()
    }

    pub fn frame(&self) -> u32 {
        self.session.frame()
    }

    pub fn die_states(&self) -> [DieState; DICE_COUNT] {
        self.world.states()
    }

    /// Faces currently pointing up, in die order.
    pub fn face_values(&self) -> [Face; DICE_COUNT] {
        let states = self.world.states();
        std::array::from_fn(|die| states[die].up_face())
    }

    /// `[px, py, pz, qx, qy, qz, qw]` per die, for the renderer.
    pub fn transforms(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(DICE_COUNT * 7);
        for die in 0..DICE_COUNT {
            let (p, q) = self.world.pose(die);
            out.extend_from_slice(&[p.x, p.y, p.z, q.x, q.y, q.z, q.w]);
        }
        out
    }

    /// Enable or disable per-frame perf metrics (adds timing overhead when enabled)
    pub fn enable_perf_metrics(&mut self, enabled: bool) {
        self.perf_enabled = enabled;
        if !enabled {
            self.perf_stats.reset();
        }
    }

    /// Last frame's perf snapshot (zeros when perf disabled)
    pub fn get_perf_stats(&self) -> PerfStats {
        self.perf_stats.clone()
    }
}

#[cfg(test)]
#[path = "tests/tests.rs"]
mod tests;
