use glam::Quat;

use crate::domain::config::EngineConfig;
use crate::domain::outcome::{Outcome, DICE_COUNT};
use crate::guidance::GuidanceWeights;

/// Where a session is in its shake-to-rest cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    /// Between rounds. Dice visible and asleep.
    Idle,
    /// Shake impulses, or free physics past the shake window while no target
    /// is bound yet.
    Shaking,
    /// Blending toward the bound target.
    Guiding,
    /// Frame budget spent without a target: damping hard and waiting.
    Finalizing,
    /// Finalizer fired. Only a reset or a new start leaves this phase.
    Settled,
}

impl SessionPhase {
    pub fn is_running(self) -> bool {
        matches!(
            self,
            SessionPhase::Shaking | SessionPhase::Guiding | SessionPhase::Finalizing
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SessionPhase::Idle => "idle",
            SessionPhase::Shaking => "shaking",
            SessionPhase::Guiding => "guiding",
            SessionPhase::Finalizing => "finalizing",
            SessionPhase::Settled => "settled",
        }
    }
}

/// Guidance data captured once, when the blend begins.
#[derive(Clone, Copy, Debug)]
pub struct GuidancePlan {
    pub outcome: Outcome,
    pub initial: [Quat; DICE_COUNT],
    pub targets: [Quat; DICE_COUNT],
}

/// One shake-to-rest cycle, owned by the engine core and handed to the
/// per-step systems by reference.
#[derive(Clone, Debug)]
pub struct AnimationSession {
    phase: SessionPhase,
    frame: u32,
    max_frames: u32,
    shake_end: f32,
    plan: Option<GuidancePlan>,
    weights: GuidanceWeights,
    has_corrected: bool,
    finalized: bool,
    forced: bool,
    overtime_warned: bool,
}

impl AnimationSession {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            phase: SessionPhase::Idle,
            frame: 0,
            max_frames: config.session.max_frames.max(1),
            shake_end: config.session.shake_end,
            plan: None,
            weights: GuidanceWeights::default(),
            has_corrected: false,
            finalized: false,
            forced: false,
            overtime_warned: false,
        }
    }

    /// Clear everything back to `Idle`, including the one-shot guard.
    pub fn reset(&mut self) {
        self.phase = SessionPhase::Idle;
        self.frame = 0;
        self.plan = None;
        self.weights = GuidanceWeights::default();
        self.has_corrected = false;
        self.finalized = false;
        self.forced = false;
        self.overtime_warned = false;
    }

    /// Reset and enter `Shaking`.
    pub fn start(&mut self) {
        self.reset();
        self.phase = SessionPhase::Shaking;
    }

    #[inline]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[inline]
    pub fn frame(&self) -> u32 {
        self.frame
    }

    #[inline]
    pub fn max_frames(&self) -> u32 {
        self.max_frames
    }

    #[inline]
    pub fn shake_end(&self) -> f32 {
        self.shake_end
    }

    /// `frame / max_frames`, in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        self.frame as f32 / self.max_frames as f32
    }

    /// Simulated seconds since the session started.
    pub fn time(&self, step_size: f32) -> f32 {
        self.frame as f32 * step_size
    }

    pub fn in_shake_window(&self) -> bool {
        self.progress() < self.shake_end
    }

    pub fn budget_exhausted(&self) -> bool {
        self.frame >= self.max_frames
    }

    pub fn plan(&self) -> Option<&GuidancePlan> {
        self.plan.as_ref()
    }

    pub fn has_corrected(&self) -> bool {
        self.has_corrected
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    pub fn is_forced(&self) -> bool {
        self.forced
    }

    /// Latest guidance blend weights (zero before guidance).
    pub fn weights(&self) -> GuidanceWeights {
        self.weights
    }

    /// Count one fixed sub-step. Saturates at the budget.
    pub fn advance_frame(&mut self) {
        if self.phase.is_running() && self.frame < self.max_frames {
            self.frame += 1;
        }
    }

    /// Enter `Guiding` with a captured plan. Only allowed once per session and
    /// only from `Shaking`.
    pub fn begin_guidance(&mut self, plan: GuidancePlan) -> bool {
        if self.phase != SessionPhase::Shaking || self.has_corrected {
            return false;
        }
        self.plan = Some(plan);
        self.has_corrected = true;
        self.phase = SessionPhase::Guiding;
        true
    }

    /// Swap the guidance targets when the bound outcome changes mid-blend.
    pub fn retarget(&mut self, outcome: Outcome, targets: [Quat; DICE_COUNT]) {
        if let Some(plan) = self.plan.as_mut() {
            plan.outcome = outcome;
            plan.targets = targets;
        }
    }

    pub fn record_weights(&mut self, weights: GuidanceWeights) {
        // Progress only moves forward, so neither may the blend.
        if weights.orientation >= self.weights.orientation {
            self.weights = weights;
        }
    }

    /// Enter the waiting fallback. Returns true the first time, so callers can
    /// warn once.
    pub fn enter_finalizing(&mut self) -> bool {
        if self.phase.is_running() {
            self.phase = SessionPhase::Finalizing;
        }
        let first = !self.overtime_warned;
        self.overtime_warned = true;
        first
    }

    pub fn force(&mut self) {
        self.forced = true;
    }

    /// One-shot guard. True exactly once between resets.
    pub fn mark_finalized(&mut self) -> bool {
        if self.finalized {
            return false;
        }
        self.finalized = true;
        self.phase = SessionPhase::Settled;
        true
    }
}
