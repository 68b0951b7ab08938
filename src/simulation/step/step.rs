use glam::Quat;

use crate::boundary::enforce_boundary;
use crate::domain::faces::target_orientation;
use crate::domain::outcome::{Outcome, DICE_COUNT};
use crate::finalize::{apply_fallback_damping, snap_to_targets};
use crate::guidance::{apply_guidance, GuidanceWeights};
use crate::shake::{apply_shake, clamp_speeds};

use super::session::{GuidancePlan, SessionPhase};
use super::{EngineCore, PerfTimer};

/// Run one fixed sub-step of the active session.
///
/// Order: read target, shake or guide, solver step, boundary clamp, speed
/// clamp, frame count, completion check. Returns the outcome when this
/// sub-step settled the dice.
pub(super) fn step(engine: &mut EngineCore) -> Option<Outcome> {
    let perf_on = engine.perf_enabled;
    let dt = engine.stepper.step_size();
    let target = engine.target.load();
    let progress = engine.session.progress();

    let mut timer = if perf_on { Some(PerfTimer::start()) } else { None };

    if engine.session.phase() == SessionPhase::Shaking {
        if engine.session.in_shake_window() {
            let time = engine.session.time(dt);
            apply_shake(&mut engine.world, &engine.config, progress, time, dt, &mut engine.rng);
        } else if let Some(outcome) = target {
            begin_guidance(engine, outcome);
        }
    }

    match engine.session.phase() {
        SessionPhase::Guiding => guide(engine, target, progress),
        SessionPhase::Finalizing => apply_fallback_damping(&mut engine.world, &engine.config),
        _ => {}
    }

    if let Some(t) = timer.as_mut() {
        engine.perf_stats.systems_ms += t.lap_ms();
    }

    engine.world.step(dt);
    if let Some(t) = timer.as_mut() {
        engine.perf_stats.physics_ms += t.lap_ms();
    }

    let corrected = enforce_boundary(&mut engine.world, &engine.config);
    if perf_on {
        engine.perf_stats.boundary_corrections += corrected;
    }
    clamp_speeds(&mut engine.world, &engine.config.shake);

    engine.session.advance_frame();

    finalize_if_due(engine)
}

fn begin_guidance(engine: &mut EngineCore, outcome: Outcome) {
    let states = engine.world.states();
    let initial: [Quat; DICE_COUNT] = std::array::from_fn(|die| states[die].orientation);
    let targets: [Quat; DICE_COUNT] =
        std::array::from_fn(|die| target_orientation(initial[die], outcome.face(die)));
    let plan = GuidancePlan { outcome, initial, targets };
    if engine.session.begin_guidance(plan) {
        tracing::debug!(
            outcome = %outcome,
            frame = engine.session.frame(),
            "guidance engaged"
        );
    }
}

fn guide(engine: &mut EngineCore, target: Option<Outcome>, progress: f32) {
    let Some(mut plan) = engine.session.plan().copied() else {
        return;
    };

    if let Some(outcome) = target {
        if outcome != plan.outcome {
            let targets: [Quat; DICE_COUNT] =
                std::array::from_fn(|die| target_orientation(plan.initial[die], outcome.face(die)));
            tracing::debug!(from = %plan.outcome, to = %outcome, "target rebound during guidance");
            engine.session.retarget(outcome, targets);
            plan.outcome = outcome;
            plan.targets = targets;
        }
    }

    let weights = GuidanceWeights::at(progress, engine.session.shake_end());
    engine.session.record_weights(weights);
    apply_guidance(&mut engine.world, &engine.config, weights, &plan.initial, &plan.targets);
}

/// Snap the dice if the session is due and a target is bound; otherwise, when
/// due, park the session in the waiting fallback.
pub(super) fn finalize_if_due(engine: &mut EngineCore) -> Option<Outcome> {
    if engine.session.is_finalized() || !engine.session.phase().is_running() {
        return None;
    }
    if !engine.session.budget_exhausted() && !engine.session.is_forced() {
        return None;
    }

    let Some(outcome) = engine.target.load() else {
        if engine.session.enter_finalizing() {
            tracing::warn!(
                frame = engine.session.frame(),
                forced = engine.session.is_forced(),
                "no target outcome bound at end of roll; holding dice until one arrives"
            );
        }
        return None;
    };

    let targets: [Quat; DICE_COUNT] = match engine.session.plan() {
        Some(plan) if plan.outcome == outcome => plan.targets,
        _ => {
            // Guidance never ran: aim from wherever the dice are now.
            let states = engine.world.states();
            std::array::from_fn(|die| target_orientation(states[die].orientation, outcome.face(die)))
        }
    };

    if !engine.session.mark_finalized() {
        return None;
    }
    let shown = snap_to_targets(&mut engine.world, &engine.config, &targets);
    debug_assert_eq!(shown, outcome);
    engine.stepper.reset();

    tracing::info!(
        outcome = %shown,
        frame = engine.session.frame(),
        forced = engine.session.is_forced(),
        "dice settled"
    );
    engine.notify_settled(shown);
    Some(shown)
}
