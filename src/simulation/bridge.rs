//! Mapping between the host game's round phases and engine sessions.

use std::fmt;
use std::str::FromStr;

use crate::domain::error::EngineError;

use super::session::SessionPhase;
use super::EngineCore;

/// Round phase as driven by the game state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GamePhase {
    Betting,
    Rolling,
    Revealing,
    Settled,
}

impl GamePhase {
    pub fn as_str(self) -> &'static str {
        match self {
            GamePhase::Betting => "betting",
            GamePhase::Rolling => "rolling",
            GamePhase::Revealing => "revealing",
            GamePhase::Settled => "settled",
        }
    }
}

impl FromStr for GamePhase {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "betting" => Ok(GamePhase::Betting),
            "rolling" => Ok(GamePhase::Rolling),
            "revealing" => Ok(GamePhase::Revealing),
            "settled" => Ok(GamePhase::Settled),
            _ => Err(EngineError::UnknownPhase(s.to_string())),
        }
    }
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse engine state as the game sees it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EngineState {
    Idle,
    Shaking,
    Settled,
}

impl EngineState {
    pub fn as_str(self) -> &'static str {
        match self {
            EngineState::Idle => "idle",
            EngineState::Shaking => "shaking",
            EngineState::Settled => "settled",
        }
    }
}

impl From<SessionPhase> for EngineState {
    fn from(phase: SessionPhase) -> Self {
        match phase {
            SessionPhase::Idle => EngineState::Idle,
            SessionPhase::Shaking | SessionPhase::Guiding | SessionPhase::Finalizing => {
                EngineState::Shaking
            }
            SessionPhase::Settled => EngineState::Settled,
        }
    }
}

pub(super) fn on_game_phase(engine: &mut EngineCore, phase: GamePhase) {
    tracing::debug!(phase = phase.as_str(), state = engine.engine_state().as_str(), "game phase");
    match phase {
        GamePhase::Rolling => {
            // A roll already in flight keeps going.
            if !engine.session.phase().is_running() {
                engine.start_session();
            }
        }
        GamePhase::Betting => {
            engine.reset_session();
            engine.target.clear();
        }
        GamePhase::Revealing | GamePhase::Settled => {
            match engine.session.phase() {
                SessionPhase::Settled => {}
                SessionPhase::Idle => {
                    engine.start_session();
                    engine.force_settle();
                }
                _ => {
                    engine.force_settle();
                }
            }
        }
    }
}
