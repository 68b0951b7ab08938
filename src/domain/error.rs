use thiserror::Error;

/// Errors surfaced by the engine API. None of these are fatal to the host:
/// the simulation keeps its previous state when an operation is rejected.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid face value {0} (expected 1..=6)")]
    InvalidFace(u8),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("config parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),
    #[error("unknown game phase: {0}")]
    UnknownPhase(String),
}
