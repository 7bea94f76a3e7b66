use thiserror::Error;

/// Errors surfaced by the public API. Gameplay itself never fails: losing a
/// run is a status, and stale entity references are ignored.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("no upgrade choice is pending")]
    NoPendingUpgrade,

    #[error("upgrade option {index} is out of range (offer has {available})")]
    UpgradeOutOfRange { index: usize, available: usize },

    #[error("invalid tuning: {0}")]
    InvalidTuning(&'static str),

    #[error("failed to parse tuning: {0}")]
    TuningParse(#[from] serde_json::Error),
}
