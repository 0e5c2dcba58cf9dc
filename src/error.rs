use thiserror::Error;

/// Refusals surfaced by the game core itself.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("no valid play session; payment is required before starting")]
    NoValidSession,
}

/// Failures raised by external collaborators (session store, leaderboard).
/// The core never lets one of these change game state.
#[derive(Debug, Error)]
pub enum CollaboratorError {
    #[error("score submission failed: {0}")]
    Submission(String),

    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed stored data: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config: {0}")]
    Invalid(String),

    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}
