use thiserror::Error;

/// Why a slate fetch produced no games.
///
/// The display text is what the board shows the user, so `Upstream` renders
/// the producer's message untouched.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection refused, timeout, TLS failure and friends.
    #[error("Failed to fetch games: {0}")]
    Transport(#[from] reqwest::Error),

    /// The endpoint answered with a non-2xx status.
    #[error("Failed to fetch games: HTTP {0}")]
    Status(u16),

    /// The body was not JSON, or not one of the two accepted payload shapes.
    #[error("Malformed games payload: {0}")]
    Malformed(String),

    /// Transport succeeded but the payload is `{ "error": ... }`.
    #[error("{0}")]
    Upstream(String),
}

impl FetchError {
    pub fn is_upstream(&self) -> bool {
        matches!(self, FetchError::Upstream(_))
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::Malformed(e.to_string())
    }
}
