use thiserror::Error;

/// Failures talking to the trace store.
///
/// Transport problems and non-2xx responses are kept apart so callers can
/// log them distinctly, even though the dashboard reacts to both the same
/// way: keep the stale cache and carry on.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection, timeout, or response-decoding failure.
    #[error("Connection error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The store answered with a non-success status code.
    #[error("Trace store error ({status}): {message}")]
    Api { status: u16, message: String },
}

impl ApiError {
    /// Status code of an application-level error, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Api { status, .. } => Some(*status),
            ApiError::Transport(_) => None,
        }
    }
}
