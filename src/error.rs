#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Backend answered with a non-success status. `message` is what the UI shows.
    #[error("{message}")]
    Api { status: u16, message: String },
    #[cfg(feature = "client")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Token error: {0}")]
    Token(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl Error {
    /// HTTP status of an [`Error::Api`] failure.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
