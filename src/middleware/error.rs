use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};

/// Authentication errors for the middleware layer.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No session token found.
    #[error("Not authenticated")]
    Unauthenticated,

    /// Token is malformed or past its `exp`.
    #[error("Session expired")]
    SessionExpired,

    /// The backend refused the login or could not be reached.
    ///
    /// Renders as a redirect back to `login_path` carrying the message.
    #[error("{message}")]
    LoginRejected { login_path: String, message: String },

    /// Missing or invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            Self::Unauthenticated | Self::SessionExpired => {
                (StatusCode::UNAUTHORIZED, self.to_string()).into_response()
            }
            Self::LoginRejected {
                ref login_path,
                ref message,
            } => {
                let encoded = urlencoding::encode(message);
                Redirect::to(&format!("{login_path}?error={encoded}")).into_response()
            }
            Self::Config(_) => {
                tracing::error!(error = %self, "Session middleware internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error").into_response()
            }
        }
    }
}

/// Setup-time failures; every one of them is a configuration problem.
impl From<crate::error::Error> for AuthError {
    fn from(e: crate::error::Error) -> Self {
        match e {
            crate::error::Error::Config(msg) => Self::Config(msg),
            other => Self::Config(other.to_string()),
        }
    }
}
