use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::CookieJar;
use time::OffsetDateTime;

use super::config::SessionSettings;
use super::cookies;
use crate::token::decode_unverified;

/// Outcome of checking one navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Serve the page.
    Allow,
    /// Send the user to the login page; drop both session cookies first
    /// when `clear_session` is set.
    RedirectToLogin { clear_session: bool },
    /// Already signed in and asked for the login page.
    RedirectHome,
}

/// Runtime state of the session guard.
///
/// Build it with [`SessionAuthConfig::guard_state`](super::SessionAuthConfig::guard_state).
#[derive(Debug, Clone)]
pub struct GuardState {
    pub(super) settings: Arc<SessionSettings>,
}

impl GuardState {
    pub(super) fn new(settings: SessionSettings) -> Self {
        Self {
            settings: Arc::new(settings),
        }
    }

    /// Decide what to do with a navigation to `path` carrying `token`.
    ///
    /// The token's signature is never checked. This is a UX gate that keeps
    /// signed-out users on the login page; the backend still authorizes
    /// every API call.
    #[must_use]
    pub fn evaluate(&self, path: &str, token: Option<&str>, now: OffsetDateTime) -> GuardDecision {
        if self.is_excluded(path) {
            return GuardDecision::Allow;
        }
        let on_login = self.is_login_path(path);

        let Some(token) = token.filter(|t| !t.is_empty()) else {
            return if on_login {
                GuardDecision::Allow
            } else {
                GuardDecision::RedirectToLogin {
                    clear_session: false,
                }
            };
        };

        match decode_unverified(token) {
            Err(_) => GuardDecision::RedirectToLogin {
                clear_session: true,
            },
            Ok(claims) if claims.is_expired_at(now) => GuardDecision::RedirectToLogin {
                clear_session: true,
            },
            Ok(_) if on_login && self.settings.redirect_authenticated_login => {
                GuardDecision::RedirectHome
            }
            Ok(_) => GuardDecision::Allow,
        }
    }

    /// Paths the guard lets through untouched (assets, API proxy).
    #[must_use]
    pub fn is_excluded(&self, path: &str) -> bool {
        self.settings
            .excluded_prefixes
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
    }

    fn is_login_path(&self, path: &str) -> bool {
        let login = self.settings.login_path.trim_end_matches('/');
        let path = path.trim_end_matches('/');
        path == login
    }
}

/// Axum middleware enforcing the session boundary on every navigation.
///
/// ```rust,ignore
/// let app = Router::new()
///     .route("/", get(home))
///     .route("/login", get(login_page))
///     .layer(axum::middleware::from_fn_with_state(
///         config.guard_state(),
///         session_guard,
///     ));
/// ```
pub async fn session_guard(
    State(guard): State<GuardState>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Response {
    let settings = guard.settings.as_ref();
    let token = cookies::get_token(&jar, settings);
    let path = request.uri().path();

    match guard.evaluate(path, token.as_deref(), OffsetDateTime::now_utc()) {
        GuardDecision::Allow => next.run(request).await,
        GuardDecision::RedirectToLogin { clear_session } => {
            if clear_session {
                tracing::warn!(path, "Invalid or expired session token, redirecting to login");
                let jar = cookies::remove_session(jar, settings);
                (jar, Redirect::to(&settings.login_path)).into_response()
            } else {
                tracing::debug!(path, "No session token, redirecting to login");
                Redirect::to(&settings.login_path).into_response()
            }
        }
        GuardDecision::RedirectHome => {
            tracing::debug!(path, "Session already active, leaving login page");
            Redirect::to(&settings.home_path).into_response()
        }
    }
}
