use axum::extract::State;
use axum::response::Redirect;
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_extra::extract::CookieJar;
use serde::Deserialize;

use super::config::SessionAuthConfig;
use super::cookies;
use super::error::AuthError;
use super::extractor::SessionUser;
use super::guard::GuardState;
use super::state::SessionState;
use crate::session::{MemorySessionStore, SessionCredentials};

/// Create the login/logout router, mounted under the configured auth path.
///
/// - `POST {auth_path}/login` with JSON `{"email", "password"}`
/// - `GET|POST {auth_path}/logout`
/// - `GET {auth_path}/me`
pub fn session_routes(config: SessionAuthConfig) -> Router {
    let auth_path = config.settings.auth_path.trim_end_matches('/').to_string();

    let state = SessionState {
        client: config.client,
        guard: GuardState::new(config.settings),
    };

    Router::new()
        .route(&format!("{auth_path}/login"), post(login))
        .route(&format!("{auth_path}/logout"), get(logout).post(logout))
        .route(&format!("{auth_path}/me"), get(me))
        .with_state(state)
}

// ── Login ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct LoginForm {
    email: String,
    password: String,
}

async fn login(
    State(state): State<SessionState>,
    jar: CookieJar,
    Json(form): Json<LoginForm>,
) -> Result<(CookieJar, Redirect), AuthError> {
    let settings = state.guard.settings.as_ref();

    // Fresh store per request: the shared client must not hold anyone's session.
    let client = state
        .client
        .clone()
        .with_session_store(MemorySessionStore::new());

    let login = client
        .login(&form.email, &form.password)
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, "Login rejected");
            AuthError::LoginRejected {
                login_path: settings.login_path.clone(),
                message: e.to_string(),
            }
        })?;

    let (token_cookie, email_cookie) =
        cookies::session_cookies(settings, &login.id_token, &login.email);

    Ok((
        jar.add(token_cookie).add(email_cookie),
        Redirect::to(&settings.home_path),
    ))
}

// ── Logout ─────────────────────────────────────────────────────────

async fn logout(State(state): State<SessionState>, jar: CookieJar) -> (CookieJar, Redirect) {
    let settings = state.guard.settings.as_ref();

    if let Some(token) = cookies::get_token(&jar, settings) {
        let email = cookies::get_email(&jar, settings);
        let client = state
            .client
            .clone()
            .with_session_store(MemorySessionStore::with_credentials(
                SessionCredentials::new(token, email),
            ));
        client.logout().await;
    }

    (
        cookies::remove_session(jar, settings),
        Redirect::to(&settings.login_path),
    )
}

// ── Me ─────────────────────────────────────────────────────────────

async fn me(user: SessionUser) -> Json<SessionUser> {
    Json(user)
}
