use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum_extra::extract::CookieJar;
use serde::Serialize;

use super::cookies;
use super::error::AuthError;
use super::guard::GuardState;
use crate::token::decode_unverified;

/// Signed-in user as seen by the session cookies.
///
/// Use as an Axum extractor in route handlers. Returns `401 Unauthorized`
/// if the token is missing, malformed or expired. Nothing here is
/// verified; treat `email` as display data only.
///
/// # Example
///
/// ```rust,ignore
/// async fn header(user: SessionUser) -> impl IntoResponse {
///     format!("Signed in as {}", user.email.as_deref().unwrap_or("unknown"))
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct SessionUser {
    /// Email from the display cookie, falling back to the token's claim.
    pub email: Option<String>,
    /// Token `exp`, seconds since the Unix epoch.
    pub expires_at: i64,
    #[serde(skip)]
    pub token: String,
}

impl<S> FromRequestParts<S> for SessionUser
where
    GuardState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let guard = GuardState::from_ref(state);
        let jar = CookieJar::from_headers(&parts.headers);

        let token =
            cookies::get_token(&jar, &guard.settings).ok_or(AuthError::Unauthenticated)?;

        let claims = decode_unverified(&token).map_err(|_| AuthError::SessionExpired)?;
        if claims.is_expired() {
            return Err(AuthError::SessionExpired);
        }

        let email = cookies::get_email(&jar, &guard.settings)
            .or_else(|| claims.email().map(str::to_owned));

        Ok(Self {
            email,
            expires_at: claims.expires_at(),
            token,
        })
    }
}
