use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use time::Duration;

use super::config::SessionSettings;

/// Create the token + email cookies for a fresh session.
///
/// Neither cookie is `HttpOnly`: browser-side request code reads the token
/// to build its `Authorization` header, and the email is shown in the UI.
pub(super) fn session_cookies(
    settings: &SessionSettings,
    token: &str,
    email: &str,
) -> (Cookie<'static>, Cookie<'static>) {
    let build = |name: &str, value: &str| {
        Cookie::build((name.to_string(), value.to_string()))
            .http_only(false)
            .secure(settings.secure_cookies)
            .same_site(SameSite::Lax)
            .path("/".to_string())
            .max_age(Duration::days(settings.session_ttl_days))
            .build()
    };

    (
        build(&settings.token_cookie_name, token),
        build(&settings.email_cookie_name, email),
    )
}

/// Create removal cookies for the token + email pair.
pub(super) fn clear_session_cookies(settings: &SessionSettings) -> (Cookie<'static>, Cookie<'static>) {
    let clear = |name: &str| {
        Cookie::build((name.to_string(), ""))
            .path("/".to_string())
            .max_age(Duration::ZERO)
            .build()
    };

    (
        clear(&settings.token_cookie_name),
        clear(&settings.email_cookie_name),
    )
}

/// Remove both session cookies from `jar`.
pub(super) fn remove_session(jar: CookieJar, settings: &SessionSettings) -> CookieJar {
    let (token, email) = clear_session_cookies(settings);
    jar.remove(token).remove(email)
}

/// Get the bearer token from cookies. Empty values count as absent.
pub(super) fn get_token(jar: &CookieJar, settings: &SessionSettings) -> Option<String> {
    jar.get(&settings.token_cookie_name)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}

/// Get the display email from cookies.
pub(super) fn get_email(jar: &CookieJar, settings: &SessionSettings) -> Option<String> {
    jar.get(&settings.email_cookie_name)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}
