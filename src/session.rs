use std::sync::{PoisonError, RwLock};

use time::{Duration, OffsetDateTime};

/// How long a stored session lives after login.
pub const SESSION_TTL: Duration = Duration::days(1);

/// Bearer token plus the display-only email stored next to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCredentials {
    pub token: String,
    /// Display only. Carries no integrity guarantee.
    pub email: Option<String>,
    pub expires_at: OffsetDateTime,
}

impl SessionCredentials {
    /// Credentials that expire [`SESSION_TTL`] from now.
    #[must_use]
    pub fn new(token: impl Into<String>, email: Option<String>) -> Self {
        Self {
            token: token.into(),
            email,
            expires_at: OffsetDateTime::now_utc() + SESSION_TTL,
        }
    }

    #[must_use]
    pub fn with_expires_at(mut self, expires_at: OffsetDateTime) -> Self {
        self.expires_at = expires_at;
        self
    }

    /// Storage-level expiry, independent of the token's own `exp` claim.
    #[must_use]
    pub fn is_stale_at(&self, now: OffsetDateTime) -> bool {
        self.expires_at <= now
    }
}

/// Where the request client keeps the session pair.
///
/// Stale entries must behave as absent, the same way an expired cookie
/// disappears from a browser.
///
/// # Example
///
/// ```rust,ignore
/// struct BrowserCookies;
///
/// impl SessionStore for BrowserCookies {
///     fn token(&self) -> Option<String> { read_cookie("auth_token") }
///     fn email(&self) -> Option<String> { read_cookie("user_email") }
///     fn store(&self, credentials: SessionCredentials) { /* write both */ }
///     fn clear_token(&self) { remove_cookie("auth_token") }
///     fn clear(&self) { remove_cookie("auth_token"); remove_cookie("user_email") }
/// }
/// ```
pub trait SessionStore: Send + Sync + 'static {
    /// Current bearer token, if any.
    fn token(&self) -> Option<String>;

    /// Current display email, if any.
    fn email(&self) -> Option<String>;

    /// Replace the session pair (login).
    fn store(&self, credentials: SessionCredentials);

    /// Drop the bearer token only (authorization failure).
    fn clear_token(&self);

    /// Drop both the token and the email (logout).
    fn clear(&self);
}

/// In-process session storage.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    inner: RwLock<Option<SessionCredentials>>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with an existing session.
    #[must_use]
    pub fn with_credentials(credentials: SessionCredentials) -> Self {
        Self {
            inner: RwLock::new(Some(credentials)),
        }
    }

    /// Snapshot of the live session, if any.
    #[must_use]
    pub fn credentials(&self) -> Option<SessionCredentials> {
        let now = OffsetDateTime::now_utc();
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .filter(|c| !c.is_stale_at(now) && !c.token.is_empty())
            .cloned()
    }
}

impl SessionStore for MemorySessionStore {
    fn token(&self) -> Option<String> {
        self.credentials().map(|c| c.token)
    }

    fn email(&self) -> Option<String> {
        let now = OffsetDateTime::now_utc();
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .filter(|c| !c.is_stale_at(now))
            .and_then(|c| c.email.clone())
    }

    fn store(&self, credentials: SessionCredentials) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = Some(credentials);
    }

    fn clear_token(&self) {
        if let Some(c) = self
            .inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .as_mut()
        {
            c.token.clear();
        }
    }

    fn clear(&self) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

/// Why a session stopped being usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum InvalidationReason {
    /// The backend rejected the token with `401 Unauthorized`.
    Unauthorized,
    /// The user logged out.
    LoggedOut,
}

/// Hook for the hosting application to react when the session goes away,
/// typically by navigating to the login page.
///
/// Any `Fn(InvalidationReason)` closure is an observer.
pub trait SessionObserver: Send + Sync + 'static {
    fn session_invalidated(&self, reason: InvalidationReason);
}

impl<F> SessionObserver for F
where
    F: Fn(InvalidationReason) + Send + Sync + 'static,
{
    fn session_invalidated(&self, reason: InvalidationReason) {
        self(reason);
    }
}

/// Observer that ignores every signal.
#[derive(Debug, Clone, Copy, Default)]
pub struct IgnoreInvalidation;

impl SessionObserver for IgnoreInvalidation {
    fn session_invalidated(&self, _reason: InvalidationReason) {}
}
