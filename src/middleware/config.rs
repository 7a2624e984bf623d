use super::error::AuthError;
use crate::client::ApiClient;
use crate::config::ClientConfig;

/// Cookie holding the bearer token.
pub const TOKEN_COOKIE_NAME: &str = "auth_token";

/// Cookie holding the display-only email.
pub const EMAIL_COOKIE_NAME: &str = "user_email";

/// Public login page.
pub const DEFAULT_LOGIN_PATH: &str = "/login";

/// Shared session settings used by both config and runtime state.
#[derive(Debug, Clone)]
pub(crate) struct SessionSettings {
    pub(crate) token_cookie_name: String,
    pub(crate) email_cookie_name: String,
    pub(crate) session_ttl_days: i64,
    pub(crate) secure_cookies: bool,
    pub(crate) login_path: String,
    pub(crate) home_path: String,
    pub(crate) auth_path: String,
    pub(crate) excluded_prefixes: Vec<String>,
    pub(crate) redirect_authenticated_login: bool,
}

impl SessionSettings {
    pub(crate) fn defaults() -> Self {
        Self {
            token_cookie_name: TOKEN_COOKIE_NAME.into(),
            email_cookie_name: EMAIL_COOKIE_NAME.into(),
            session_ttl_days: 1,
            secure_cookies: true,
            login_path: DEFAULT_LOGIN_PATH.into(),
            home_path: "/".into(),
            auth_path: "/api/session".into(),
            excluded_prefixes: ["/_next/", "/static/", "/assets/", "/api/", "/favicon.ico"]
                .into_iter()
                .map(String::from)
                .collect(),
            redirect_authenticated_login: false,
        }
    }
}

/// Session guard and login route configuration.
///
/// The client is a constructor parameter, so there is no runtime "missing field" error.
///
/// Use [`from_env()`](SessionAuthConfig::from_env) for convention-based setup,
/// or [`new()`](SessionAuthConfig::new) with `with_*` methods for full control.
#[derive(Clone)]
pub struct SessionAuthConfig {
    pub(super) client: ApiClient,
    pub(super) settings: SessionSettings,
}

impl SessionAuthConfig {
    /// Create config with the required `ApiClient`.
    ///
    /// All optional fields use sensible defaults. Override with `with_*` methods.
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            settings: SessionSettings::defaults(),
        }
    }

    /// Create config from environment variables.
    ///
    /// # Required env vars
    /// - `SHOEFAST_API_URL`: backend API origin
    ///
    /// # Optional env vars
    /// - `SHOEFAST_LOGIN_PATH`: public login page (default `/login`)
    /// - `SHOEFAST_AUTH_PATH`: mount point of the login/logout routes (default `/api/session`)
    /// - `SHOEFAST_INSECURE_COOKIES`: `"1"` or `"true"` drops the `Secure` cookie flag (local HTTP)
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Config`] if the API origin is missing or invalid.
    pub fn from_env() -> Result<Self, AuthError> {
        let client_config = ClientConfig::from_env()?;
        let mut config = Self::new(ApiClient::new(client_config));

        if let Ok(path) = std::env::var("SHOEFAST_LOGIN_PATH") {
            config = config.with_login_path(path);
        }
        if let Ok(path) = std::env::var("SHOEFAST_AUTH_PATH") {
            config = config.with_auth_path(path);
        }

        let insecure = matches!(
            std::env::var("SHOEFAST_INSECURE_COOKIES").as_deref(),
            Ok("1") | Ok("true"),
        );

        Ok(config.with_secure_cookies(!insecure))
    }

    #[must_use]
    pub fn with_token_cookie_name(mut self, name: impl Into<String>) -> Self {
        self.settings.token_cookie_name = name.into();
        self
    }

    #[must_use]
    pub fn with_email_cookie_name(mut self, name: impl Into<String>) -> Self {
        self.settings.email_cookie_name = name.into();
        self
    }

    #[must_use]
    pub fn with_session_ttl_days(mut self, days: i64) -> Self {
        self.settings.session_ttl_days = days;
        self
    }

    #[must_use]
    pub fn with_secure_cookies(mut self, secure: bool) -> Self {
        self.settings.secure_cookies = secure;
        self
    }

    #[must_use]
    pub fn with_login_path(mut self, path: impl Into<String>) -> Self {
        self.settings.login_path = path.into();
        self
    }

    #[must_use]
    pub fn with_home_path(mut self, path: impl Into<String>) -> Self {
        self.settings.home_path = path.into();
        self
    }

    #[must_use]
    pub fn with_auth_path(mut self, path: impl Into<String>) -> Self {
        self.settings.auth_path = path.into();
        self
    }

    /// Replace the path prefixes the guard never intercepts.
    #[must_use]
    pub fn with_excluded_prefixes(mut self, prefixes: Vec<String>) -> Self {
        self.settings.excluded_prefixes = prefixes;
        self
    }

    /// Send users who already hold a valid token away from the login page.
    ///
    /// Off by default: the login page renders even for a live session.
    #[must_use]
    pub fn with_redirect_authenticated_login(mut self, enabled: bool) -> Self {
        self.settings.redirect_authenticated_login = enabled;
        self
    }

    /// The request client used by the login/logout routes.
    #[must_use]
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// State for [`session_guard`](super::session_guard).
    #[must_use]
    pub fn guard_state(&self) -> super::GuardState {
        super::GuardState::new(self.settings.clone())
    }
}
