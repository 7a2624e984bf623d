use url::Url;

use crate::error::Error;

/// Environment variable holding the backend API origin.
pub const API_URL_ENV: &str = "SHOEFAST_API_URL";

/// ShoeFastDesigner backend configuration.
///
/// ```rust,ignore
/// use shoefast_client::ClientConfig;
///
/// let config = ClientConfig::new("https://api.example.com".parse()?)
///     .with_user_agent("shoefast-web/1.0");
/// ```
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct ClientConfig {
    pub(crate) base_url: Url,
    pub(crate) user_agent: Option<String>,
}

impl ClientConfig {
    /// Create a configuration for the given API origin.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            user_agent: None,
        }
    }

    /// Create configuration from environment variables.
    ///
    /// # Required env vars
    /// - `SHOEFAST_API_URL`: backend API origin (must be a valid URL)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the variable is missing or not a URL.
    pub fn from_env() -> Result<Self, Error> {
        let raw = std::env::var(API_URL_ENV)
            .map_err(|_| Error::Config(format!("{API_URL_ENV} is required")))?;
        Self::parse(&raw)
    }

    /// Create a configuration from a URL string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `raw` is not an absolute URL.
    pub fn parse(raw: &str) -> Result<Self, Error> {
        let base_url: Url = raw
            .trim()
            .parse()
            .map_err(|e| Error::Config(format!("{API_URL_ENV}: {e}")))?;
        Ok(Self::new(base_url))
    }

    /// Send a custom `User-Agent` with every request.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Backend API origin.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Full URL for `endpoint`, appended verbatim to the origin.
    ///
    /// The origin may carry a path prefix (`https://host/v1`); a trailing
    /// slash on it is ignored so `/auth/login` never becomes `//auth/login`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRequest`] if the joined string is not a URL.
    pub fn endpoint_url(&self, endpoint: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let joined = if endpoint.starts_with('/') {
            format!("{base}{endpoint}")
        } else {
            format!("{base}/{endpoint}")
        };
        joined
            .parse()
            .map_err(|e| Error::InvalidRequest(format!("{endpoint}: {e}")))
    }
}
