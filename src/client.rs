use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use reqwest::multipart::Form;
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

use crate::config::ClientConfig;
use crate::error::Error;
use crate::session::{
    IgnoreInvalidation, InvalidationReason, MemorySessionStore, SessionCredentials,
    SessionObserver, SessionStore,
};
use crate::types::{LoginRequest, LoginResponse};

/// Message used when a failed response carries no readable error.
pub const FALLBACK_ERROR_MESSAGE: &str = "Request failed";

/// Message used when a failed login carries no readable error.
pub const FALLBACK_LOGIN_MESSAGE: &str = "Authentication failed";

const JSON_CONTENT_TYPE: &str = "application/json";

/// Request payload.
///
/// `Text` is sent as JSON; the caller serializes it. `Multipart` keeps the
/// boundary content type that reqwest generates.
#[derive(Debug)]
pub enum RequestBody {
    Text(String),
    Multipart(Form),
}

impl From<String> for RequestBody {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for RequestBody {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<Form> for RequestBody {
    fn from(form: Form) -> Self {
        Self::Multipart(form)
    }
}

/// Method, headers and body for [`ApiClient::fetch`].
///
/// ```rust,ignore
/// let options = RequestOptions::post()
///     .with_body(r#"{"collection_name":"Summer"}"#);
/// ```
#[derive(Debug, Default)]
pub struct RequestOptions {
    method: Option<String>,
    headers: HeaderMap,
    body: Option<RequestBody>,
}

impl RequestOptions {
    /// `GET` with no extra headers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn post() -> Self {
        Self::new().with_method("POST")
    }

    #[must_use]
    pub fn patch() -> Self {
        Self::new().with_method("PATCH")
    }

    /// Any method name; casing is normalized when the request is sent.
    #[must_use]
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    #[must_use]
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers.extend(headers);
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<RequestBody>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Serialize `value` as the JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRequest`] if `value` cannot be serialized.
    pub fn with_json<T: Serialize + ?Sized>(self, value: &T) -> Result<Self, Error> {
        let text = serde_json::to_string(value)
            .map_err(|e| Error::InvalidRequest(format!("body: {e}")))?;
        Ok(self.with_body(text))
    }
}

/// Authorized client for the ShoeFastDesigner backend.
///
/// Every backend call goes through [`fetch`](Self::fetch), which attaches
/// the bearer token from the session store and turns failures into
/// [`Error`] values. A `401` clears the token, notifies the
/// [`SessionObserver`] and yields `Ok(None)` instead of an error.
#[derive(Clone)]
pub struct ApiClient {
    config: Arc<ClientConfig>,
    http: reqwest::Client,
    session: Arc<dyn SessionStore>,
    observer: Arc<dyn SessionObserver>,
}

impl ApiClient {
    /// Create a client with an empty in-memory session.
    #[must_use]
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config: Arc::new(config),
            http: reqwest::Client::new(),
            session: Arc::new(MemorySessionStore::new()),
            observer: Arc::new(IgnoreInvalidation),
        }
    }

    /// Use a custom HTTP client (for connection pool reuse or testing).
    #[must_use]
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http = client;
        self
    }

    /// Keep the session pair in `store`.
    #[must_use]
    pub fn with_session_store(self, store: impl SessionStore) -> Self {
        self.with_shared_session_store(Arc::new(store))
    }

    /// Share a session store with other components.
    #[must_use]
    pub fn with_shared_session_store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.session = store;
        self
    }

    /// Notify `observer` when the session is invalidated.
    #[must_use]
    pub fn with_observer(mut self, observer: impl SessionObserver) -> Self {
        self.observer = Arc::new(observer);
        self
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    #[must_use]
    pub fn session(&self) -> &dyn SessionStore {
        self.session.as_ref()
    }

    /// Send an authorized request to `endpoint` under the configured origin.
    ///
    /// Returns `Ok(None)` when the backend answered `401`: the token has been
    /// dropped and the observer told, so the caller should stop and let the
    /// host navigate to login.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] on network failure, [`Error::Api`] for any other
    /// non-success status, or [`Error::InvalidRequest`] for a bad method.
    pub async fn fetch(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<Option<reqwest::Response>, Error> {
        let RequestOptions {
            method,
            mut headers,
            body,
        } = options;
        let method = normalize_method(method.as_deref())?;

        if let Some(token) = self.session.token() {
            headers.insert(AUTHORIZATION, bearer_value(&token)?);
        }
        if let Some(user_agent) = &self.config.user_agent {
            let value = HeaderValue::from_str(user_agent)
                .map_err(|e| Error::InvalidRequest(format!("user agent: {e}")))?;
            headers.entry(USER_AGENT).or_insert(value);
        }

        let body = if method == Method::GET || method == Method::HEAD {
            if body.is_some() {
                tracing::debug!(%method, endpoint, "Dropping body on bodiless request");
            }
            None
        } else {
            body
        };

        let url = self.config.endpoint_url(endpoint)?;
        tracing::debug!(%method, endpoint, "Backend request");

        let mut request = self.http.request(method, url);
        match body {
            Some(RequestBody::Text(text)) => {
                headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
                request = request.headers(headers).body(text);
            }
            Some(RequestBody::Multipart(form)) => {
                headers.remove(CONTENT_TYPE);
                request = request.headers(headers).multipart(form);
            }
            None => request = request.headers(headers),
        }

        let response = request.send().await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            tracing::warn!(endpoint, "Backend rejected session token");
            self.invalidate(InvalidationReason::Unauthorized);
            return Ok(None);
        }

        ensure_success(response, FALLBACK_ERROR_MESSAGE).await.map(Some)
    }

    /// [`fetch`](Self::fetch) and decode the JSON body.
    ///
    /// # Errors
    ///
    /// Same as [`fetch`](Self::fetch), plus [`Error::Http`] if the body is
    /// not valid JSON for `T`.
    pub async fn fetch_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<Option<T>, Error> {
        match self.fetch(endpoint, options).await? {
            Some(response) => Ok(Some(response.json::<T>().await?)),
            None => Ok(None),
        }
    }

    /// Log in with email and password and store the returned session.
    ///
    /// Bypasses [`fetch`](Self::fetch): a `401` here means wrong credentials,
    /// not an expired session.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] on network failure, or [`Error::Api`] carrying
    /// the backend's message if the credentials are rejected.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, Error> {
        let url = self.config.endpoint_url("/auth/login")?;
        let response = self
            .http
            .post(url)
            .json(&LoginRequest { email, password })
            .send()
            .await?;

        let response = ensure_success(response, FALLBACK_LOGIN_MESSAGE).await?;
        let login = response.json::<LoginResponse>().await?;

        self.session.store(SessionCredentials::new(
            login.id_token.clone(),
            Some(login.email.clone()),
        ));
        tracing::info!("Login successful");

        Ok(login)
    }

    /// Tell the backend the session is over, then forget it locally.
    ///
    /// The local session is cleared even if the backend call fails.
    pub async fn logout(&self) {
        if let Some(token) = self.session.token() {
            match self.config.endpoint_url("/auth/logout") {
                Ok(url) => {
                    let result = self.http.post(url).bearer_auth(&token).send().await;
                    match result {
                        Ok(response) if !response.status().is_success() => {
                            tracing::warn!(status = %response.status(), "Backend logout failed");
                        }
                        Err(e) => tracing::warn!(error = %e, "Backend logout failed"),
                        Ok(_) => {}
                    }
                }
                Err(e) => tracing::warn!(error = %e, "Backend logout failed"),
            }
        }

        self.invalidate(InvalidationReason::LoggedOut);
        tracing::info!("Logged out");
    }

    fn invalidate(&self, reason: InvalidationReason) {
        match reason {
            InvalidationReason::Unauthorized => self.session.clear_token(),
            _ => self.session.clear(),
        }
        self.observer.session_invalidated(reason);
    }
}

fn normalize_method(method: Option<&str>) -> Result<Method, Error> {
    let Some(raw) = method else {
        return Ok(Method::GET);
    };
    let upper = raw.trim().to_ascii_uppercase();
    Method::from_bytes(upper.as_bytes())
        .map_err(|_| Error::InvalidRequest(format!("invalid method: {raw:?}")))
}

fn bearer_value(token: &str) -> Result<HeaderValue, Error> {
    let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
        .map_err(|_| Error::InvalidRequest("session token is not a valid header value".into()))?;
    value.set_sensitive(true);
    Ok(value)
}

/// Checks HTTP response status; returns the response on success or an
/// [`Error::Api`] carrying the backend's message.
async fn ensure_success(
    response: reqwest::Response,
    fallback: &str,
) -> Result<reqwest::Response, Error> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status().as_u16();
    let body = response.bytes().await.unwrap_or_default();
    let message = error_message(&body).unwrap_or_else(|| fallback.to_owned());
    tracing::debug!(status, %message, "Backend returned an error");
    Err(Error::Api { status, message })
}

/// Human-readable message from a JSON error body (`detail`, then `message`).
pub(crate) fn error_message(body: &[u8]) -> Option<String> {
    let json: JsonValue = serde_json::from_slice(body).ok()?;
    ["detail", "message"]
        .iter()
        .filter_map(|key| json.get(key).and_then(JsonValue::as_str))
        .find(|s| !s.is_empty())
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_casing_is_normalized() {
        assert_eq!(normalize_method(Some("post")).unwrap(), Method::POST);
        assert_eq!(normalize_method(Some(" Patch ")).unwrap(), Method::PATCH);
        assert_eq!(normalize_method(None).unwrap(), Method::GET);
        assert!(normalize_method(Some("no spaces")).is_err());
    }

    #[test]
    fn error_message_prefers_detail() {
        assert_eq!(
            error_message(br#"{"detail":"Invalid credentials","message":"x"}"#).as_deref(),
            Some("Invalid credentials")
        );
        assert_eq!(
            error_message(br#"{"message":"Bucket exists"}"#).as_deref(),
            Some("Bucket exists")
        );
    }

    #[test]
    fn error_message_ignores_unreadable_bodies() {
        assert_eq!(error_message(b"<html>502</html>"), None);
        assert_eq!(error_message(b""), None);
        assert_eq!(error_message(br#"{"detail":[{"loc":["body"]}]}"#), None);
        assert_eq!(error_message(br#"{"detail":""}"#), None);
    }

    #[test]
    fn bearer_header_is_sensitive() {
        let value = bearer_value("abc").unwrap();
        assert_eq!(value.to_str().unwrap(), "Bearer abc");
        assert!(value.is_sensitive());
        assert!(bearer_value("bad\ntoken").is_err());
    }

    #[test]
    fn json_body_helper_serializes() {
        let options = RequestOptions::post()
            .with_json(&serde_json::json!({"collection_name": "Summer"}))
            .unwrap();
        match options.body {
            Some(RequestBody::Text(text)) => assert_eq!(text, r#"{"collection_name":"Summer"}"#),
            other => panic!("unexpected body: {other:?}"),
        }
    }
}
