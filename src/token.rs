use base64::Engine;
use base64::alphabet::URL_SAFE;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use serde_json::Value as JsonValue;
use time::OffsetDateTime;

use crate::error::Error;

// JWT segments are unpadded base64url, but some issuers pad them anyway.
const SEGMENT_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Claims read from a JWT payload whose signature was NOT checked.
///
/// Only good enough for UX decisions (redirect to login, show an email).
/// The backend that issued the token remains the authority on whether it
/// is actually valid.
#[derive(Debug, Clone)]
pub struct UnverifiedClaims {
    expires_at: i64,
    inner: JsonValue,
}

impl UnverifiedClaims {
    /// The `exp` claim, in seconds since the Unix epoch.
    #[must_use]
    pub fn expires_at(&self) -> i64 {
        self.expires_at
    }

    /// Whether `exp` is strictly before `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
        self.expires_at < now.unix_timestamp()
    }

    /// Whether the token has expired at the current wall-clock time.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(OffsetDateTime::now_utc())
    }

    /// The `email` claim, if present.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.inner.get("email").and_then(JsonValue::as_str)
    }

    /// The `sub` claim, if present.
    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        self.inner.get("sub").and_then(JsonValue::as_str)
    }

    /// Gets a claim value by key.
    #[must_use]
    pub fn get_claim(&self, key: &str) -> Option<&JsonValue> {
        self.inner.get(key)
    }

    /// Gets the inner JSON value.
    #[must_use]
    pub fn as_json(&self) -> &JsonValue {
        &self.inner
    }
}

/// Decodes the payload of a compact JWT without verifying its signature.
///
/// A token is well-formed when it has three dot-separated segments, the
/// middle one decodes to a JSON object, and that object carries a numeric
/// `exp` claim.
///
/// # Errors
///
/// Returns `Error::Token` if any of those conditions does not hold.
pub fn decode_unverified(token_str: &str) -> Result<UnverifiedClaims, Error> {
    let payload_b64 = extract_payload_segment(token_str)?;

    let payload = SEGMENT_ENGINE
        .decode(payload_b64)
        .map_err(|_| Error::Token("invalid payload encoding".into()))?;

    let json_value: JsonValue = serde_json::from_slice(&payload)
        .map_err(|_| Error::Token("invalid payload".into()))?;
    if !json_value.is_object() {
        return Err(Error::Token("invalid payload".into()));
    }

    let expires_at = json_value
        .get("exp")
        .and_then(numeric_date)
        .ok_or_else(|| Error::Token("missing claim: exp".into()))?;

    Ok(UnverifiedClaims {
        expires_at,
        inner: json_value,
    })
}

fn extract_payload_segment(token_str: &str) -> Result<&str, Error> {
    let parts: Vec<&str> = token_str.split('.').collect();
    if parts.len() != 3 || parts[1].is_empty() {
        return Err(Error::Token("invalid token format".into()));
    }
    Ok(parts[1])
}

// NumericDate may legally carry a fractional part.
fn numeric_date(value: &JsonValue) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_f64().map(|f| f.floor() as i64))
}
