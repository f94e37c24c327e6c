use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::errors::JwtError;

/// Identity claims carried by an access token.
///
/// `iat` and `exp` are JWT NumericDates (seconds since the Unix epoch), with
/// `exp` rounded up to the next whole second. `exp_ms` keeps the exact
/// expiration in milliseconds and is what expiry checks use. All claims are
/// mandatory; a payload missing any of them does not decode.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IdentityClaims {
    /// Subject (the account email)
    pub sub: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Expiration time (Unix milliseconds)
    pub exp_ms: i64,
}

impl IdentityClaims {
    /// Build claims for `subject` issued at `issued_at`, valid for `ttl`.
    ///
    /// # Errors
    /// * `EncodingFailed` - `issued_at + ttl` is outside the representable range
    pub fn issue(
        subject: impl ToString,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<Self, JwtError> {
        let expires_at = issued_at.checked_add_signed(ttl).ok_or_else(|| {
            JwtError::EncodingFailed(format!(
                "token lifetime of {} ms is out of range",
                ttl.num_milliseconds()
            ))
        })?;
        let exp_ms = expires_at.timestamp_millis();

        Ok(Self {
            sub: subject.to_string(),
            iat: issued_at.timestamp(),
            exp: exp_ms.div_euclid(1000) + i64::from(exp_ms.rem_euclid(1000) != 0),
            exp_ms,
        })
    }

    /// Expiration as a `DateTime`.
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.exp_ms).unwrap_or_default()
    }

    /// Check if token is expired.
    ///
    /// A token is still valid at exactly its expiration instant.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now.timestamp_millis() > self.exp_ms
    }
}
