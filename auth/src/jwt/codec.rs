use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::IdentityClaims;
use super::errors::JwtError;

/// Issues and verifies signed, expiring bearer tokens.
///
/// Holds one symmetric HS256 key used for both signing and verification.
/// Verification is a pure function of the token, the supplied instant and
/// the key; nothing is read from ambient state.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
}

impl TokenCodec {
    /// Create a codec from raw key bytes.
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Store secrets in environment variables or secure vaults, never in code
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
        }
    }

    /// Create a codec from a base64-encoded secret, as found in configuration.
    ///
    /// # Errors
    /// * `InvalidKey` - Secret is empty or not valid base64
    pub fn from_base64_secret(secret: &str) -> Result<Self, JwtError> {
        if secret.trim().is_empty() {
            return Err(JwtError::InvalidKey("secret is empty".to_string()));
        }

        let encoding_key = EncodingKey::from_base64_secret(secret)
            .map_err(|e| JwtError::InvalidKey(e.to_string()))?;
        let decoding_key = DecodingKey::from_base64_secret(secret)
            .map_err(|e| JwtError::InvalidKey(e.to_string()))?;

        Ok(Self {
            encoding_key,
            decoding_key,
            algorithm: Algorithm::HS256,
        })
    }

    /// Issue a token for `subject`, valid from `issued_at` for `ttl`.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed, or `ttl` overflows the clock range
    pub fn issue(
        &self,
        subject: &str,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<String, JwtError> {
        let claims = IdentityClaims::issue(subject, issued_at, ttl)?;
        self.encode(&claims)
    }

    /// Sign arbitrary identity claims.
    pub fn encode(&self, claims: &IdentityClaims) -> Result<String, JwtError> {
        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Verify a token at instant `now` and return its subject.
    ///
    /// # Errors
    /// * `Malformed` - Token is not a structurally valid JWT with identity claims
    /// * `InvalidSignature` - Signature does not match under this key
    /// * `Expired` - `now` is past the token's expiration
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<String, JwtError> {
        self.decode(token, now).map(|claims| claims.sub)
    }

    /// Verify a token at instant `now` and return all of its claims.
    pub fn decode(&self, token: &str, now: DateTime<Utc>) -> Result<IdentityClaims, JwtError> {
        let mut validation = Validation::new(self.algorithm);
        // Expiry is checked against the caller's instant below, not the system clock
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let token_data =
            decode::<IdentityClaims>(token, &self.decoding_key, &validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                    ErrorKind::ExpiredSignature => JwtError::Expired,
                    _ => JwtError::Malformed(e.to_string()),
                }
            })?;

        let claims = token_data.claims;
        if claims.is_expired(now) {
            return Err(JwtError::Expired);
        }

        Ok(claims)
    }
}
