use std::sync::Arc;
use std::sync::OnceLock;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use crate::clock::Clock;
use crate::clock::SystemClock;
use crate::jwt::IdentityClaims;
use crate::jwt::JwtError;
use crate::jwt::TokenCodec;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Authentication coordinator combining password verification and token issuance.
///
/// Owns the token codec, the configured token lifetime and the clock that
/// supplies "now" for both issuing and validating tokens.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    token_codec: TokenCodec,
    token_ttl: Duration,
    clock: Arc<dyn Clock>,
    decoy_hash: OnceLock<String>,
}

const DECOY_PASSWORD: &str = "decoy-password-for-unknown-accounts";

/// Result of successful authentication.
#[derive(Debug, Clone)]
pub struct AuthenticationResult {
    /// Signed access token
    pub access_token: String,

    /// Instant after which the token is rejected
    pub expires_at: DateTime<Utc>,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

impl Authenticator {
    /// Create a new authenticator backed by the system clock.
    ///
    /// # Arguments
    /// * `token_codec` - Codec holding the signing key
    /// * `token_ttl` - Lifetime of issued access tokens
    pub fn new(token_codec: TokenCodec, token_ttl: Duration) -> Self {
        Self {
            password_hasher: PasswordHasher::new(),
            token_codec,
            token_ttl,
            clock: Arc::new(SystemClock),
            decoy_hash: OnceLock::new(),
        }
    }

    /// Replace the clock used for issuing and validating tokens.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify credentials and issue an access token for `subject`.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash
    /// * `subject` - Identity the token is issued for
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match (or the hash is unusable)
    /// * `JwtError` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        subject: &str,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        if !self.password_hasher.verify(password, stored_hash) {
            return Err(AuthenticationError::InvalidCredentials);
        }

        Ok(self.issue_token(subject)?)
    }

    /// Reject a login for a subject that has no stored credentials.
    ///
    /// Runs one password verification against a decoy hash so the rejection
    /// costs the same as a wrong password for a known subject.
    pub fn reject_unknown_subject(&self, password: &str) -> AuthenticationError {
        let decoy = self.decoy_hash.get_or_init(|| {
            self.password_hasher
                .hash(DECOY_PASSWORD)
                .unwrap_or_default()
        });
        let _ = self.password_hasher.verify(password, decoy);

        AuthenticationError::InvalidCredentials
    }

    /// Issue an access token without password verification.
    ///
    /// Useful when authentication has already been verified by other means.
    pub fn issue_token(&self, subject: &str) -> Result<AuthenticationResult, JwtError> {
        let claims = IdentityClaims::issue(subject, self.clock.now(), self.token_ttl)?;
        let access_token = self.token_codec.encode(&claims)?;

        Ok(AuthenticationResult {
            access_token,
            expires_at: claims.expires_at(),
        })
    }

    /// Validate a token against the current instant and return its subject.
    ///
    /// # Errors
    /// * `JwtError` - Token is malformed, forged or expired
    pub fn validate_token(&self, token: &str) -> Result<String, JwtError> {
        self.token_codec.verify(token, self.clock.now())
    }
}
