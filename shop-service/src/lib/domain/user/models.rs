use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::DateTime;
use chrono::NaiveDate;
use chrono::Utc;
use regex::Regex;
use serde::Serialize;
use uuid::Uuid;

use crate::user::errors::EmailError;
use crate::user::errors::PasswordPolicyError;
use crate::user::errors::PhoneNumberError;
use crate::user::errors::ProfileError;
use crate::user::errors::UserIdError;

/// Persisted user record.
///
/// This is storage-shaped data. The per-request authenticated identity is a
/// separate type built by the HTTP layer from a verified token.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub email: EmailAddress,
    pub password_hash: String,
    pub role: Role,
    pub profile: UserProfile,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Personal details collected at registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub real_name: String,
    pub birth_date: NaiveDate,
    pub gender: Gender,
    pub phone_number: PhoneNumber,
    pub zonecode: String,
    pub address: String,
    pub detail_address: String,
}

/// User unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generate a new random user ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a user ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, UserIdError> {
        Uuid::parse_str(s)
            .map(UserId)
            .map_err(|e| UserIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validates email format using RFC 5322 compliant parser. The email doubles
/// as the login name and the token subject.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    const MAX_LENGTH: usize = 100;

    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322 or exceeds 100 characters
    pub fn new(email: String) -> Result<Self, EmailError> {
        let email = email.trim().to_string();
        if email.chars().count() > Self::MAX_LENGTH {
            return Err(EmailError::InvalidFormat(format!(
                "longer than {} characters",
                Self::MAX_LENGTH
            )));
        }

        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Plaintext password that satisfies the password policy.
///
/// Only ever held long enough to be hashed; `Debug` output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    const MIN_LENGTH: usize = 6;

    /// # Errors
    /// * `TooShort` - Fewer than 6 characters
    pub fn new(password: String) -> Result<Self, PasswordPolicyError> {
        let length = password.chars().count();
        if length < Self::MIN_LENGTH {
            return Err(PasswordPolicyError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            });
        }
        Ok(Self(password))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Admin => "ADMIN",
        }
    }
}

impl FromStr for Role {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USER" => Ok(Role::User),
            "ADMIN" => Ok(Role::Admin),
            other => Err(ProfileError::InvalidRole(other.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Gender declared at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    Male,
    Female,
    Unknown,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "MALE",
            Gender::Female => "FEMALE",
            Gender::Unknown => "UNKNOWN",
        }
    }
}

impl FromStr for Gender {
    type Err = ProfileError;

    /// Accepts the storefront's Korean labels as well as the latin names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "남성" => Ok(Gender::Male),
            "여성" => Ok(Gender::Female),
            "선택안함" => Ok(Gender::Unknown),
            other => match other.to_ascii_uppercase().as_str() {
                "MALE" => Ok(Gender::Male),
                "FEMALE" => Ok(Gender::Female),
                "UNKNOWN" => Ok(Gender::Unknown),
                _ => Err(ProfileError::InvalidGender(other.to_string())),
            },
        }
    }
}

static PHONE_NUMBER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^01[016789]-?[0-9]{3,4}-?[0-9]{4}$").expect("phone number pattern is valid")
});

/// Korean mobile phone number, e.g. `010-1234-5678` or `01012345678`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// # Errors
    /// * `InvalidFormat` - Not a `01X-XXX(X)-XXXX` mobile number
    pub fn new(phone_number: String) -> Result<Self, PhoneNumberError> {
        let phone_number = phone_number.trim().to_string();
        if PHONE_NUMBER_REGEX.is_match(&phone_number) {
            Ok(Self(phone_number))
        } else {
            Err(PhoneNumberError::InvalidFormat(phone_number))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Parse a `yyyy-MM-dd` birth date.
pub fn parse_birth_date(raw: &str) -> Result<NaiveDate, ProfileError> {
    let raw = raw.trim();
    let well_formed = raw.len() == 10
        && raw
            .char_indices()
            .all(|(i, c)| if i == 4 || i == 7 { c == '-' } else { c.is_ascii_digit() });

    if !well_formed {
        return Err(ProfileError::InvalidBirthDate(raw.to_string()));
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| ProfileError::InvalidBirthDate(raw.to_string()))
}

/// Require a non-blank text field, returning it trimmed.
pub fn required(field: &'static str, value: String) -> Result<String, ProfileError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ProfileError::Blank(field))
    } else {
        Ok(trimmed.to_string())
    }
}

/// Command to register a new account with validated fields
#[derive(Debug)]
pub struct RegisterUserCommand {
    pub email: EmailAddress,
    pub password: Password,
    pub profile: UserProfile,
}

impl RegisterUserCommand {
    /// # Arguments
    /// * `email` - Validated email address
    /// * `password` - Policy-checked plaintext password (will be hashed by service)
    /// * `profile` - Validated profile fields
    pub fn new(email: EmailAddress, password: Password, profile: UserProfile) -> Self {
        Self {
            email,
            password,
            profile,
        }
    }
}
