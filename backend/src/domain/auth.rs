//! Authentication primitives: login credentials and stored credential checks.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use argon2::Argon2;
use argon2::password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use tracing::warn;
use zeroize::Zeroizing;

use super::{Role, UserId, Username};

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Username was missing.
    EmptyUsername,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Stored values starting with this are parsed as Argon2 PHC strings.
const PHC_PREFIX: &str = "$argon2";

/// Validated login credentials used by authentication services.
///
/// ## Invariants
/// - `username` and `password` must be non-empty and are kept exactly as
///   submitted; lookups never normalise whitespace or case.
///
/// # Examples
/// ```
/// use parkmap::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("ana", "pass1").unwrap();
/// assert_eq!(creds.username(), "ana");
/// assert_eq!(creds.password(), "pass1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        if username.is_empty() {
            return Err(LoginValidationError::EmptyUsername);
        }

        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }

        Ok(Self {
            username: username.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username string suitable for user lookups.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Outcome of checking a submitted password against a stored credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordCheck {
    /// Matched an Argon2 hash.
    Verified,
    /// Matched a legacy value stored as submitted; should be migrated.
    VerifiedLegacy,
    /// Did not match.
    Mismatch,
}

impl PasswordCheck {
    /// Whether the password matched in either form.
    pub fn is_match(self) -> bool {
        !matches!(self, Self::Mismatch)
    }
}

/// Credential column value as stored in the user table.
///
/// Two encodings are accepted:
/// - an Argon2 PHC string such as `$argon2id$v=19$m=19456,t=2,p=1$<salt>$<hash>`;
/// - anything else, treated as a legacy value compared as submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredPassword(Zeroizing<String>);

impl StoredPassword {
    /// Wrap a raw column value.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(Zeroizing::new(raw.into()))
    }

    /// Hash a new password with Argon2id and the default parameters.
    ///
    /// `salt` must be between 8 and 48 bytes.
    ///
    /// # Examples
    /// ```
    /// use parkmap::domain::{PasswordCheck, StoredPassword};
    ///
    /// let stored = StoredPassword::hashed(b"pepper-salt", "pass1").unwrap();
    /// assert_eq!(stored.verify("pass1"), PasswordCheck::Verified);
    /// assert_eq!(stored.verify("pass2"), PasswordCheck::Mismatch);
    /// ```
    pub fn hashed(salt: &[u8], password: &str) -> Result<Self, password_hash::Error> {
        let salt = SaltString::encode_b64(salt)?;
        let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
        Ok(Self::new(hash.to_string()))
    }

    /// Check a submitted password.
    pub fn verify(&self, password: &str) -> PasswordCheck {
        let raw = self.0.as_str();
        if raw.starts_with(PHC_PREFIX) {
            let Ok(hash) = PasswordHash::new(raw) else {
                warn!("stored credential is not a valid PHC string");
                return PasswordCheck::Mismatch;
            };
            return match Argon2::default().verify_password(password.as_bytes(), &hash) {
                Ok(()) => PasswordCheck::Verified,
                Err(_) => PasswordCheck::Mismatch,
            };
        }
        if bytes_equal(raw.as_bytes(), password.as_bytes()) {
            PasswordCheck::VerifiedLegacy
        } else {
            PasswordCheck::Mismatch
        }
    }
}

/// Compare without short-circuiting on the first differing byte.
fn bytes_equal(left: &[u8], right: &[u8]) -> bool {
    let mut diff = left.len() ^ right.len();
    for (index, byte) in left.iter().enumerate() {
        let other = right.get(index).copied().unwrap_or(0);
        diff |= usize::from(byte ^ other);
    }
    diff == 0
}

/// User row needed to authenticate a login attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredentials {
    pub id: UserId,
    pub username: Username,
    pub password: StoredPassword,
    pub role: Role,
}
