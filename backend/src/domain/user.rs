//! User identity model.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Validation errors returned by the user newtypes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyUsername,
    UsernameTooShort { min: usize },
    UsernameTooLong { max: usize },
    UsernameInvalidCharacters,
    EmptyPasswordHash,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::UsernameTooShort { min } => {
                write!(f, "username must be at least {min} characters")
            }
            Self::UsernameTooLong { max } => {
                write!(f, "username must be at most {max} characters")
            }
            Self::UsernameInvalidCharacters => write!(
                f,
                "username may only contain letters, numbers, dots, hyphens, or underscores",
            ),
            Self::EmptyPasswordHash => write!(f, "password hash must not be empty"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for UserId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Minimum allowed length for a username.
pub const USERNAME_MIN: usize = 3;
/// Maximum allowed length for a username.
pub const USERNAME_MAX: usize = 64;

/// Unique login name chosen at registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Validate and construct a [`Username`].
    pub fn new(username: impl Into<String>) -> Result<Self, UserValidationError> {
        Self::from_owned(username.into())
    }

    fn from_owned(username: String) -> Result<Self, UserValidationError> {
        if username.trim().is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }
        let length = username.chars().count();
        if length < USERNAME_MIN {
            return Err(UserValidationError::UsernameTooShort { min: USERNAME_MIN });
        }
        if length > USERNAME_MAX {
            return Err(UserValidationError::UsernameTooLong { max: USERNAME_MAX });
        }
        let valid = username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'));
        if !valid {
            return Err(UserValidationError::UsernameInvalidCharacters);
        }
        Ok(Self(username))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl TryFrom<String> for Username {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Opaque password hash produced by the hashing capability.
///
/// The domain never inspects the encoded form; only the hasher port can
/// verify candidates against it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap an encoded hash string.
    pub fn new(encoded: impl Into<String>) -> Result<Self, UserValidationError> {
        let encoded = encoded.into();
        if encoded.is_empty() {
            return Err(UserValidationError::EmptyPasswordHash);
        }
        Ok(Self(encoded))
    }

    /// Access the encoded hash.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// A registered user account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub username: Username,
    pub password_hash: PasswordHash,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", UserValidationError::EmptyUsername)]
    #[case("ab", UserValidationError::UsernameTooShort { min: USERNAME_MIN })]
    #[case("has spaces", UserValidationError::UsernameInvalidCharacters)]
    #[case("shark!", UserValidationError::UsernameInvalidCharacters)]
    fn username_rejects_invalid_input(#[case] raw: &str, #[case] expected: UserValidationError) {
        assert_eq!(Username::new(raw), Err(expected));
    }

    #[rstest]
    #[case("ada")]
    #[case("ada.lovelace")]
    #[case("shark_42")]
    #[case("a-b-c")]
    fn username_accepts_reasonable_input(#[case] raw: &str) {
        let username = Username::new(raw).expect("valid username");
        assert_eq!(username.as_ref(), raw);
    }

    #[test]
    fn username_rejects_overlong_input() {
        let raw = "x".repeat(USERNAME_MAX + 1);
        assert_eq!(
            Username::new(raw),
            Err(UserValidationError::UsernameTooLong { max: USERNAME_MAX })
        );
    }

    #[test]
    fn password_hash_rejects_empty_input() {
        assert_eq!(
            PasswordHash::new(""),
            Err(UserValidationError::EmptyPasswordHash)
        );
    }
}
