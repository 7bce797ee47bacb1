//! Username Value Object
//!
//! Public handle a user registers under. Unique across non-deleted
//! users; uniqueness itself is enforced by the repository and the
//! database constraint, this type only guards the shape.

use crate::error::{AuthError, AuthResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Minimum length for a username (in characters)
pub const USERNAME_MIN_LENGTH: usize = 5;

/// Maximum length for a username (in characters)
pub const USERNAME_MAX_LENGTH: usize = 30;

/// Username value object
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserName(String);

impl UserName {
    /// Create a new username with validation
    ///
    /// Rules: trimmed, 5 to 30 characters, no whitespace or control
    /// characters inside.
    pub fn new(name: impl Into<String>) -> AuthResult<Self> {
        let name = name.into().trim().to_string();

        let char_count = name.chars().count();

        if char_count < USERNAME_MIN_LENGTH {
            return Err(AuthError::Validation(format!(
                "Username must be at least {} characters",
                USERNAME_MIN_LENGTH
            )));
        }

        if char_count > USERNAME_MAX_LENGTH {
            return Err(AuthError::Validation(format!(
                "Username must be at most {} characters",
                USERNAME_MAX_LENGTH
            )));
        }

        if name.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(AuthError::Validation(
                "Username cannot contain whitespace or control characters".into(),
            ));
        }

        Ok(Self(name))
    }

    /// Create from database value (assumed already validated)
    pub fn from_db(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the username as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_valid() {
        assert!(UserName::new("fakeUser").is_ok());
        assert!(UserName::new("alice").is_ok());
        assert!(UserName::new("  padded  ").is_ok()); // trimmed to "padded"
    }

    #[test]
    fn test_username_too_short() {
        assert!(UserName::new("abcd").is_err());
        assert!(UserName::new("").is_err());
        // 5 is the boundary
        assert!(UserName::new("abcde").is_ok());
    }

    #[test]
    fn test_username_too_long() {
        let long = "a".repeat(USERNAME_MAX_LENGTH + 1);
        assert!(UserName::new(long).is_err());
    }

    #[test]
    fn test_username_no_inner_whitespace() {
        assert!(UserName::new("fake user").is_err());
        assert!(UserName::new("fake\tuser").is_err());
    }
}
