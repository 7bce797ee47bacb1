//! User Password Value Object
//!
//! Domain wrappers over `platform::password`. `RawPassword` is the
//! validated clear text a caller submits at registration; `UserPassword`
//! is the Argon2id PHC hash that actually gets stored. The raw password
//! never reaches an entity or the database.

use crate::error::AuthResult;
use platform::password::{ClearTextPassword, HashedPassword, PasswordEncryptor};
use std::fmt;

// ============================================================================
// Raw Password (User Input)
// ============================================================================

/// Raw password from user input
///
/// Memory is automatically zeroized when dropped.
pub struct RawPassword(ClearTextPassword);

impl RawPassword {
    /// Create a new raw password with validation
    ///
    /// Enforces the platform policy: 8 to 128 characters, NFKC
    /// normalized, no control characters.
    pub fn new(raw: String) -> AuthResult<Self> {
        let clear_text = ClearTextPassword::new(raw)?;
        Ok(Self(clear_text))
    }

    pub(crate) fn inner(&self) -> &ClearTextPassword {
        &self.0
    }
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RawPassword").field(&"[REDACTED]").finish()
    }
}

// ============================================================================
// User Password (Hashed, for storage)
// ============================================================================

/// Hashed user password for database storage
///
/// Stores the password in Argon2id PHC string format. Safe to persist
/// and to log in redacted form.
#[derive(Clone, PartialEq, Eq)]
pub struct UserPassword(HashedPassword);

impl UserPassword {
    /// Create from raw password by hashing
    pub fn from_raw(raw: &RawPassword, encryptor: &PasswordEncryptor) -> AuthResult<Self> {
        let hashed = encryptor.hash(raw.inner())?;
        Ok(Self(hashed))
    }

    /// Create from PHC string (from database)
    pub fn from_phc_string(phc_string: impl Into<String>) -> AuthResult<Self> {
        let hashed = HashedPassword::from_phc_string(phc_string)?;
        Ok(Self(hashed))
    }

    /// Get PHC string for database storage
    pub fn as_phc_string(&self) -> &str {
        self.0.as_phc_string()
    }

    /// Verify a candidate password against this hash
    ///
    /// Takes the candidate as submitted at login; a candidate that
    /// would fail registration policy simply verifies as false, since
    /// it cannot equal any policy-conformant stored password.
    pub fn verify(&self, candidate: &str) -> bool {
        self.0.verify(candidate)
    }
}

impl fmt::Debug for UserPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

impl fmt::Display for UserPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[HASHED_PASSWORD]")
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use platform::password::HashCost;

    fn encryptor() -> PasswordEncryptor {
        PasswordEncryptor::new(HashCost {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        })
        .unwrap()
    }

    #[test]
    fn test_raw_password_validation() {
        assert!(RawPassword::new("fakeUserPwd".to_string()).is_ok());
        assert!(RawPassword::new("short".to_string()).is_err());
        assert!(RawPassword::new("".to_string()).is_err());
    }

    #[test]
    fn test_hash_and_verify() {
        let raw = RawPassword::new("fakeUserPwd".to_string()).unwrap();
        let hashed = UserPassword::from_raw(&raw, &encryptor()).unwrap();

        assert!(hashed.verify("fakeUserPwd"));
        assert!(!hashed.verify("wrongPassword"));
        // A candidate below policy length is just a failed match
        assert!(!hashed.verify("x"));
    }

    #[test]
    fn test_phc_string_roundtrip() {
        let raw = RawPassword::new("fakeUserPwd".to_string()).unwrap();
        let hashed = UserPassword::from_raw(&raw, &encryptor()).unwrap();

        let phc = hashed.as_phc_string().to_string();
        let restored = UserPassword::from_phc_string(phc).unwrap();

        assert!(restored.verify("fakeUserPwd"));
    }

    #[test]
    fn test_debug_redaction() {
        let raw = RawPassword::new("secretPassword1".to_string()).unwrap();
        let debug = format!("{:?}", raw);
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains("secret"));

        let hashed = UserPassword::from_raw(&raw, &encryptor()).unwrap();
        let debug = format!("{:?}", hashed);
        assert!(debug.contains("HASH"));
    }
}
