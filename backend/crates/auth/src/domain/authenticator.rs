//! Authenticator Trait
//!
//! One interface over the two login strategies (server-side sessions,
//! stateless JWTs). Exactly one implementation is active per process;
//! callers never know which.

use crate::domain::entity::user::User;
use crate::error::AuthResult;

/// Outcome of a successful credential check: the account plus the
/// bearer token the client presents from now on.
#[derive(Debug, Clone)]
pub struct IssuedAuth {
    pub user: User,
    pub token: String,
}

/// Login strategy interface
#[trait_variant::make(Authenticator: Send)]
pub trait LocalAuthenticator {
    /// Verify credentials and, on success, issue a token
    ///
    /// Returns `Ok(None)` for any credential failure: unknown email,
    /// wrong password, or an email that does not even parse. All three
    /// look identical to the caller.
    async fn authenticate(&self, email: &str, password: &str) -> AuthResult<Option<IssuedAuth>>;

    /// Resolve a bearer token back to its user
    ///
    /// Fails with `InvalidToken` when the token is malformed, forged,
    /// expired, or (for sessions) revoked; with `UserNotFound` when the
    /// token is sound but its user no longer exists.
    async fn authenticated_user(&self, token: &str) -> AuthResult<User>;

    /// Invalidate a token
    ///
    /// Sessions are deleted server-side. Stateless tokens cannot be
    /// recalled, so the JWT strategy treats this as a no-op and the
    /// token simply runs out its expiry.
    async fn revoke(&self, token: &str) -> AuthResult<()>;
}
