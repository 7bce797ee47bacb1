//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use crate::domain::entity::session::{Session, SessionId};
use crate::domain::entity::user::User;
use crate::domain::value_object::email::Email;
use crate::domain::value_object::user_id::UserId;
use crate::domain::value_object::user_name::UserName;
use crate::error::AuthResult;

/// User repository trait
///
/// Soft-deleted users are invisible to every lookup here; only rows
/// with `deleted_at IS NULL` participate.
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Persist a new user
    async fn create(&self, user: &User) -> AuthResult<()>;

    /// Find user by ID
    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>>;

    /// Find user by email
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    /// Find user by email and verify the password against the stored
    /// hash in one operation
    ///
    /// Returns `None` both when no user has the email and when the
    /// password does not match; callers cannot tell the two apart.
    async fn find_by_email_password(
        &self,
        email: &Email,
        password: &str,
    ) -> AuthResult<Option<User>>;

    /// Check if email is already registered
    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool>;

    /// Check if username is already taken
    async fn exists_by_username(&self, username: &UserName) -> AuthResult<bool>;
}

/// Session repository trait
#[trait_variant::make(SessionRepository: Send)]
pub trait LocalSessionRepository {
    /// Create a new session
    async fn create(&self, session: &Session) -> AuthResult<()>;

    /// Find session by ID
    async fn find_by_id(&self, session_id: &SessionId) -> AuthResult<Option<Session>>;

    /// Update session (e.g., last activity)
    async fn update(&self, session: &Session) -> AuthResult<()>;

    /// Delete a session
    async fn delete(&self, session_id: &SessionId) -> AuthResult<()>;

    /// Clean up expired sessions, returning how many were removed
    async fn cleanup_expired(&self) -> AuthResult<u64>;
}
