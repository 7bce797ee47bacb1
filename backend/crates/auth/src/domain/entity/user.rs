//! User Entity

use crate::domain::value_object::email::Email;
use crate::domain::value_object::user_id::UserId;
use crate::domain::value_object::user_name::UserName;
use crate::domain::value_object::user_password::UserPassword;
use chrono::{DateTime, Utc};

/// A registered account
///
/// Identity and timestamps are injected by the caller so that
/// construction stays deterministic under test.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub username: UserName,
    pub email: Email,
    pub password: UserPassword,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl User {
    /// Assemble a brand-new user from already-validated parts
    pub fn new(
        id: UserId,
        username: UserName,
        email: Email,
        password: UserPassword,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            username,
            email,
            password,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Check a candidate clear-text password against the stored hash
    pub fn verify_password(&self, candidate: &str) -> bool {
        self.password.verify(candidate)
    }
}
