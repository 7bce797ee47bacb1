//! Principal
//!
//! The authenticated identity attached to a request after the
//! middleware resolves the bearer token. A projection of [`User`]
//! without the credential.

use crate::domain::entity::user::User;
use crate::domain::value_object::email::Email;
use crate::domain::value_object::user_id::UserId;
use crate::domain::value_object::user_name::UserName;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct Principal {
    pub user_id: UserId,
    pub username: UserName,
    pub email: Email,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for Principal {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            created_at: user.created_at,
        }
    }
}
