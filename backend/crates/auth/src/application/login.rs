//! Login Use Case
//!
//! Verifies credentials through the active authenticator and hands the
//! issued token back to the caller.

use std::sync::Arc;

use crate::domain::authenticator::Authenticator;
use crate::domain::entity::user::User;
use crate::error::{AuthError, AuthResult};

/// Login input
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Login output
pub struct LoginOutput {
    pub user: User,
    pub token: String,
}

/// Login use case
pub struct LoginUseCase<A>
where
    A: Authenticator,
{
    authenticator: Arc<A>,
}

impl<A> LoginUseCase<A>
where
    A: Authenticator,
{
    pub fn new(authenticator: Arc<A>) -> Self {
        Self { authenticator }
    }

    pub async fn execute(&self, input: LoginInput) -> AuthResult<LoginOutput> {
        let issued = self
            .authenticator
            .authenticate(&input.email, &input.password)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        tracing::info!(
            user_id = %issued.user.id,
            "User logged in"
        );

        Ok(LoginOutput {
            user: issued.user,
            token: issued.token,
        })
    }
}
