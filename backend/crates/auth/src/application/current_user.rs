//! Get Current User Use Case
//!
//! Resolves a bearer token back to the account it belongs to.

use std::sync::Arc;

use crate::domain::authenticator::Authenticator;
use crate::domain::entity::principal::Principal;
use crate::error::AuthResult;

/// Get current user use case
pub struct GetCurrentUserUseCase<A>
where
    A: Authenticator,
{
    authenticator: Arc<A>,
}

impl<A> GetCurrentUserUseCase<A>
where
    A: Authenticator,
{
    pub fn new(authenticator: Arc<A>) -> Self {
        Self { authenticator }
    }

    /// Resolve the token, keeping the two failure reasons distinct:
    /// `InvalidToken` for a token that does not verify, `UserNotFound`
    /// for a valid token whose account is gone.
    pub async fn execute(&self, token: &str) -> AuthResult<Principal> {
        let user = self.authenticator.authenticated_user(token).await?;
        Ok(Principal::from(&user))
    }
}
