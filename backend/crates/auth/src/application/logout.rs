//! Logout Use Case

use std::sync::Arc;

use crate::domain::authenticator::Authenticator;
use crate::error::AuthResult;

/// Logout use case
pub struct LogoutUseCase<A>
where
    A: Authenticator,
{
    authenticator: Arc<A>,
}

impl<A> LogoutUseCase<A>
where
    A: Authenticator,
{
    pub fn new(authenticator: Arc<A>) -> Self {
        Self { authenticator }
    }

    /// Revoke the presented token. Idempotent: revoking a token that is
    /// already gone still succeeds.
    pub async fn execute(&self, token: &str) -> AuthResult<()> {
        self.authenticator.revoke(token).await?;

        tracing::info!("User logged out");

        Ok(())
    }
}
