//! Infrastructure Layer
//!
//! Postgres repositories and the two authenticator strategies.

pub mod postgres;
pub mod session;
pub mod token;

use crate::domain::authenticator::{Authenticator, IssuedAuth};
use crate::domain::entity::user::User;
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::error::AuthResult;

use self::session::SessionAuthenticator;
use self::token::JwtAuthenticator;

/// The one active authenticator, picked at startup
///
/// Static dispatch over the two strategies so the use cases stay
/// generic over a single `Authenticator` type parameter.
pub enum AnyAuthenticator<U, S>
where
    U: UserRepository,
    S: SessionRepository,
{
    Session(SessionAuthenticator<U, S>),
    Jwt(JwtAuthenticator<U>),
}

impl<U, S> Authenticator for AnyAuthenticator<U, S>
where
    U: UserRepository + Sync,
    S: SessionRepository + Sync,
{
    async fn authenticate(&self, email: &str, password: &str) -> AuthResult<Option<IssuedAuth>> {
        match self {
            Self::Session(inner) => inner.authenticate(email, password).await,
            Self::Jwt(inner) => inner.authenticate(email, password).await,
        }
    }

    async fn authenticated_user(&self, token: &str) -> AuthResult<User> {
        match self {
            Self::Session(inner) => inner.authenticated_user(token).await,
            Self::Jwt(inner) => inner.authenticated_user(token).await,
        }
    }

    async fn revoke(&self, token: &str) -> AuthResult<()> {
        match self {
            Self::Session(inner) => inner.revoke(token).await,
            Self::Jwt(inner) => inner.revoke(token).await,
        }
    }
}
