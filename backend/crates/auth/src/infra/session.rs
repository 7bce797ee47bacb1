//! Session Strategy
//!
//! Login state lives server-side in the sessions table. The client
//! holds an opaque token of the form `<session_id>.<signature>` where
//! the signature is an HMAC-SHA256 over the session id, so a forged or
//! tampered token is rejected before the database is ever consulted.

use std::sync::Arc;

use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use uuid::Uuid;

use platform::clock::Clock;
use platform::idgen::IdGenerator;

use crate::application::config::AuthConfig;
use crate::domain::authenticator::{Authenticator, IssuedAuth};
use crate::domain::entity::session::{Session, SessionId};
use crate::domain::entity::user::User;
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::domain::value_object::email::Email;
use crate::error::{AuthError, AuthResult};

/// Session-backed authenticator
pub struct SessionAuthenticator<U, S>
where
    U: UserRepository,
    S: SessionRepository,
{
    user_repo: Arc<U>,
    session_repo: Arc<S>,
    config: Arc<AuthConfig>,
    id_generator: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
}

impl<U, S> SessionAuthenticator<U, S>
where
    U: UserRepository,
    S: SessionRepository,
{
    pub fn new(
        user_repo: Arc<U>,
        session_repo: Arc<S>,
        config: Arc<AuthConfig>,
        id_generator: Arc<dyn IdGenerator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            user_repo,
            session_repo,
            config,
            id_generator,
            clock,
        }
    }
}

impl<U, S> Authenticator for SessionAuthenticator<U, S>
where
    U: UserRepository + Sync,
    S: SessionRepository + Sync,
{
    async fn authenticate(&self, email: &str, password: &str) -> AuthResult<Option<IssuedAuth>> {
        // An email that does not even parse is just a failed login.
        let email = match Email::new(email) {
            Ok(email) => email,
            Err(_) => return Ok(None),
        };

        let Some(user) = self
            .user_repo
            .find_by_email_password(&email, password)
            .await?
        else {
            return Ok(None);
        };

        let session = Session::new(
            SessionId::from_uuid(self.id_generator.generate()),
            user.id,
            self.clock.now(),
            self.config.token_ttl_secs(),
        );

        self.session_repo.create(&session).await?;

        let token = generate_session_token(session.id.as_uuid(), &self.config.token_secret);

        tracing::debug!(
            user_id = %user.id,
            session_id = %session.id,
            "Session created"
        );

        Ok(Some(IssuedAuth { user, token }))
    }

    async fn authenticated_user(&self, token: &str) -> AuthResult<User> {
        let session_id = parse_session_token(token, &self.config.token_secret)
            .map(SessionId::from_uuid)
            .ok_or(AuthError::InvalidToken)?;

        let session = self
            .session_repo
            .find_by_id(&session_id)
            .await?
            .ok_or(AuthError::InvalidToken)?;

        let now = self.clock.now();
        if session.is_expired(now) {
            self.session_repo.delete(&session_id).await?;
            return Err(AuthError::InvalidToken);
        }

        let mut session = session;
        session.touch(now);
        self.session_repo.update(&session).await?;

        self.user_repo
            .find_by_id(&session.user_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    async fn revoke(&self, token: &str) -> AuthResult<()> {
        // Idempotent: an unparseable or already-gone token is not an
        // error on the way out.
        let Some(session_id) = parse_session_token(token, &self.config.token_secret) else {
            return Ok(());
        };

        self.session_repo
            .delete(&SessionId::from_uuid(session_id))
            .await?;

        Ok(())
    }
}

/// Build `<session_id>.<base64url(HMAC-SHA256(session_id))>`
fn generate_session_token(session_id: &Uuid, secret: &[u8; 32]) -> String {
    let session_id = session_id.to_string();

    let mut mac =
        Hmac::<Sha256>::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(session_id.as_bytes());
    let signature = mac.finalize().into_bytes();

    format!(
        "{}.{}",
        session_id,
        base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(signature)
    )
}

/// Verify the signature and extract the session id; `None` on any
/// malformation or mismatch.
fn parse_session_token(token: &str, secret: &[u8; 32]) -> Option<Uuid> {
    let (session_id_str, signature_b64) = token.split_once('.')?;

    let mut mac =
        Hmac::<Sha256>::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(session_id_str.as_bytes());

    let signature = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(signature_b64)
        .ok()?;

    mac.verify_slice(&signature).ok()?;

    session_id_str.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_roundtrip() {
        let secret = [7u8; 32];
        let session_id = Uuid::new_v4();

        let token = generate_session_token(&session_id, &secret);
        assert_eq!(parse_session_token(&token, &secret), Some(session_id));
    }

    #[test]
    fn test_token_rejects_wrong_secret() {
        let session_id = Uuid::new_v4();
        let token = generate_session_token(&session_id, &[7u8; 32]);

        assert_eq!(parse_session_token(&token, &[8u8; 32]), None);
    }

    #[test]
    fn test_token_rejects_tampered_id() {
        let secret = [7u8; 32];
        let token = generate_session_token(&Uuid::new_v4(), &secret);

        let signature = token.split_once('.').map(|(_, s)| s.to_string());
        let forged = format!("{}.{}", Uuid::new_v4(), signature.unwrap());

        assert_eq!(parse_session_token(&forged, &secret), None);
    }

    #[test]
    fn test_token_rejects_garbage() {
        let secret = [7u8; 32];
        assert_eq!(parse_session_token("", &secret), None);
        assert_eq!(parse_session_token("no-dot-here", &secret), None);
        assert_eq!(parse_session_token("a.b.c", &secret), None);
    }
}
