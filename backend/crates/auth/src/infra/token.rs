//! JWT Strategy
//!
//! Stateless login: the token itself carries the claims, signed with
//! HMAC-SHA256. Nothing is stored server-side, which also means a
//! revoked token cannot be recalled before its expiry.

use std::sync::Arc;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use platform::clock::Clock;

use crate::application::config::AuthConfig;
use crate::domain::authenticator::{Authenticator, IssuedAuth};
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::email::Email;
use crate::domain::value_object::user_id::UserId;
use crate::error::{AuthError, AuthResult};

/// JWT claims
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// Subject (user id)
    sub: String,
    /// Issued at (unix seconds)
    iat: i64,
    /// Expiration (unix seconds)
    exp: i64,
}

/// JWT-backed authenticator
pub struct JwtAuthenticator<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<AuthConfig>,
    clock: Arc<dyn Clock>,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl<U> JwtAuthenticator<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AuthConfig>, clock: Arc<dyn Clock>) -> Self {
        let encoding_key = EncodingKey::from_secret(&config.token_secret);
        let decoding_key = DecodingKey::from_secret(&config.token_secret);
        Self {
            user_repo,
            config,
            clock,
            encoding_key,
            decoding_key,
        }
    }

    fn issue_token(&self, user_id: &UserId) -> AuthResult<String> {
        let iat = self.clock.now().timestamp();
        let claims = Claims {
            sub: user_id.to_string(),
            iat,
            exp: iat + self.config.token_ttl_secs(),
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("Failed to sign token: {e}")))
    }

    fn decode_claims(&self, token: &str) -> AuthResult<Claims> {
        // Expiry is checked against the injected clock below, not the
        // library's view of system time.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;

        let claims = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|_| AuthError::InvalidToken)?;

        if claims.exp <= self.clock.now().timestamp() {
            return Err(AuthError::InvalidToken);
        }

        Ok(claims)
    }
}

impl<U> Authenticator for JwtAuthenticator<U>
where
    U: UserRepository + Sync,
{
    async fn authenticate(&self, email: &str, password: &str) -> AuthResult<Option<IssuedAuth>> {
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

        let token = self.issue_token(&user.id)?;

        tracing::debug!(user_id = %user.id, "JWT issued");

        Ok(Some(IssuedAuth { user, token }))
    }

    async fn authenticated_user(&self, token: &str) -> AuthResult<User> {
        let claims = self.decode_claims(token)?;

        let user_id = claims
            .sub
            .parse::<Uuid>()
            .map(UserId::from_uuid)
            .map_err(|_| AuthError::InvalidToken)?;

        self.user_repo
            .find_by_id(&user_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    async fn revoke(&self, _token: &str) -> AuthResult<()> {
        // Stateless tokens cannot be recalled; the token simply expires.
        Ok(())
    }
}
