//! Identity Middleware
//!
//! Resolves the bearer token into a request-scoped [`Principal`] before
//! protected handlers run. Handlers downstream read the principal from
//! request extensions and never see the token.

use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, Request, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::current_user::GetCurrentUserUseCase;
use crate::domain::authenticator::Authenticator;
use crate::domain::entity::principal::Principal;
use crate::error::AuthError;

/// Middleware state
pub struct AuthMiddlewareState<A>
where
    A: Authenticator + Send + Sync + 'static,
{
    pub authenticator: Arc<A>,
    pub config: Arc<AuthConfig>,
}

impl<A> Clone for AuthMiddlewareState<A>
where
    A: Authenticator + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            authenticator: self.authenticator.clone(),
            config: self.config.clone(),
        }
    }
}

/// Pull the bearer token off a request
///
/// `Authorization: Bearer <token>` wins; the session cookie is the
/// fallback so browser clients work without custom headers.
pub fn extract_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    bearer.or_else(|| platform::cookie::extract_cookie(headers, cookie_name))
}

/// Middleware that requires a resolved identity
///
/// Rejects with 401 when no token is presented or the token does not
/// verify, and 404 when the token is sound but its user is gone. On
/// success the [`Principal`] is inserted into request extensions.
pub async fn require_auth<A>(
    State(state): State<AuthMiddlewareState<A>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, Response>
where
    A: Authenticator + Send + Sync + 'static,
{
    let token = extract_token(req.headers(), &state.config.session_cookie_name)
        .ok_or_else(|| AuthError::InvalidToken.into_response())?;

    let use_case = GetCurrentUserUseCase::new(state.authenticator.clone());

    let principal: Principal = use_case
        .execute(&token)
        .await
        .map_err(|e| e.into_response())?;

    req.extensions_mut().insert(principal);

    Ok(next.run(req).await)
}

/// Middleware that resolves identity without requiring it
///
/// Inserts `Option<Principal>` into request extensions: `Some` when a
/// presented token resolves, `None` otherwise. Never rejects.
pub async fn resolve_identity<A>(
    State(state): State<AuthMiddlewareState<A>>,
    mut req: Request<Body>,
    next: Next,
) -> Response
where
    A: Authenticator + Send + Sync + 'static,
{
    let token = extract_token(req.headers(), &state.config.session_cookie_name);

    let principal: Option<Principal> = match token {
        Some(token) => {
            let use_case = GetCurrentUserUseCase::new(state.authenticator.clone());
            use_case.execute(&token).await.ok()
        }
        None => None,
    };

    req.extensions_mut().insert(principal);

    next.run(req).await
}
