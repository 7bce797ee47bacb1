//! Auth Router

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::domain::authenticator::Authenticator;
use crate::domain::repository::UserRepository;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::{AuthMiddlewareState, require_auth, resolve_identity};

/// Create the auth router for any repository and authenticator pair
///
/// Routes are mounted relative to `/api`:
///   POST /users         registration
///   POST /auth/login    credential check + token issuance
///   POST /auth/logout   token revocation
///   GET  /auth/me       current identity (requires auth)
///   GET  /auth/session  identity status (auth optional)
///   GET  /health        liveness probe
pub fn auth_router<U, A>(state: AuthAppState<U, A>) -> Router
where
    U: UserRepository + Send + Sync + 'static,
    A: Authenticator + Send + Sync + 'static,
{
    let mw_state = AuthMiddlewareState {
        authenticator: state.authenticator.clone(),
        config: state.config.clone(),
    };

    let protected = Router::new()
        .route("/auth/me", get(handlers::me))
        .route_layer(middleware::from_fn_with_state(
            mw_state.clone(),
            require_auth::<A>,
        ));

    let optional = Router::new()
        .route("/auth/session", get(handlers::session_status))
        .route_layer(middleware::from_fn_with_state(
            mw_state,
            resolve_identity::<A>,
        ));

    Router::new()
        .route("/users", post(handlers::create_user::<U, A>))
        .route("/auth/login", post(handlers::login::<U, A>))
        .route("/auth/logout", post(handlers::logout::<U, A>))
        .route("/health", get(handlers::health))
        .merge(protected)
        .merge(optional)
        .with_state(state)
}
