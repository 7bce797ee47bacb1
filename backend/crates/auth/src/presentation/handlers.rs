//! HTTP Handlers

use axum::Json;
use axum::extract::{Extension, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use std::sync::Arc;

use platform::clock::Clock;
use platform::cookie::CookieConfig;
use platform::idgen::IdGenerator;
use platform::password::PasswordEncryptor;

use crate::application::config::{AuthConfig, AuthStrategy};
use crate::application::create_user::{CreateUserInput, CreateUserUseCase};
use crate::application::login::{LoginInput, LoginUseCase};
use crate::application::logout::LogoutUseCase;
use crate::domain::authenticator::Authenticator;
use crate::domain::entity::principal::Principal;
use crate::domain::repository::UserRepository;
use crate::error::AuthResult;
use crate::presentation::dto::{
    CreateUserRequest, LoginRequest, LoginResponse, SessionStatusResponse, UserResponse,
};
use crate::presentation::middleware::extract_token;

/// Shared state for auth handlers
pub struct AuthAppState<U, A>
where
    U: UserRepository + Send + Sync + 'static,
    A: Authenticator + Send + Sync + 'static,
{
    pub user_repo: Arc<U>,
    pub authenticator: Arc<A>,
    pub config: Arc<AuthConfig>,
    pub encryptor: Arc<PasswordEncryptor>,
    pub id_generator: Arc<dyn IdGenerator>,
    pub clock: Arc<dyn Clock>,
}

impl<U, A> Clone for AuthAppState<U, A>
where
    U: UserRepository + Send + Sync + 'static,
    A: Authenticator + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            user_repo: self.user_repo.clone(),
            authenticator: self.authenticator.clone(),
            config: self.config.clone(),
            encryptor: self.encryptor.clone(),
            id_generator: self.id_generator.clone(),
            clock: self.clock.clone(),
        }
    }
}

// ============================================================================
// Create User
// ============================================================================

/// POST /api/users
pub async fn create_user<U, A>(
    State(state): State<AuthAppState<U, A>>,
    Json(req): Json<CreateUserRequest>,
) -> AuthResult<impl IntoResponse>
where
    U: UserRepository + Send + Sync + 'static,
    A: Authenticator + Send + Sync + 'static,
{
    let use_case = CreateUserUseCase::new(
        state.user_repo.clone(),
        state.encryptor.clone(),
        state.id_generator.clone(),
        state.clock.clone(),
    );

    let input = CreateUserInput {
        username: req.username,
        email: req.email,
        password: req.password,
    };

    let output = use_case.execute(input).await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(&output.user))))
}

// ============================================================================
// Login
// ============================================================================

/// POST /api/auth/login
pub async fn login<U, A>(
    State(state): State<AuthAppState<U, A>>,
    Json(req): Json<LoginRequest>,
) -> AuthResult<impl IntoResponse>
where
    U: UserRepository + Send + Sync + 'static,
    A: Authenticator + Send + Sync + 'static,
{
    let use_case = LoginUseCase::new(state.authenticator.clone());

    let input = LoginInput {
        email: req.email,
        password: req.password,
    };

    let output = use_case.execute(input).await?;

    let body = Json(LoginResponse {
        user: UserResponse::from(&output.user),
        token: output.token.clone(),
    });

    // Session strategy also hands the token to browsers as a cookie;
    // JWT clients carry it in the Authorization header themselves.
    if state.config.strategy == AuthStrategy::Session {
        let cookie = cookie_config(&state.config).build_set_cookie(&output.token);
        Ok((StatusCode::OK, [(header::SET_COOKIE, cookie)], body).into_response())
    } else {
        Ok((StatusCode::OK, body).into_response())
    }
}

// ============================================================================
// Logout
// ============================================================================

/// POST /api/auth/logout
pub async fn logout<U, A>(
    State(state): State<AuthAppState<U, A>>,
    headers: HeaderMap,
) -> AuthResult<impl IntoResponse>
where
    U: UserRepository + Send + Sync + 'static,
    A: Authenticator + Send + Sync + 'static,
{
    if let Some(token) = extract_token(&headers, &state.config.session_cookie_name) {
        let use_case = LogoutUseCase::new(state.authenticator.clone());
        use_case.execute(&token).await?;
    }

    let cookie = cookie_config(&state.config).build_delete_cookie();

    Ok((StatusCode::NO_CONTENT, [(header::SET_COOKIE, cookie)]))
}

// ============================================================================
// Current User
// ============================================================================

/// GET /api/auth/me
///
/// The identity middleware has already resolved the token; the handler
/// only shapes the response.
pub async fn me(Extension(principal): Extension<Principal>) -> Json<UserResponse> {
    Json(UserResponse::from(&principal))
}

// ============================================================================
// Session Status
// ============================================================================

/// GET /api/auth/session
///
/// Mounted behind the optional identity middleware: anonymous callers
/// get `authenticated: false`, not a 401.
pub async fn session_status(
    Extension(principal): Extension<Option<Principal>>,
) -> Json<SessionStatusResponse> {
    Json(SessionStatusResponse {
        authenticated: principal.is_some(),
        user: principal.as_ref().map(UserResponse::from),
    })
}

// ============================================================================
// Health
// ============================================================================

/// GET /api/health
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================================
// Helper Functions
// ============================================================================

fn cookie_config(config: &AuthConfig) -> CookieConfig {
    CookieConfig {
        name: config.session_cookie_name.clone(),
        secure: config.cookie_secure,
        http_only: true,
        same_site: config.cookie_same_site,
        path: "/".to_string(),
        max_age_secs: Some(config.token_ttl_secs()),
    }
}
