//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors; request-level errors are the
//! auth crate's concern.

mod config;

use std::net::SocketAddr;
use std::sync::Arc;

use auth::domain::repository::SessionRepository;
use auth::handlers::AuthAppState;
use auth::infra::session::SessionAuthenticator;
use auth::infra::token::JwtAuthenticator;
use auth::{AnyAuthenticator, AuthStrategy, PgAuthRepository, auth_router};
use axum::{
    Router, http,
    http::{Method, header},
};
use platform::clock::SystemClock;
use platform::idgen::UuidGenerator;
use platform::password::PasswordEncryptor;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::AppConfig;

type ApiAuthenticator = AnyAuthenticator<PgAuthRepository, PgAuthRepository>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,auth=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;

    // Database connection
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    // Startup cleanup: remove expired sessions
    // Errors here should not prevent server startup
    let repo_for_cleanup = PgAuthRepository::new(pool.clone());
    match repo_for_cleanup.cleanup_expired().await {
        Ok(sessions) => {
            tracing::info!(sessions_deleted = sessions, "Session cleanup completed");
        }
        Err(e) => {
            tracing::warn!(error = %e, "Session cleanup failed, continuing anyway");
        }
    }

    // Wire up the auth module
    let auth_config = Arc::new(config.auth.clone());
    let repo = Arc::new(PgAuthRepository::new(pool.clone()));
    let encryptor = Arc::new(PasswordEncryptor::new(auth_config.hash_cost)?);
    let id_generator = Arc::new(UuidGenerator);
    let clock = Arc::new(SystemClock);

    let authenticator: Arc<ApiAuthenticator> = Arc::new(match auth_config.strategy {
        AuthStrategy::Session => AnyAuthenticator::Session(SessionAuthenticator::new(
            repo.clone(),
            repo.clone(),
            auth_config.clone(),
            id_generator.clone(),
            clock.clone(),
        )),
        AuthStrategy::Jwt => AnyAuthenticator::Jwt(JwtAuthenticator::new(
            repo.clone(),
            auth_config.clone(),
            clock.clone(),
        )),
    });

    tracing::info!(strategy = ?auth_config.strategy, "Auth strategy selected");

    let state = AuthAppState {
        user_repo: repo,
        authenticator,
        config: auth_config,
        encryptor,
        id_generator,
        clock,
    };

    // CORS configuration
    let allowed_origins: Vec<http::HeaderValue> = config
        .frontend_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    // Build router
    let app = Router::new()
        .nest("/api", auth_router(state))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
