//! Server Configuration
//!
//! Everything is read and validated once at startup; the rest of the
//! process works from this struct and never touches the environment.

use std::env;
use std::time::Duration;

use anyhow::{Context, bail};
use auth::config::{AuthConfig, AuthStrategy};
use base64::Engine;
use base64::engine::general_purpose;

/// Top-level server configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub port: u16,
    pub frontend_origins: Vec<String>,
    pub auth: AuthConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url =
            env::var("DATABASE_URL").context("DATABASE_URL must be set in environment")?;

        let port = match env::var("PORT") {
            Ok(value) => value.parse().context("PORT must be a valid port number")?,
            Err(_) => 3000,
        };

        let frontend_origins = env::var("FRONTEND_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173,http://127.0.0.1:5173".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let strategy = match env::var("AUTH_STRATEGY") {
            Ok(value) => value
                .parse::<AuthStrategy>()
                .map_err(|e| anyhow::anyhow!(e))?,
            Err(_) => AuthStrategy::Jwt,
        };

        let mut auth = if cfg!(debug_assertions) && env::var("TOKEN_SECRET").is_err() {
            AuthConfig::development()
        } else {
            let secret_b64 =
                env::var("TOKEN_SECRET").context("TOKEN_SECRET must be set in production")?;
            let secret_bytes = general_purpose::STANDARD
                .decode(&secret_b64)
                .context("TOKEN_SECRET must be base64")?;
            if secret_bytes.len() != 32 {
                bail!("TOKEN_SECRET must decode to exactly 32 bytes");
            }
            let mut secret = [0u8; 32];
            secret.copy_from_slice(&secret_bytes);
            AuthConfig {
                token_secret: secret,
                ..AuthConfig::default()
            }
        };

        auth.strategy = strategy;

        if let Ok(value) = env::var("TOKEN_TTL_SECS") {
            let secs: u64 = value.parse().context("TOKEN_TTL_SECS must be an integer")?;
            if secs == 0 {
                bail!("TOKEN_TTL_SECS must be positive");
            }
            auth.token_ttl = Duration::from_secs(secs);
        }

        if let Ok(name) = env::var("SESSION_COOKIE_NAME") {
            auth.session_cookie_name = name;
        }

        Ok(Self {
            database_url,
            port,
            frontend_origins,
            auth,
        })
    }
}
