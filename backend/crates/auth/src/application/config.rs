//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::str::FromStr;
use std::time::Duration;

use platform::password::HashCost;

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

/// Which login strategy the process runs with
///
/// Picked once at startup; everything downstream goes through the
/// `Authenticator` trait and never branches on this again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStrategy {
    /// Server-side sessions referenced by a signed opaque token
    Session,
    /// Stateless signed JWTs
    Jwt,
}

impl FromStr for AuthStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "session" => Ok(Self::Session),
            "jwt" | "token" => Ok(Self::Jwt),
            other => Err(format!("unknown auth strategy: {other}")),
        }
    }
}

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Active login strategy
    pub strategy: AuthStrategy,
    /// Secret key for token signing (HMAC-SHA256, 32 bytes)
    pub token_secret: [u8; 32],
    /// How long an issued session or JWT stays valid
    pub token_ttl: Duration,
    /// Session cookie name (session strategy only)
    pub session_cookie_name: String,
    /// Whether to require Secure cookie
    pub cookie_secure: bool,
    /// SameSite policy
    pub cookie_same_site: SameSite,
    /// Argon2id work factor for password hashing
    pub hash_cost: HashCost,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            strategy: AuthStrategy::Jwt,
            token_secret: [0u8; 32],
            token_ttl: Duration::from_secs(24 * 3600),
            session_cookie_name: "auth_session".to_string(),
            cookie_secure: true,
            cookie_same_site: SameSite::Lax,
            hash_cost: HashCost::default(),
        }
    }
}

impl AuthConfig {
    /// Create config with a random token secret (for development)
    pub fn with_random_secret() -> Self {
        use rand::RngCore;
        let mut secret = [0u8; 32];
        rand::rngs::OsRng.fill_bytes(&mut secret);
        Self {
            token_secret: secret,
            ..Default::default()
        }
    }

    /// Create config for development (insecure cookie)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Self::with_random_secret()
        }
    }

    /// Token TTL in whole seconds
    pub fn token_ttl_secs(&self) -> i64 {
        self.token_ttl.as_secs() as i64
    }
}
