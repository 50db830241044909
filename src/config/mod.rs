//! Application configuration management

use std::env;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// Database URL. For SQLite: use DATABASE_PATH or DATABASE_URL with
    /// a sqlite:// prefix
    pub database_url: String,

    /// JWT signing secret. Required; the server refuses to start without it
    pub jwt_secret: String,

    /// Access token lifetime in seconds (default: 24 hours)
    pub access_token_lifetime: i64,

    /// Bcrypt cost factor for password hashing
    pub bcrypt_cost: u32,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let database_url = env::var("DATABASE_URL")
            .ok()
            .or_else(|| env::var("DATABASE_PATH").ok().map(|p| format!("sqlite://{p}")))
            .unwrap_or_else(|| "sqlite://data/libris.db".to_string());

        // Token signing cannot work without a secret, so fail at startup
        // rather than on the first login attempt.
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET is required")?;

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "4000".to_string())
                .parse()
                .context("Invalid PORT")?,

            database_url,

            jwt_secret,

            access_token_lifetime: env::var("ACCESS_TOKEN_LIFETIME")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(24 * 60 * 60),

            bcrypt_cost: env::var("BCRYPT_COST")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(bcrypt::DEFAULT_COST),
        })
    }
}
