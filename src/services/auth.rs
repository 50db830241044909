//! Authentication service for user management and JWT handling
//!
//! Provides:
//! - User registration with bcrypt password hashing
//! - Login with per-user credential verification
//! - Access token generation and validation

use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::{CreateUser, Database, DbError, UserRecord};

// ============================================================================
// JWT Claims
// ============================================================================

/// Claims structure for access tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    /// User ID (subject)
    pub sub: String,
    /// Username
    pub username: String,
    /// Token type
    pub token_type: String,
    /// Expiration timestamp
    pub exp: i64,
    /// Issued at timestamp
    pub iat: i64,
}

// ============================================================================
// Auth Types
// ============================================================================

/// Registration input
#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub username: String,
    pub favourite_genre: String,
    pub password: String,
}

#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown username or wrong password; deliberately indistinguishable
    #[error("wrong credentials")]
    InvalidCredentials,

    #[error("invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    #[error("invalid token type")]
    InvalidTokenType,

    #[error("password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error(transparent)]
    Db(#[from] DbError),
}

// ============================================================================
// Configuration
// ============================================================================

/// Auth service configuration. The signing secret is supplied here at
/// construction, never read from the environment at call time.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// JWT signing secret
    pub jwt_secret: String,
    /// Access token lifetime in seconds
    pub access_token_lifetime: i64,
    /// Bcrypt cost factor
    pub bcrypt_cost: u32,
}

impl From<&crate::config::Config> for AuthConfig {
    fn from(config: &crate::config::Config) -> Self {
        Self {
            jwt_secret: config.jwt_secret.clone(),
            access_token_lifetime: config.access_token_lifetime,
            bcrypt_cost: config.bcrypt_cost,
        }
    }
}

// ============================================================================
// Auth Service
// ============================================================================

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    db: Database,
    config: AuthConfig,
}

impl AuthService {
    /// Create a new auth service
    pub fn new(db: Database, config: AuthConfig) -> Self {
        Self { db, config }
    }

    /// Register a new user with a hashed per-user password
    pub async fn register(&self, input: RegisterInput) -> Result<UserRecord, AuthError> {
        if input.password.trim().is_empty() {
            return Err(DbError::InvalidField { field: "password" }.into());
        }

        let password_hash = hash(&input.password, self.config.bcrypt_cost)?;

        let user = self
            .db
            .users()
            .create(CreateUser {
                username: input.username,
                favourite_genre: input.favourite_genre,
                password_hash,
            })
            .await?;

        Ok(user)
    }

    /// Login with username and password, returning the user and a signed
    /// access token
    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<(UserRecord, String), AuthError> {
        let Some(user) = self.db.users().get_by_username(username).await? else {
            return Err(AuthError::InvalidCredentials);
        };

        if !verify(password, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.issue_token(&user)?;
        Ok((user, token))
    }

    /// Sign an access token embedding the user's id and username
    pub fn issue_token(&self, user: &UserRecord) -> Result<String, AuthError> {
        let now = Utc::now();

        let claims = AccessTokenClaims {
            sub: user.id.clone(),
            username: user.username.clone(),
            token_type: "access".to_string(),
            exp: (now + Duration::seconds(self.config.access_token_lifetime)).timestamp(),
            iat: now.timestamp(),
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )?;

        Ok(token)
    }

    /// Decode and validate an access token (signature, expiry, token type)
    pub fn validate_access_token(&self, token: &str) -> Result<AccessTokenClaims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        let token_data = decode::<AccessTokenClaims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &validation,
        )?;

        if token_data.claims.token_type != "access" {
            return Err(AuthError::InvalidTokenType);
        }

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    async fn test_service() -> AuthService {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("in-memory database");
        db.migrate().await.expect("schema setup");

        AuthService::new(
            db,
            AuthConfig {
                jwt_secret: "unit-test-secret".to_string(),
                access_token_lifetime: 3600,
                // Minimum cost keeps hashing fast in tests
                bcrypt_cost: 4,
            },
        )
    }

    fn alice() -> RegisterInput {
        RegisterInput {
            username: "alice".to_string(),
            favourite_genre: "fantasy".to_string(),
            password: "secret".to_string(),
        }
    }

    #[tokio::test]
    async fn issued_token_round_trips_claims() {
        let auth = test_service().await;
        let user = auth.register(alice()).await.expect("register");

        let (_, token) = auth.login("alice", "secret").await.expect("login");
        let claims = auth.validate_access_token(&token).expect("valid token");

        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.token_type, "access");
    }

    #[tokio::test]
    async fn tampered_token_is_rejected() {
        let auth = test_service().await;
        let user = auth.register(alice()).await.expect("register");

        let mut token = auth.issue_token(&user).expect("issue");
        // Flip the final signature character
        let tail = if token.ends_with('A') { 'B' } else { 'A' };
        token.pop();
        token.push(tail);

        assert_matches!(
            auth.validate_access_token(&token),
            Err(AuthError::InvalidToken(_))
        );
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_user_fail_identically() {
        let auth = test_service().await;
        auth.register(alice()).await.expect("register");

        assert_matches!(
            auth.login("alice", "wrong").await,
            Err(AuthError::InvalidCredentials)
        );
        assert_matches!(
            auth.login("mallory", "secret").await,
            Err(AuthError::InvalidCredentials)
        );
    }

    #[tokio::test]
    async fn duplicate_username_is_a_typed_violation() {
        let auth = test_service().await;
        auth.register(alice()).await.expect("register");

        assert_matches!(
            auth.register(alice()).await,
            Err(AuthError::Db(DbError::UniqueViolation { field: "username" }))
        );
    }

    #[tokio::test]
    async fn blank_password_is_rejected_before_hashing() {
        let auth = test_service().await;
        let input = RegisterInput {
            password: "   ".to_string(),
            ..alice()
        };

        assert_matches!(
            auth.register(input).await,
            Err(AuthError::Db(DbError::InvalidField { field: "password" }))
        );
    }
}
