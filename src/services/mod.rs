//! Business services

pub mod auth;

pub use auth::{AccessTokenClaims, AuthConfig, AuthError, AuthService, RegisterInput};
