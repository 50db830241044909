//! GraphQL authentication context
//!
//! The per-request identity is an explicit two-state value: a `CurrentUser`
//! present in the request data (authenticated) or nothing (anonymous). There
//! is no third "context missing" shape for resolvers to worry about.

use async_graphql::{Context, Result};

use super::errors;
use crate::db::{Database, UserRecord};
use crate::services::AuthService;

/// Request-scoped authenticated identity, carrying the loaded user row
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserRecord);

/// Resolve a bearer token into a `CurrentUser`.
///
/// Any failure (bad signature, expired token, unknown subject) degrades to
/// anonymous rather than failing the request; mutations that need an
/// identity reject anonymous callers at their own gate.
pub async fn resolve_current_user(
    auth: &AuthService,
    db: &Database,
    token: &str,
) -> Option<CurrentUser> {
    let claims = match auth.validate_access_token(token) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::debug!(error = %e, "Rejected bearer token, continuing as anonymous");
            return None;
        }
    };

    match db.users().get_by_id(&claims.sub).await {
        Ok(Some(user)) => Some(CurrentUser(user)),
        Ok(None) => {
            tracing::debug!(user_id = %claims.sub, "Token subject no longer exists");
            None
        }
        Err(e) => {
            tracing::warn!(error = %e, "User lookup failed while resolving identity");
            None
        }
    }
}

/// Extension trait to get the authenticated user from the GraphQL context
pub trait AuthExt {
    /// Get the authenticated user, or fail with an UNAUTHENTICATED error
    fn auth_user(&self) -> Result<&CurrentUser>;

    /// Get the authenticated user if present, or None
    fn try_auth_user(&self) -> Option<&CurrentUser>;
}

impl AuthExt for Context<'_> {
    fn auth_user(&self) -> Result<&CurrentUser> {
        self.data_opt::<CurrentUser>()
            .ok_or_else(errors::unauthenticated)
    }

    fn try_auth_user(&self) -> Option<&CurrentUser> {
        self.data_opt::<CurrentUser>()
    }
}
