//! Translation of service and repository failures into GraphQL errors
//!
//! Every error surfaced to the caller carries a machine-readable `code`
//! extension; validation failures additionally carry `invalidArgs` naming
//! the offending field.

use async_graphql::{Error, ErrorExtensions};

use crate::db::DbError;
use crate::services::AuthError;

pub(crate) fn unauthenticated() -> Error {
    Error::new("not authenticated").extend_with(|_, e| e.set("code", "UNAUTHENTICATED"))
}

pub(crate) fn invalid_credentials() -> Error {
    Error::new("wrong credentials").extend_with(|_, e| e.set("code", "INVALID_CREDENTIALS"))
}

pub(crate) fn bad_user_input(message: impl Into<String>, field: &str) -> Error {
    Error::new(message).extend_with(|_, e| {
        e.set("code", "BAD_USER_INPUT");
        e.set("invalidArgs", field);
    })
}

pub(crate) fn internal(message: impl Into<String>) -> Error {
    Error::new(message).extend_with(|_, e| e.set("code", "INTERNAL_SERVER_ERROR"))
}

pub(crate) fn from_db(err: DbError) -> Error {
    match &err {
        DbError::InvalidField { field } | DbError::UniqueViolation { field } => {
            let field = *field;
            bad_user_input(err.to_string(), field)
        }
        DbError::Sqlx(_) => internal(err.to_string()),
    }
}

pub(crate) fn from_auth(err: AuthError) -> Error {
    match err {
        AuthError::InvalidCredentials => invalid_credentials(),
        AuthError::Db(db) => from_db(db),
        other => internal(other.to_string()),
    }
}
