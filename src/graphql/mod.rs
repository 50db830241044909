//! GraphQL API surface
//!
//! Queries and mutations are split into domain-specific modules; each file
//! defines a `#[derive(Default)]` struct with an `#[Object]` impl, and
//! `schema.rs` combines them with `MergedObject` into the roots.

pub mod auth;
pub mod errors;
pub mod mutations;
pub mod queries;
mod schema;
pub mod types;

pub use auth::{AuthExt, CurrentUser, resolve_current_user};
pub use schema::{LibrisSchema, MutationRoot, QueryRoot, build_schema};
