//! libris - GraphQL API backend for a small book catalog
//!
//! Exposes authors, books, and users over a single GraphQL endpoint with
//! bearer-token authentication. The binary in `main.rs` wires these modules
//! to an axum HTTP server.

pub mod config;
pub mod db;
pub mod graphql;
pub mod services;
