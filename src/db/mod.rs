//! Database connection and repositories
//!
//! SQLite-backed persistence for the three collections (authors, books,
//! users). Schema setup runs in-code at startup via [`Database::migrate`].

pub mod authors;
pub mod books;
mod helpers;
pub mod users;

use std::str::FromStr;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use thiserror::Error;

pub use authors::{AuthorRecord, AuthorWithBookCount, AuthorsRepository};
pub use books::{BookRecord, BookWithAuthor, BooksRepository, CreateBook};
pub use users::{CreateUser, UserRecord, UsersRepository};

/// Repository error carrying the offending field for constraint failures,
/// so the API layer can surface it as a typed validation error.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("{field} must not be blank")]
    InvalidField { field: &'static str },

    #[error("{field} is already taken")]
    UniqueViolation { field: &'static str },

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl DbError {
    /// Classify a write error: a unique-constraint violation becomes a typed
    /// error naming `field`, everything else passes through.
    pub(crate) fn unique_on(err: sqlx::Error, field: &'static str) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                Self::UniqueViolation { field }
            }
            _ => Self::Sqlx(err),
        }
    }
}

/// Database wrapper providing connection pool access
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Get the maximum connection pool size from environment or default
    fn get_max_connections() -> u32 {
        std::env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(5)
    }

    /// Create a new database connection pool
    pub async fn connect(url: &str) -> Result<Self, DbError> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        // A plain in-memory database exists per connection; pin the pool to a
        // single long-lived connection so every query sees the same schema.
        let pool = if url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            SqlitePoolOptions::new()
                .max_connections(Self::get_max_connections())
                .connect_with(options)
                .await?
        };

        Ok(Self { pool })
    }

    /// Create a new database connection pool with retry logic.
    /// Retries every `retry_interval` until successful.
    pub async fn connect_with_retry(url: &str, retry_interval: Duration) -> Self {
        loop {
            match Self::connect(url).await {
                Ok(db) => return db,
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        retry_in_secs = retry_interval.as_secs(),
                        "Database connection failed, retrying"
                    );
                    tokio::time::sleep(retry_interval).await;
                }
            }
        }
    }

    /// Get the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Get an authors repository
    pub fn authors(&self) -> AuthorsRepository {
        AuthorsRepository::new(self.pool.clone())
    }

    /// Get a books repository
    pub fn books(&self) -> BooksRepository {
        BooksRepository::new(self.pool.clone())
    }

    /// Get a users repository
    pub fn users(&self) -> UsersRepository {
        UsersRepository::new(self.pool.clone())
    }

    /// Create the schema if it does not exist yet
    pub async fn migrate(&self) -> Result<(), DbError> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }
}

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS authors (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL UNIQUE,
        born INTEGER,
        created_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS books (
        id TEXT PRIMARY KEY,
        title TEXT NOT NULL,
        published INTEGER NOT NULL,
        genres TEXT NOT NULL DEFAULT '[]',
        author_id TEXT NOT NULL REFERENCES authors(id),
        created_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id TEXT PRIMARY KEY,
        username TEXT NOT NULL COLLATE NOCASE UNIQUE,
        favourite_genre TEXT NOT NULL,
        password_hash TEXT NOT NULL,
        created_at TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_books_author ON books(author_id)",
];
