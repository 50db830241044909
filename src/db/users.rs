//! Users repository
//!
//! Usernames are unique case-insensitively. Password hashes are produced by
//! the auth service; this layer only stores and returns them.

use sqlx::SqlitePool;
use uuid::Uuid;

use super::DbError;
use super::helpers::now_iso8601;

#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: String,
    pub username: String,
    pub favourite_genre: String,
    pub password_hash: String,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct CreateUser {
    pub username: String,
    pub favourite_genre: String,
    pub password_hash: String,
}

pub struct UsersRepository {
    pool: SqlitePool,
}

impl UsersRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new user
    pub async fn create(&self, user: CreateUser) -> Result<UserRecord, DbError> {
        let username = user.username.trim();
        if username.is_empty() {
            return Err(DbError::InvalidField { field: "username" });
        }
        if user.favourite_genre.trim().is_empty() {
            return Err(DbError::InvalidField {
                field: "favouriteGenre",
            });
        }

        let id = Uuid::new_v4().to_string();
        let now = now_iso8601();

        sqlx::query(
            r#"
            INSERT INTO users (id, username, favourite_genre, password_hash, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(username)
        .bind(user.favourite_genre.trim())
        .bind(&user.password_hash)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| DbError::unique_on(e, "username"))?;

        Ok(UserRecord {
            id,
            username: username.to_string(),
            favourite_genre: user.favourite_genre.trim().to_string(),
            password_hash: user.password_hash,
            created_at: now,
        })
    }

    /// Get user by username (case-insensitive)
    pub async fn get_by_username(&self, username: &str) -> Result<Option<UserRecord>, DbError> {
        let row = sqlx::query_as::<_, (String, String, String, String, String)>(
            "SELECT id, username, favourite_genre, password_hash, created_at FROM users WHERE username = ? COLLATE NOCASE",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| UserRecord {
            id: r.0,
            username: r.1,
            favourite_genre: r.2,
            password_hash: r.3,
            created_at: r.4,
        }))
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: &str) -> Result<Option<UserRecord>, DbError> {
        let row = sqlx::query_as::<_, (String, String, String, String, String)>(
            "SELECT id, username, favourite_genre, password_hash, created_at FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| UserRecord {
            id: r.0,
            username: r.1,
            favourite_genre: r.2,
            password_hash: r.3,
            created_at: r.4,
        }))
    }

    /// Count users
    pub async fn count(&self) -> Result<i64, DbError> {
        let row = sqlx::query_as::<_, (i64,)>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0)
    }
}
