//! Authors repository
//!
//! Author names are unique at the persistence layer; concurrent creates for
//! the same name resolve through the unique constraint (the caller re-fetches
//! on a violation).

use sqlx::SqlitePool;
use uuid::Uuid;

use super::DbError;
use super::helpers::now_iso8601;

#[derive(Debug, Clone)]
pub struct AuthorRecord {
    pub id: String,
    pub name: String,
    pub born: Option<i64>,
    pub created_at: String,
}

/// Author joined with the number of books referencing it
#[derive(Debug, Clone)]
pub struct AuthorWithBookCount {
    pub id: String,
    pub name: String,
    pub born: Option<i64>,
    pub book_count: i64,
}

pub struct AuthorsRepository {
    pool: SqlitePool,
}

impl AuthorsRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new author with no birth year
    pub async fn create(&self, name: &str) -> Result<AuthorRecord, DbError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DbError::InvalidField { field: "name" });
        }

        let id = Uuid::new_v4().to_string();
        let now = now_iso8601();

        sqlx::query("INSERT INTO authors (id, name, born, created_at) VALUES (?, ?, NULL, ?)")
            .bind(&id)
            .bind(name)
            .bind(&now)
            .execute(&self.pool)
            .await
            .map_err(|e| DbError::unique_on(e, "name"))?;

        Ok(AuthorRecord {
            id,
            name: name.to_string(),
            born: None,
            created_at: now,
        })
    }

    /// Get author by name
    pub async fn get_by_name(&self, name: &str) -> Result<Option<AuthorRecord>, DbError> {
        let row = sqlx::query_as::<_, (String, String, Option<i64>, String)>(
            "SELECT id, name, born, created_at FROM authors WHERE name = ?",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| AuthorRecord {
            id: r.0,
            name: r.1,
            born: r.2,
            created_at: r.3,
        }))
    }

    /// Get author by ID
    pub async fn get_by_id(&self, id: &str) -> Result<Option<AuthorRecord>, DbError> {
        let row = sqlx::query_as::<_, (String, String, Option<i64>, String)>(
            "SELECT id, name, born, created_at FROM authors WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| AuthorRecord {
            id: r.0,
            name: r.1,
            born: r.2,
            created_at: r.3,
        }))
    }

    /// Load the author by name, update `born` on that same row, and return
    /// the persisted record. `None` if no author has that name.
    pub async fn set_born(&self, name: &str, born: i64) -> Result<Option<AuthorRecord>, DbError> {
        let Some(author) = self.get_by_name(name).await? else {
            return Ok(None);
        };

        sqlx::query("UPDATE authors SET born = ? WHERE id = ?")
            .bind(born)
            .bind(&author.id)
            .execute(&self.pool)
            .await?;

        self.get_by_id(&author.id).await
    }

    /// Get one author with its computed book count
    pub async fn get_with_book_count(
        &self,
        id: &str,
    ) -> Result<Option<AuthorWithBookCount>, DbError> {
        let row = sqlx::query_as::<_, (String, String, Option<i64>, i64)>(
            r#"
            SELECT a.id, a.name, a.born, COUNT(b.id)
            FROM authors a
            LEFT JOIN books b ON b.author_id = a.id
            WHERE a.id = ?
            GROUP BY a.id, a.name, a.born
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| AuthorWithBookCount {
            id: r.0,
            name: r.1,
            born: r.2,
            book_count: r.3,
        }))
    }

    /// List every author with its computed book count, in insertion order
    pub async fn list_with_book_counts(&self) -> Result<Vec<AuthorWithBookCount>, DbError> {
        let rows = sqlx::query_as::<_, (String, String, Option<i64>, i64)>(
            r#"
            SELECT a.id, a.name, a.born, COUNT(b.id)
            FROM authors a
            LEFT JOIN books b ON b.author_id = a.id
            GROUP BY a.id, a.name, a.born
            ORDER BY a.rowid
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| AuthorWithBookCount {
                id: r.0,
                name: r.1,
                born: r.2,
                book_count: r.3,
            })
            .collect())
    }

    /// Count authors
    pub async fn count(&self) -> Result<i64, DbError> {
        let row = sqlx::query_as::<_, (i64,)>("SELECT COUNT(*) FROM authors")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0)
    }
}
