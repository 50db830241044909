//! Books repository
//!
//! Books reference their author by id (foreign key, not embedded). Genres
//! are stored as a JSON array column; membership filtering uses `json_each`.

use sqlx::SqlitePool;
use uuid::Uuid;

use super::DbError;
use super::helpers::{json_to_vec, now_iso8601, vec_to_json};

#[derive(Debug, Clone)]
pub struct BookRecord {
    pub id: String,
    pub title: String,
    pub published: i64,
    pub genres: Vec<String>,
    pub author_id: String,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct CreateBook {
    pub title: String,
    pub published: i64,
    pub genres: Vec<String>,
    pub author_id: String,
}

/// Book joined with its author (and the author's computed book count, so the
/// nested author object can satisfy its non-null count field)
#[derive(Debug, Clone)]
pub struct BookWithAuthor {
    pub id: String,
    pub title: String,
    pub published: i64,
    pub genres: Vec<String>,
    pub author_id: String,
    pub author_name: String,
    pub author_born: Option<i64>,
    pub author_book_count: i64,
}

const SELECT_WITH_AUTHOR: &str = r#"
    SELECT b.id, b.title, b.published, b.genres,
           a.id, a.name, a.born,
           (SELECT COUNT(*) FROM books b2 WHERE b2.author_id = a.id)
    FROM books b
    JOIN authors a ON a.id = b.author_id
"#;

type BookWithAuthorRow = (
    String,
    String,
    i64,
    String,
    String,
    String,
    Option<i64>,
    i64,
);

fn row_to_book_with_author(r: BookWithAuthorRow) -> BookWithAuthor {
    BookWithAuthor {
        id: r.0,
        title: r.1,
        published: r.2,
        genres: json_to_vec(&r.3),
        author_id: r.4,
        author_name: r.5,
        author_born: r.6,
        author_book_count: r.7,
    }
}

pub struct BooksRepository {
    pool: SqlitePool,
}

impl BooksRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new book. The author must already exist.
    pub async fn create(&self, book: CreateBook) -> Result<BookRecord, DbError> {
        let title = book.title.trim();
        if title.is_empty() {
            return Err(DbError::InvalidField { field: "title" });
        }

        let id = Uuid::new_v4().to_string();
        let now = now_iso8601();
        let genres_json = vec_to_json(&book.genres);

        sqlx::query(
            r#"
            INSERT INTO books (id, title, published, genres, author_id, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(title)
        .bind(book.published)
        .bind(&genres_json)
        .bind(&book.author_id)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(BookRecord {
            id,
            title: title.to_string(),
            published: book.published,
            genres: book.genres,
            author_id: book.author_id,
            created_at: now,
        })
    }

    /// Get a single book joined with its author
    pub async fn get_with_author(&self, id: &str) -> Result<Option<BookWithAuthor>, DbError> {
        let query = format!("{SELECT_WITH_AUTHOR} WHERE b.id = ?");
        let row = sqlx::query_as::<_, BookWithAuthorRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(row_to_book_with_author))
    }

    /// List books joined with their authors, in insertion order.
    /// `author` filters by exact author name; `genre` by set membership in
    /// the genres array. Either filter may be absent.
    pub async fn list(
        &self,
        author: Option<&str>,
        genre: Option<&str>,
    ) -> Result<Vec<BookWithAuthor>, DbError> {
        let query = format!(
            r#"
            {SELECT_WITH_AUTHOR}
            WHERE (?1 IS NULL OR a.name = ?1)
              AND (?2 IS NULL OR EXISTS (
                    SELECT 1 FROM json_each(b.genres) WHERE json_each.value = ?2
                  ))
            ORDER BY b.rowid
            "#
        );

        let rows = sqlx::query_as::<_, BookWithAuthorRow>(&query)
            .bind(author)
            .bind(genre)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(row_to_book_with_author).collect())
    }

    /// Count books
    pub async fn count(&self) -> Result<i64, DbError> {
        let row = sqlx::query_as::<_, (i64,)>("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0)
    }
}
