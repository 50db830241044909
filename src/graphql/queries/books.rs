use super::prelude::*;

#[derive(Default)]
pub struct BookQueries;

#[Object]
impl BookQueries {
    /// Total number of books in the catalog
    async fn book_count(&self, ctx: &Context<'_>) -> Result<i64> {
        let db = ctx.data_unchecked::<Database>();
        db.books().count().await.map_err(from_db)
    }

    /// All books with their authors, optionally filtered by author name
    /// and/or genre membership
    async fn all_books(
        &self,
        ctx: &Context<'_>,
        author: Option<String>,
        genre: Option<String>,
    ) -> Result<Vec<Book>> {
        let db = ctx.data_unchecked::<Database>();

        let records = db
            .books()
            .list(author.as_deref(), genre.as_deref())
            .await
            .map_err(from_db)?;

        Ok(records.into_iter().map(Book::from).collect())
    }
}
