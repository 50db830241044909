use super::prelude::*;

#[derive(Default)]
pub struct AuthorQueries;

#[Object]
impl AuthorQueries {
    /// Total number of authors in the catalog
    async fn author_count(&self, ctx: &Context<'_>) -> Result<i64> {
        let db = ctx.data_unchecked::<Database>();
        db.authors().count().await.map_err(from_db)
    }

    /// Every author with its computed book count
    async fn all_authors(&self, ctx: &Context<'_>) -> Result<Vec<Author>> {
        let db = ctx.data_unchecked::<Database>();

        let records = db.authors().list_with_book_counts().await.map_err(from_db)?;

        Ok(records.into_iter().map(Author::from).collect())
    }
}
