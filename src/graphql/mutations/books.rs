use super::prelude::*;

#[derive(Default)]
pub struct BookMutations;

#[Object]
impl BookMutations {
    /// Add a book, creating its author on first sight.
    ///
    /// Requires authentication. Author creation happens before the book
    /// insert, so the book always references an existing author.
    async fn add_book(
        &self,
        ctx: &Context<'_>,
        title: String,
        author: String,
        published: i64,
        genres: Vec<String>,
    ) -> Result<Book> {
        let user = ctx.auth_user()?;
        let db = ctx.data_unchecked::<Database>();
        let authors = db.authors();

        let author_record = match authors.get_by_name(&author).await.map_err(from_db)? {
            Some(existing) => existing,
            None => match authors.create(&author).await {
                Ok(created) => created,
                // Lost the create race: the author exists now, use it
                Err(DbError::UniqueViolation { .. }) => authors
                    .get_by_name(&author)
                    .await
                    .map_err(from_db)?
                    .ok_or_else(|| internal("author missing after unique violation"))?,
                Err(e) => return Err(from_db(e)),
            },
        };

        let book = db
            .books()
            .create(CreateBook {
                title,
                published,
                genres,
                author_id: author_record.id.clone(),
            })
            .await
            .map_err(from_db)?;

        tracing::info!(
            user_id = %user.0.id,
            book_id = %book.id,
            author = %author_record.name,
            "Book added"
        );

        db.books()
            .get_with_author(&book.id)
            .await
            .map_err(from_db)?
            .map(Book::from)
            .ok_or_else(|| internal("book missing after insert"))
    }
}
