use super::prelude::*;

#[derive(Default)]
pub struct AuthorMutations;

#[Object]
impl AuthorMutations {
    /// Set an author's birth year.
    ///
    /// Requires authentication. Returns null for an unknown author name.
    async fn edit_author(
        &self,
        ctx: &Context<'_>,
        name: String,
        set_born_to: i64,
    ) -> Result<Option<Author>> {
        let user = ctx.auth_user()?;
        let db = ctx.data_unchecked::<Database>();

        let Some(updated) = db
            .authors()
            .set_born(&name, set_born_to)
            .await
            .map_err(from_db)?
        else {
            return Ok(None);
        };

        tracing::info!(
            user_id = %user.0.id,
            author = %updated.name,
            born = set_born_to,
            "Author updated"
        );

        let with_count = db
            .authors()
            .get_with_book_count(&updated.id)
            .await
            .map_err(from_db)?
            .ok_or_else(|| internal("author missing after update"))?;

        Ok(Some(Author::from(with_count)))
    }
}
