use super::prelude::*;

#[derive(Default)]
pub struct UserQueries;

#[Object]
impl UserQueries {
    /// The current authenticated user, or null when anonymous
    async fn me(&self, ctx: &Context<'_>) -> Option<User> {
        ctx.try_auth_user().map(|u| User::from(u.0.clone()))
    }
}
