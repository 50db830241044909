//! User creation and login mutations
//!
//! Neither operation requires authentication. Credentials are per-user
//! bcrypt hashes; login failures never reveal whether the username exists.

use super::prelude::*;

#[derive(Default)]
pub struct AuthMutations;

#[Object]
impl AuthMutations {
    /// Create a user account
    async fn create_user(
        &self,
        ctx: &Context<'_>,
        username: String,
        favourite_genre: String,
        password: String,
    ) -> Result<User> {
        let auth = ctx.data_unchecked::<AuthService>();

        match auth
            .register(RegisterInput {
                username,
                favourite_genre,
                password,
            })
            .await
        {
            Ok(user) => {
                tracing::info!(user_id = %user.id, username = %user.username, "User created");
                Ok(user.into())
            }
            Err(e) => {
                tracing::warn!(error = %e, "User creation failed");
                Err(from_auth(e))
            }
        }
    }

    /// Authenticate with username and password, receiving a bearer token
    async fn login(&self, ctx: &Context<'_>, username: String, password: String) -> Result<Token> {
        let auth = ctx.data_unchecked::<AuthService>();

        match auth.login(&username, &password).await {
            Ok((user, token)) => {
                tracing::info!(user_id = %user.id, username = %user.username, "User logged in");
                Ok(Token { value: token })
            }
            Err(e) => {
                tracing::warn!(username = %username, error = %e, "Login failed");
                Err(from_auth(e))
            }
        }
    }
}
