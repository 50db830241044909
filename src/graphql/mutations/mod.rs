pub mod auth;
pub mod authors;
pub mod books;

pub use auth::AuthMutations;
pub use authors::AuthorMutations;
pub use books::BookMutations;

pub(crate) mod prelude {
    pub(crate) use async_graphql::{Context, Object, Result};

    pub(crate) use crate::db::{CreateBook, Database, DbError};
    pub(crate) use crate::graphql::auth::AuthExt;
    pub(crate) use crate::graphql::errors::{from_auth, from_db, internal};
    pub(crate) use crate::graphql::types::*;
    pub(crate) use crate::services::{AuthService, RegisterInput};
}
