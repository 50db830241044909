//! GraphQL schema definition

use async_graphql::{EmptySubscription, MergedObject, Schema};

use super::mutations::{AuthMutations, AuthorMutations, BookMutations};
use super::queries::{AuthorQueries, BookQueries, UserQueries};
use crate::db::Database;
use crate::services::AuthService;

/// The GraphQL schema type
pub type LibrisSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

#[derive(MergedObject, Default)]
pub struct QueryRoot(BookQueries, AuthorQueries, UserQueries);

#[derive(MergedObject, Default)]
pub struct MutationRoot(BookMutations, AuthorMutations, AuthMutations);

/// Build the GraphQL schema with all resolvers
pub fn build_schema(db: Database, auth: AuthService) -> LibrisSchema {
    Schema::build(QueryRoot::default(), MutationRoot::default(), EmptySubscription)
        .data(db)
        .data(auth)
        .finish()
}
