//! GraphQL object types and their conversions from database records

use async_graphql::SimpleObject;

use crate::db::{AuthorWithBookCount, BookWithAuthor, UserRecord};

/// An author; `bookCount` is always computed, never null
#[derive(Debug, Clone, SimpleObject)]
pub struct Author {
    pub id: String,
    pub name: String,
    pub born: Option<i64>,
    pub book_count: i64,
}

/// A book with its author joined in
#[derive(Debug, Clone, SimpleObject)]
pub struct Book {
    pub id: String,
    pub title: String,
    pub published: i64,
    pub genres: Vec<String>,
    pub author: Author,
}

#[derive(Debug, Clone, SimpleObject)]
pub struct User {
    pub id: String,
    pub username: String,
    pub favourite_genre: String,
}

/// A signed bearer credential
#[derive(Debug, Clone, SimpleObject)]
pub struct Token {
    pub value: String,
}

impl From<AuthorWithBookCount> for Author {
    fn from(r: AuthorWithBookCount) -> Self {
        Self {
            id: r.id,
            name: r.name,
            born: r.born,
            book_count: r.book_count,
        }
    }
}

impl From<BookWithAuthor> for Book {
    fn from(r: BookWithAuthor) -> Self {
        Self {
            id: r.id,
            title: r.title,
            published: r.published,
            genres: r.genres,
            author: Author {
                id: r.author_id,
                name: r.author_name,
                born: r.author_born,
                book_count: r.author_book_count,
            },
        }
    }
}

impl From<UserRecord> for User {
    fn from(r: UserRecord) -> Self {
        Self {
            id: r.id,
            username: r.username,
            favourite_genre: r.favourite_genre,
        }
    }
}
