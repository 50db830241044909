//! Integration tests for the GraphQL API
//!
//! Exercises the full resolver pipeline against an in-memory SQLite
//! database: the authentication gate, the add-book author upsert, book
//! filtering, computed author counts, and the create-user/login flow.

use async_graphql::Request;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

use libris::db::{CreateBook, Database, UserRecord};
use libris::graphql::{CurrentUser, LibrisSchema, build_schema, resolve_current_user};
use libris::services::{AuthConfig, AuthService, RegisterInput};

// ============================================================================
// Harness
// ============================================================================

async fn test_env() -> (LibrisSchema, Database, AuthService) {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("in-memory database");
    db.migrate().await.expect("schema setup");

    let auth = AuthService::new(
        db.clone(),
        AuthConfig {
            jwt_secret: "integration-test-secret".to_string(),
            access_token_lifetime: 3600,
            bcrypt_cost: 4,
        },
    );
    let schema = build_schema(db.clone(), auth.clone());

    (schema, db, auth)
}

async fn register_alice(auth: &AuthService) -> CurrentUser {
    let user = auth
        .register(RegisterInput {
            username: "alice".to_string(),
            favourite_genre: "fantasy".to_string(),
            password: "secret".to_string(),
        })
        .await
        .expect("register");
    CurrentUser(user)
}

/// Execute a GraphQL operation, optionally with an authenticated identity,
/// and return the serialized response
async fn execute(schema: &LibrisSchema, operation: &str, user: Option<CurrentUser>) -> Value {
    let mut request = Request::new(operation);
    if let Some(user) = user {
        request = request.data(user);
    }
    serde_json::to_value(schema.execute(request).await).expect("serializable response")
}

fn error_code(response: &Value) -> &str {
    response["errors"][0]["extensions"]["code"]
        .as_str()
        .unwrap_or_default()
}

fn assert_no_errors(response: &Value) {
    assert!(
        response.get("errors").is_none(),
        "unexpected errors: {response}"
    );
}

async fn seed_book(db: &Database, title: &str, author: &str, published: i64, genres: &[&str]) {
    let authors = db.authors();
    let author = match authors.get_by_name(author).await.unwrap() {
        Some(existing) => existing,
        None => authors.create(author).await.unwrap(),
    };
    db.books()
        .create(CreateBook {
            title: title.to_string(),
            published,
            genres: genres.iter().map(|g| g.to_string()).collect(),
            author_id: author.id,
        })
        .await
        .unwrap();
}

const ADD_BOOK: &str = r#"mutation {
    addBook(title: "Mort", author: "Terry Pratchett", published: 1987, genres: ["fantasy", "comedy"]) {
        title published genres author { name bookCount }
    }
}"#;

// ============================================================================
// Mutation pipeline
// ============================================================================

#[tokio::test]
async fn add_book_creates_exactly_one_author_and_one_book() {
    let (schema, db, auth) = test_env().await;
    let user = register_alice(&auth).await;

    let response = execute(&schema, ADD_BOOK, Some(user)).await;
    assert_no_errors(&response);
    assert_eq!(
        response["data"]["addBook"],
        json!({
            "title": "Mort",
            "published": 1987,
            "genres": ["fantasy", "comedy"],
            "author": { "name": "Terry Pratchett", "bookCount": 1 }
        })
    );

    assert_eq!(db.authors().count().await.unwrap(), 1);
    assert_eq!(db.books().count().await.unwrap(), 1);
}

#[tokio::test]
async fn add_book_reuses_an_existing_author() {
    let (schema, db, auth) = test_env().await;
    let user = register_alice(&auth).await;

    let response = execute(&schema, ADD_BOOK, Some(user.clone())).await;
    assert_no_errors(&response);

    let second = r#"mutation {
        addBook(title: "Guards! Guards!", author: "Terry Pratchett", published: 1989, genres: ["fantasy"]) {
            author { name bookCount }
        }
    }"#;
    let response = execute(&schema, second, Some(user)).await;
    assert_no_errors(&response);
    assert_eq!(response["data"]["addBook"]["author"]["bookCount"], 2);

    assert_eq!(db.authors().count().await.unwrap(), 1);
    assert_eq!(db.books().count().await.unwrap(), 2);
}

#[tokio::test]
async fn mutations_without_identity_are_rejected_without_side_effects() {
    let (schema, db, _auth) = test_env().await;

    let response = execute(&schema, ADD_BOOK, None).await;
    assert_eq!(error_code(&response), "UNAUTHENTICATED");

    let edit = r#"mutation { editAuthor(name: "Terry Pratchett", setBornTo: 1948) { name } }"#;
    let response = execute(&schema, edit, None).await;
    assert_eq!(error_code(&response), "UNAUTHENTICATED");

    assert_eq!(db.authors().count().await.unwrap(), 0);
    assert_eq!(db.books().count().await.unwrap(), 0);
}

#[tokio::test]
async fn blank_title_is_a_typed_validation_error() {
    let (schema, db, auth) = test_env().await;
    let user = register_alice(&auth).await;

    let blank = r#"mutation {
        addBook(title: "   ", author: "Terry Pratchett", published: 1987, genres: []) { title }
    }"#;
    let response = execute(&schema, blank, Some(user)).await;

    assert_eq!(error_code(&response), "BAD_USER_INPUT");
    assert_eq!(response["errors"][0]["extensions"]["invalidArgs"], "title");
    // The author upsert runs before book validation; only the book is absent
    assert_eq!(db.authors().count().await.unwrap(), 1);
    assert_eq!(db.books().count().await.unwrap(), 0);
}

#[tokio::test]
async fn edit_author_persists_the_birth_year_on_the_same_record() {
    let (schema, db, auth) = test_env().await;
    let user = register_alice(&auth).await;
    let created = db.authors().create("Terry Pratchett").await.unwrap();

    let edit = r#"mutation { editAuthor(name: "Terry Pratchett", setBornTo: 1948) { id name born } }"#;
    let response = execute(&schema, edit, Some(user.clone())).await;
    assert_no_errors(&response);
    assert_eq!(response["data"]["editAuthor"]["born"], 1948);
    assert_eq!(response["data"]["editAuthor"]["id"], created.id.as_str());

    let persisted = db.authors().get_by_name("Terry Pratchett").await.unwrap().unwrap();
    assert_eq!(persisted.id, created.id);
    assert_eq!(persisted.born, Some(1948));

    let unknown = r#"mutation { editAuthor(name: "Nobody", setBornTo: 1900) { name } }"#;
    let response = execute(&schema, unknown, Some(user)).await;
    assert_no_errors(&response);
    assert_eq!(response["data"]["editAuthor"], Value::Null);
}

// ============================================================================
// Queries
// ============================================================================

#[tokio::test]
async fn all_books_filters_by_genre_preserving_order() {
    let (schema, db, _auth) = test_env().await;
    seed_book(&db, "Mort", "Terry Pratchett", 1987, &["fantasy", "comedy"]).await;
    seed_book(&db, "Neuromancer", "William Gibson", 1984, &["cyberpunk"]).await;
    seed_book(&db, "The Hobbit", "J. R. R. Tolkien", 1937, &["fantasy"]).await;

    let response = execute(&schema, r#"{ allBooks(genre: "fantasy") { title } }"#, None).await;
    assert_no_errors(&response);
    assert_eq!(
        response["data"]["allBooks"],
        json!([{ "title": "Mort" }, { "title": "The Hobbit" }])
    );

    let response = execute(&schema, r#"{ allBooks { title author { name } } }"#, None).await;
    assert_no_errors(&response);
    assert_eq!(
        response["data"]["allBooks"],
        json!([
            { "title": "Mort", "author": { "name": "Terry Pratchett" } },
            { "title": "Neuromancer", "author": { "name": "William Gibson" } },
            { "title": "The Hobbit", "author": { "name": "J. R. R. Tolkien" } }
        ])
    );
}

#[tokio::test]
async fn all_books_filters_by_author_name() {
    let (schema, db, _auth) = test_env().await;
    seed_book(&db, "Mort", "Terry Pratchett", 1987, &["fantasy"]).await;
    seed_book(&db, "Neuromancer", "William Gibson", 1984, &["cyberpunk"]).await;

    let response = execute(
        &schema,
        r#"{ allBooks(author: "William Gibson") { title } }"#,
        None,
    )
    .await;
    assert_no_errors(&response);
    assert_eq!(response["data"]["allBooks"], json!([{ "title": "Neuromancer" }]));
}

#[tokio::test]
async fn counts_match_collection_cardinality() {
    let (schema, db, _auth) = test_env().await;
    seed_book(&db, "Mort", "Terry Pratchett", 1987, &["fantasy"]).await;
    seed_book(&db, "Guards! Guards!", "Terry Pratchett", 1989, &["fantasy"]).await;
    seed_book(&db, "Neuromancer", "William Gibson", 1984, &["cyberpunk"]).await;

    let response = execute(&schema, "{ bookCount authorCount }", None).await;
    assert_no_errors(&response);
    assert_eq!(response["data"], json!({ "bookCount": 3, "authorCount": 2 }));
}

#[tokio::test]
async fn all_authors_reports_computed_book_counts() {
    let (schema, db, _auth) = test_env().await;
    seed_book(&db, "Mort", "Terry Pratchett", 1987, &["fantasy"]).await;
    seed_book(&db, "Guards! Guards!", "Terry Pratchett", 1989, &["fantasy"]).await;
    db.authors().create("William Gibson").await.unwrap();

    let response = execute(&schema, "{ allAuthors { name born bookCount } }", None).await;
    assert_no_errors(&response);
    assert_eq!(
        response["data"]["allAuthors"],
        json!([
            { "name": "Terry Pratchett", "born": null, "bookCount": 2 },
            { "name": "William Gibson", "born": null, "bookCount": 0 }
        ])
    );
}

#[tokio::test]
async fn me_echoes_the_current_user_or_null() {
    let (schema, _db, auth) = test_env().await;

    let response = execute(&schema, "{ me { username favouriteGenre } }", None).await;
    assert_no_errors(&response);
    assert_eq!(response["data"]["me"], Value::Null);

    let user = register_alice(&auth).await;
    let response = execute(&schema, "{ me { username favouriteGenre } }", Some(user)).await;
    assert_no_errors(&response);
    assert_eq!(
        response["data"]["me"],
        json!({ "username": "alice", "favouriteGenre": "fantasy" })
    );
}

// ============================================================================
// Identity resolution
// ============================================================================

#[tokio::test]
async fn bearer_identity_resolves_for_valid_tokens_only() {
    let (_schema, db, auth) = test_env().await;
    let user = register_alice(&auth).await;

    let token = auth.issue_token(&user.0).expect("issue");
    let resolved = resolve_current_user(&auth, &db, &token).await;
    assert_eq!(resolved.map(|u| u.0.id), Some(user.0.id.clone()));

    // Structurally malformed credential: anonymous, not a failure
    assert!(resolve_current_user(&auth, &db, "not.a.jwt").await.is_none());

    // Token signed with a different secret: anonymous
    let other = AuthService::new(
        db.clone(),
        AuthConfig {
            jwt_secret: "some-other-secret".to_string(),
            access_token_lifetime: 3600,
            bcrypt_cost: 4,
        },
    );
    let forged = other.issue_token(&user.0).expect("issue");
    assert!(resolve_current_user(&auth, &db, &forged).await.is_none());

    // Well-signed token whose subject has no user row: anonymous
    let ghost = UserRecord {
        id: "no-such-id".to_string(),
        username: "ghost".to_string(),
        favourite_genre: "horror".to_string(),
        password_hash: String::new(),
        created_at: String::new(),
    };
    let orphaned = auth.issue_token(&ghost).expect("issue");
    assert!(resolve_current_user(&auth, &db, &orphaned).await.is_none());
}

// ============================================================================
// User creation and login
// ============================================================================

#[tokio::test]
async fn create_user_then_login_issues_a_verifiable_token() {
    let (schema, _db, auth) = test_env().await;

    let create = r#"mutation {
        createUser(username: "alice", favouriteGenre: "fantasy", password: "secret") {
            username favouriteGenre
        }
    }"#;
    let response = execute(&schema, create, None).await;
    assert_no_errors(&response);
    assert_eq!(
        response["data"]["createUser"],
        json!({ "username": "alice", "favouriteGenre": "fantasy" })
    );

    let login = r#"mutation { login(username: "alice", password: "secret") { value } }"#;
    let response = execute(&schema, login, None).await;
    assert_no_errors(&response);
    let token = response["data"]["login"]["value"]
        .as_str()
        .expect("token issued");

    let claims = auth.validate_access_token(token).expect("valid token");
    assert_eq!(claims.username, "alice");
}

#[tokio::test]
async fn login_rejects_wrong_password_and_unknown_user() {
    let (schema, _db, auth) = test_env().await;
    register_alice(&auth).await;

    let wrong = r#"mutation { login(username: "alice", password: "wrong") { value } }"#;
    let response = execute(&schema, wrong, None).await;
    assert_eq!(error_code(&response), "INVALID_CREDENTIALS");

    let unknown = r#"mutation { login(username: "mallory", password: "secret") { value } }"#;
    let response = execute(&schema, unknown, None).await;
    assert_eq!(error_code(&response), "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn duplicate_username_is_rejected_with_the_offending_field() {
    let (schema, _db, auth) = test_env().await;
    register_alice(&auth).await;

    let create = r#"mutation {
        createUser(username: "alice", favouriteGenre: "horror", password: "other") { username }
    }"#;
    let response = execute(&schema, create, None).await;

    assert_eq!(error_code(&response), "BAD_USER_INPUT");
    assert_eq!(
        response["errors"][0]["extensions"]["invalidArgs"],
        "username"
    );
}
