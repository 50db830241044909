//! SQLite helper utilities for type conversion
//!
//! SQLite has no native array type, so list columns (book genres) are stored
//! as JSON text; timestamps are stored as ISO-8601 strings.

use chrono::Utc;
use serde::{Serialize, de::DeserializeOwned};

/// Current time as an ISO-8601 string for SQLite storage
#[inline]
pub fn now_iso8601() -> String {
    Utc::now().to_rfc3339()
}

/// Serialize a slice to a JSON string for SQLite storage
#[inline]
pub fn vec_to_json<T: Serialize>(v: &[T]) -> String {
    serde_json::to_string(v).unwrap_or_else(|_| "[]".to_string())
}

/// Deserialize a JSON string from SQLite to a Vec
#[inline]
pub fn json_to_vec<T: DeserializeOwned>(s: &str) -> Vec<T> {
    serde_json::from_str(s).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn genre_list_round_trips_through_json_text() {
        let genres = vec!["fantasy".to_string(), "comedy".to_string()];
        let json = vec_to_json(&genres);
        assert_eq!(json_to_vec::<String>(&json), genres);
    }

    #[test]
    fn invalid_json_decodes_to_empty_list() {
        assert_eq!(json_to_vec::<String>("not json"), Vec::<String>::new());
        assert_eq!(json_to_vec::<String>(""), Vec::<String>::new());
    }
}
