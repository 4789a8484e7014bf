//! Book model

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Order in which payload fields are checked, so the first reported
/// validation error is stable.
pub const BOOK_FIELD_ORDER: [&str; 3] = ["title", "author", "published_year"];

/// Book record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Book {
    /// Identifier assigned by the store, never reused
    pub id: i64,
    pub title: String,
    pub author: String,
    pub published_year: i64,
}

/// Create book request
///
/// Missing or null fields decode to their empty value and are reported by
/// validation.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct CreateBook {
    #[validate(length(min = 1, message = "title is required"))]
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[validate(length(min = 1, message = "author is required"))]
    #[serde(deserialize_with = "null_as_default")]
    pub author: String,
    #[validate(range(min = 1, message = "published year must be positive"))]
    #[serde(deserialize_with = "null_as_default")]
    pub published_year: i64,
}

/// Update book request (full replacement of the mutable fields)
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct UpdateBook {
    #[validate(length(min = 1, message = "title is required"))]
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[validate(length(min = 1, message = "author is required"))]
    #[serde(deserialize_with = "null_as_default")]
    pub author: String,
    #[validate(range(min = 1, message = "published year must be positive"))]
    #[serde(deserialize_with = "null_as_default")]
    pub published_year: i64,
}

/// Decode `null` the same way as an absent field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Book {
    /// Overwrite the mutable fields, keeping the identifier.
    pub fn apply(&mut self, data: &UpdateBook) {
        self.title.clone_from(&data.title);
        self.author.clone_from(&data.author);
        self.published_year = data.published_year;
    }
}

/// Books loaded at startup when `store.seed_sample_data` is enabled
pub fn sample_books() -> Vec<Book> {
    vec![
        Book {
            id: 1,
            title: "The Go Programming Language".to_string(),
            author: "Alan Donovan".to_string(),
            published_year: 2015,
        },
        Book {
            id: 2,
            title: "Clean Code".to_string(),
            author: "Robert Martin".to_string(),
            published_year: 2008,
        },
    ]
}
