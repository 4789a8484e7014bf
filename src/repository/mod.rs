//! Repository layer for in-memory storage

pub mod books;

/// Main repository struct holding every store
#[derive(Clone, Default)]
pub struct Repository {
    pub books: books::BooksRepository,
}

impl Repository {
    /// Create a repository with empty stores
    pub fn new() -> Self {
        Self::default()
    }
}
