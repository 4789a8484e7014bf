//! In-memory book store

use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, CreateBook, UpdateBook},
};

struct BookTable {
    books: BTreeMap<i64, Book>,
    next_id: i64,
}

/// Book storage guarded by a reader/writer lock.
///
/// Cloning yields another handle to the same store. Every read returns
/// owned copies, so callers can never reach the live map.
#[derive(Clone)]
pub struct BooksRepository {
    table: Arc<RwLock<BookTable>>,
}

impl Default for BooksRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl BooksRepository {
    /// Create an empty store; the first created book gets id 1
    pub fn new() -> Self {
        Self {
            table: Arc::new(RwLock::new(BookTable {
                books: BTreeMap::new(),
                next_id: 1,
            })),
        }
    }

    // No operation can panic while holding the guard, so a poisoned lock
    // still protects a consistent table.
    fn read(&self) -> RwLockReadGuard<'_, BookTable> {
        self.table.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, BookTable> {
        self.table.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// List all books, ordered by id
    pub fn list(&self) -> Vec<Book> {
        self.read().books.values().cloned().collect()
    }

    /// Number of stored books
    pub fn count(&self) -> usize {
        self.read().books.len()
    }

    /// Get book by ID
    pub fn get_by_id(&self, id: i64) -> AppResult<Book> {
        self.read()
            .books
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Book not found".to_string()))
    }

    /// Create a book with the next identifier
    pub fn create(&self, data: &CreateBook) -> Book {
        let mut table = self.write();
        let book = Book {
            id: table.next_id,
            title: data.title.clone(),
            author: data.author.clone(),
            published_year: data.published_year,
        };
        table.next_id += 1;
        table.books.insert(book.id, book.clone());
        book
    }

    /// Update a book in place
    pub fn update(&self, id: i64, data: &UpdateBook) -> AppResult<Book> {
        let mut table = self.write();
        let book = table
            .books
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound("Book not found".to_string()))?;
        book.apply(data);
        Ok(book.clone())
    }

    /// Delete a book; its id is never handed out again
    pub fn delete(&self, id: i64) -> AppResult<()> {
        self.write()
            .books
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound("Book not found".to_string()))
    }

    /// Insert books that already carry an id, moving the counter past them
    pub fn seed(&self, books: impl IntoIterator<Item = Book>) {
        let mut table = self.write();
        for book in books {
            table.next_id = table.next_id.max(book.id + 1);
            table.books.insert(book.id, book);
        }
    }
}
