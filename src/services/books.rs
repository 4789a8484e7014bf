//! Book catalog service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, CreateBook, UpdateBook, BOOK_FIELD_ORDER},
    repository::Repository,
};

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub fn list(&self) -> Vec<Book> {
        self.repository.books.list()
    }

    pub fn count(&self) -> usize {
        self.repository.books.count()
    }

    pub fn get_by_id(&self, id: i64) -> AppResult<Book> {
        self.repository.books.get_by_id(id)
    }

    /// Validate and create a book
    pub fn create(&self, data: &CreateBook) -> AppResult<Book> {
        data.validate()
            .map_err(|e| AppError::from_validation(&e, &BOOK_FIELD_ORDER))?;

        let book = self.repository.books.create(data);
        tracing::info!(book_id = book.id, "Book created");
        Ok(book)
    }

    /// Validate and update a book
    pub fn update(&self, id: i64, data: &UpdateBook) -> AppResult<Book> {
        data.validate()
            .map_err(|e| AppError::from_validation(&e, &BOOK_FIELD_ORDER))?;

        let book = self.repository.books.update(id, data)?;
        tracing::info!(book_id = id, "Book updated");
        Ok(book)
    }

    pub fn delete(&self, id: i64) -> AppResult<()> {
        self.repository.books.delete(id)?;
        tracing::info!(book_id = id, "Book deleted");
        Ok(())
    }
}
