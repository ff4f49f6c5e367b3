//! # Book Catalog
//!
//! The operator's ordered book list. Every edit writes the whole list to the
//! store before the in-memory copy changes, so a failed write leaves both
//! sides as they were.

use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::keys;
use crate::models::{Book, BookDraft};
use crate::traits::SessionStore;

pub struct Catalog {
    store: Arc<dyn SessionStore>,
    books: Vec<Book>,
}

impl Catalog {
    /// Loads the persisted list, or starts empty.
    pub fn load(store: Arc<dyn SessionStore>) -> Result<Self> {
        let books = match store.get(keys::BOOKS)? {
            Some(raw) => serde_json::from_str(&raw)?,
            None => Vec::new(),
        };
        Ok(Self { store, books })
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Appends `book`. Non-finite numbers are refused since JSON cannot hold
    /// them and the stored list would stop loading.
    pub fn add(&mut self, book: Book) -> Result<()> {
        let finite = book.review.stars.is_finite()
            && book.platforms.iter().all(|p| p.price.is_finite());
        if !finite {
            return Err(AppError::ValidationError(
                "prices and ratings must be finite numbers".into(),
            ));
        }

        let mut next = self.books.clone();
        next.push(book);
        self.replace(next)
    }

    /// Validates an entry-form draft and appends the resulting book.
    pub fn add_draft(&mut self, draft: BookDraft) -> Result<()> {
        let book = draft.into_book()?;
        self.add(book)
    }

    pub fn remove(&mut self, index: usize) -> Result<Book> {
        if index >= self.books.len() {
            return Err(AppError::ValidationError(format!(
                "no book at position {index}"
            )));
        }
        let mut next = self.books.clone();
        let removed = next.remove(index);
        self.replace(next)?;
        Ok(removed)
    }

    pub fn clear(&mut self) -> Result<()> {
        self.replace(Vec::new())
    }

    fn replace(&mut self, books: Vec<Book>) -> Result<()> {
        self.store.set(keys::BOOKS, &serde_json::to_string(&books)?)?;
        self.books = books;
        Ok(())
    }
}
