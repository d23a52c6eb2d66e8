//! Book domain methods on Repository

use serde::Deserialize;

use super::Repository;
use crate::{
    error::{AppError, AppResult},
    models::Book,
};

/// Sort keys accepted by `GET /data_buku?_sort=`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    Id,
    Judul,
    Tahun,
}

impl Repository {
    /// List all books, in insertion order or stably sorted ascending
    pub async fn books_list(&self, sort: Option<SortField>) -> Vec<Book> {
        let mut books: Vec<Book> = self.books.read().await.values().cloned().collect();
        match sort {
            Some(SortField::Id) => books.sort_by(|a, b| a.id.cmp(&b.id)),
            Some(SortField::Judul) => books.sort_by(|a, b| a.judul.cmp(&b.judul)),
            Some(SortField::Tahun) => books.sort_by_key(|b| b.tahun),
            None => {}
        }
        books
    }

    pub async fn books_get(&self, id: &str) -> AppResult<Book> {
        self.books
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))
    }

    /// Insert a new book; the id must be free
    pub async fn books_create(&self, book: Book) -> AppResult<Book> {
        let mut books = self.books.write().await;
        if books.contains_key(&book.id) {
            return Err(AppError::Conflict(format!("Book {} already exists", book.id)));
        }
        let mut next = books.clone();
        next.insert(book.id.clone(), book.clone());
        self.commit(&mut books, next).await?;
        Ok(book)
    }

    /// Full replace of the book at `id`, keeping its position
    pub async fn books_replace(&self, id: &str, mut book: Book) -> AppResult<Book> {
        let mut books = self.books.write().await;
        let mut next = books.clone();
        let slot = next
            .get_mut(id)
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))?;
        book.id = id.to_string();
        *slot = book.clone();
        self.commit(&mut books, next).await?;
        Ok(book)
    }

    /// Remove the book at `id`, preserving the order of the others
    pub async fn books_delete(&self, id: &str) -> AppResult<()> {
        let mut books = self.books.write().await;
        let mut next = books.clone();
        if next.shift_remove(id).is_none() {
            return Err(AppError::NotFound(format!("Book {} not found", id)));
        }
        self.commit(&mut books, next).await
    }
}
