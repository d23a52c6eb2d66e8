//! List view controller: owns the application state

use std::sync::Arc;

use super::{
    Confirm, ConfirmPrompt, CreateForm, EditForm, FormOutcome, Notification, Notifier,
};
use crate::{
    error::{AppError, AppResult},
    models::{Book, Field, SortBy},
    store::BookStore,
};

/// Everything the page shows
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Last successful listing, replaced wholesale on every fetch
    pub books: Vec<Book>,
    pub search_book: String,
    pub sort_by: SortBy,
}

/// The form currently open over the list, if any
#[derive(Debug, Clone, Default)]
pub enum Modal {
    #[default]
    Closed,
    Create(CreateForm),
    Edit(EditForm),
}

/// A displayed row; `number` counts from 1 over the filtered rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Row<'a> {
    pub number: usize,
    pub book: &'a Book,
}

#[derive(Debug)]
pub enum DeleteOutcome {
    Declined,
    Deleted,
    /// Remote failure; logged only, the list keeps its stale rows
    Failed(AppError),
}

/// True when `book` matches the free-text search (title or author,
/// case-insensitive). An empty search matches everything.
pub fn matches_search(book: &Book, search: &str) -> bool {
    let needle = search.to_lowercase();
    book.judul.to_lowercase().contains(&needle) || book.pengarang.to_lowercase().contains(&needle)
}

pub struct ListView {
    store: Arc<dyn BookStore>,
    notifier: Arc<dyn Notifier>,
    confirm: Arc<dyn Confirm>,
    state: AppState,
    modal: Modal,
}

impl ListView {
    pub fn new(
        store: Arc<dyn BookStore>,
        notifier: Arc<dyn Notifier>,
        confirm: Arc<dyn Confirm>,
    ) -> Self {
        Self {
            store,
            notifier,
            confirm,
            state: AppState::default(),
            modal: Modal::Closed,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn modal(&self) -> &Modal {
        &self.modal
    }

    /// Re-fetch the whole collection with the current sort key.
    ///
    /// On failure the error is logged and the previous rows stay in place.
    /// Returns whether the rows were replaced.
    pub async fn refresh(&mut self) -> bool {
        match self.store.list(self.state.sort_by).await {
            Ok(books) => {
                tracing::debug!("Fetched {} books", books.len());
                self.state.books = books;
                true
            }
            Err(e) => {
                tracing::warn!("Failed to fetch books: {}", e);
                false
            }
        }
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.state.search_book = search.into();
    }

    /// Sorting happens remotely, so a new key triggers a re-fetch
    pub async fn set_sort(&mut self, sort_by: SortBy) -> bool {
        self.state.sort_by = sort_by;
        self.refresh().await
    }

    /// Rows to render, in fetched order
    pub fn visible_books(&self) -> Vec<Row<'_>> {
        self.state
            .books
            .iter()
            .filter(|b| matches_search(b, &self.state.search_book))
            .enumerate()
            .map(|(i, book)| Row { number: i + 1, book })
            .collect()
    }

    pub fn open_create(&mut self) {
        self.modal = Modal::Create(CreateForm::new());
    }

    /// Open the edit form seeded with the listed record `id`
    pub fn open_edit(&mut self, id: &str) -> AppResult<()> {
        let book = self
            .state
            .books
            .iter()
            .find(|b| b.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Book {} is not listed", id)))?;
        self.modal = Modal::Edit(EditForm::new(book));
        Ok(())
    }

    pub fn close_form(&mut self) {
        self.modal = Modal::Closed;
    }

    pub fn set_form_field(&mut self, field: Field, value: impl Into<String>) -> AppResult<()> {
        match &mut self.modal {
            Modal::Create(form) => form.set_field(field, value),
            Modal::Edit(form) => form.set_field(field, value),
            Modal::Closed => return Err(AppError::BadRequest("No form is open".to_string())),
        }
        Ok(())
    }

    /// Submit the open form. A saved record closes the form and reloads
    /// the list; anything else leaves the form open.
    pub async fn submit_form(&mut self) -> AppResult<FormOutcome> {
        let store = self.store.as_ref();
        let notifier = self.notifier.as_ref();
        let outcome = match &mut self.modal {
            Modal::Create(form) => form.submit(store, notifier).await,
            Modal::Edit(form) => form.submit(store, notifier).await,
            Modal::Closed => return Err(AppError::BadRequest("No form is open".to_string())),
        };

        if outcome.is_saved() {
            self.modal = Modal::Closed;
            self.refresh().await;
        }
        Ok(outcome)
    }

    /// Delete `id` after an explicit confirmation
    pub async fn delete_book(&mut self, id: &str) -> DeleteOutcome {
        if !self.confirm.confirm(&ConfirmPrompt::delete_book()).await {
            tracing::debug!("Deletion of book {} declined", id);
            return DeleteOutcome::Declined;
        }

        match self.store.delete(id).await {
            Ok(()) => {
                tracing::info!("Book {} deleted", id);
                self.notifier.notify(Notification::success(
                    "Buku Berhasil Dihapus",
                    "Buku dihapus dari data",
                ));
                self.refresh().await;
                DeleteOutcome::Deleted
            }
            Err(e) => {
                tracing::warn!("Failed to delete book {}: {}", id, e);
                DeleteOutcome::Failed(e)
            }
        }
    }
}
