//! Edit form controller

use super::{form::FormState, FormOutcome, FormPhase, Notification, Notifier};
use crate::{
    models::{Book, BookDraft, Field},
    store::BookStore,
    validation::{BookRules, FieldErrors},
};

/// In-place edit of an existing book. The id is fixed.
#[derive(Debug, Clone)]
pub struct EditForm {
    id: String,
    state: FormState,
}

impl EditForm {
    pub fn new(book: &Book) -> Self {
        Self {
            id: book.id.clone(),
            state: FormState::seeded(BookDraft::from(book)),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn draft(&self) -> &BookDraft {
        &self.state.draft
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.state.errors
    }

    pub fn phase(&self) -> FormPhase {
        self.state.phase
    }

    /// Edits to the id are ignored
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        if field == Field::Id {
            tracing::debug!("Ignoring id edit on book {}", self.id);
            return;
        }
        self.state.set_field(field, value.into());
    }

    /// Validate and replace the record at this form's id
    pub async fn submit(&mut self, store: &dyn BookStore, notifier: &dyn Notifier) -> FormOutcome {
        let success = Notification::success(
            "Buku Berhasil Diperbarui",
            "Data buku telah diperbarui",
        );
        let id = self.id.as_str();
        self.state
            .submit(BookRules::for_update(), notifier, success, |book| async move {
                store.update(id, &book).await
            })
            .await
    }
}
