//! Create form controller

use super::{form::FormState, FormOutcome, FormPhase, Notification, Notifier};
use crate::{
    models::{BookDraft, Field},
    store::BookStore,
    validation::{BookRules, FieldErrors},
};

/// Draft for a new book. The id must be unique in the remote store.
#[derive(Debug, Clone, Default)]
pub struct CreateForm {
    state: FormState,
}

impl CreateForm {
    pub fn new() -> Self {
        Self::default()
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

    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        self.state.set_field(field, value.into());
    }

    /// Validate (including the remote uniqueness check) and create
    pub async fn submit(&mut self, store: &dyn BookStore, notifier: &dyn Notifier) -> FormOutcome {
        let success = Notification::success("Berhasil Tambahkan Buku", "Buku tersimpan dalam data");
        self.state
            .submit(BookRules::for_create(store), notifier, success, |book| async move {
                store.create(&book).await
            })
            .await
    }
}
