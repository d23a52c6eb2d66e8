//! Draft state and submit sequence shared by the create and edit forms

use std::future::Future;

use super::{FormOutcome, FormPhase, Notification, Notifier};
use crate::{
    error::{AppError, AppResult},
    models::{Book, BookDraft, Field},
    validation::{BookRules, FieldErrors},
};

#[derive(Debug, Clone, Default)]
pub(crate) struct FormState {
    pub draft: BookDraft,
    pub errors: FieldErrors,
    pub phase: FormPhase,
}

impl FormState {
    pub fn seeded(draft: BookDraft) -> Self {
        Self {
            draft,
            ..Self::default()
        }
    }

    /// Editing a field clears only that field's error
    pub fn set_field(&mut self, field: Field, value: String) {
        self.draft.set(field, value);
        self.errors.clear(field);
        self.phase = FormPhase::Editing;
    }

    /// Validate, then persist with `persist`. Notifies on success and on
    /// remote failure; field errors are kept on the form instead.
    pub async fn submit<F, Fut>(
        &mut self,
        rules: BookRules<'_>,
        notifier: &dyn Notifier,
        success: Notification,
        persist: F,
    ) -> FormOutcome
    where
        F: FnOnce(Book) -> Fut,
        Fut: Future<Output = AppResult<Book>>,
    {
        self.phase = FormPhase::Validating;
        let errors = match rules.validate(&self.draft).await {
            Ok(errors) => errors,
            Err(e) => return self.fail(notifier, e),
        };

        if !errors.is_empty() {
            self.errors = errors.clone();
            self.phase = FormPhase::Invalid;
            return FormOutcome::Invalid(errors);
        }

        let Some(book) = self.draft.to_book() else {
            return self.fail(
                notifier,
                AppError::Internal(format!("Validated draft {} does not convert", self.draft.id)),
            );
        };

        self.phase = FormPhase::Submitting;
        match persist(book).await {
            Ok(saved) => {
                tracing::info!("Book {} saved", saved.id);
                notifier.notify(success);
                self.errors = FieldErrors::new();
                self.phase = FormPhase::Idle;
                FormOutcome::Saved(saved)
            }
            Err(e) => self.fail(notifier, e),
        }
    }

    fn fail(&mut self, notifier: &dyn Notifier, error: AppError) -> FormOutcome {
        tracing::error!("Submitting book {} failed: {}", self.draft.id, error);
        notifier.notify(Notification::unexpected_error());
        self.phase = FormPhase::Editing;
        FormOutcome::Failed(error)
    }
}
