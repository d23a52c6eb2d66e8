//! Controllers behind the book list page.
//!
//! The list controller owns all application state. Forms report a
//! [`FormOutcome`] and leave refresh and close to their parent.

pub mod create;
pub mod edit;
mod form;
pub mod list;

use async_trait::async_trait;

use crate::{error::AppError, models::Book, validation::FieldErrors};

pub use create::CreateForm;
pub use edit::EditForm;
pub use list::{AppState, DeleteOutcome, ListView, Modal, Row};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

/// A user-facing notification (success or generic error dialog)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub text: String,
}

impl Notification {
    pub fn success(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            title: title.into(),
            text: text.into(),
        }
    }

    /// The generic dialog shown for any remote failure of a mutation
    pub fn unexpected_error() -> Self {
        Self {
            kind: NotificationKind::Error,
            title: "Error".to_string(),
            text: "Terjadi kesalahan yang tidak terduga".to_string(),
        }
    }
}

/// Sink for notifications
#[cfg_attr(test, mockall::automock)]
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Blocking yes/cancel question
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmPrompt {
    pub title: String,
    pub text: String,
    pub confirm_label: String,
    pub cancel_label: String,
}

impl ConfirmPrompt {
    pub fn delete_book() -> Self {
        Self {
            title: "Hapus Buku?".to_string(),
            text: "Apakah anda yakin ingin menghapus buku?".to_string(),
            confirm_label: "Ya".to_string(),
            cancel_label: "Batal".to_string(),
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Confirm: Send + Sync {
    /// Returns true only on an explicit yes
    async fn confirm(&self, prompt: &ConfirmPrompt) -> bool;
}

/// Form lifecycle: `Idle → Editing → Validating → (Submitting → Idle) | (Invalid → Editing)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormPhase {
    #[default]
    Idle,
    Editing,
    Validating,
    Submitting,
    Invalid,
}

/// Result of a form submit
#[derive(Debug)]
pub enum FormOutcome {
    /// Persisted remotely; the parent refreshes and closes the form
    Saved(Book),
    /// Field rules failed; nothing was sent
    Invalid(FieldErrors),
    /// Remote failure; a generic error was shown and the form stays open
    Failed(AppError),
}

impl FormOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, FormOutcome::Saved(_))
    }
}
