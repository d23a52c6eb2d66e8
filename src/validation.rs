//! Book field rules.
//!
//! Every rule runs on every submit and all failures are reported together.
//! The only rule that needs the network is id uniqueness, which the create
//! flow checks against the full remote collection.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::borrow::Cow;
use std::collections::BTreeMap;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{
    error::AppResult,
    models::{BookDraft, Field, Genre, SortBy},
    store::BookStore,
};

/// Letters, digits and whitespace. Emptiness is reported by the required
/// rule, so an empty value matches here.
pub static TEXT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9\s]*$").expect("text pattern is a valid regex"));

pub const MSG_ID_NOT_UNIQUE: &str = "ID harus unik";

pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}

pub fn valid_year(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::new("required").with_message(Cow::Borrowed("Tahun harus diisi")));
    }
    if value.parse::<i32>().is_err() {
        return Err(ValidationError::new("number")
            .with_message(Cow::Borrowed("Tahun harus dalam bentuk angka")));
    }
    Ok(())
}

pub fn known_genre(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required").with_message(Cow::Borrowed("Genre harus diisi")));
    }
    if value.parse::<Genre>().is_err() {
        return Err(ValidationError::new("genre").with_message(Cow::Borrowed("Genre tidak dikenal")));
    }
    Ok(())
}

/// Field-keyed error messages; one message per failing field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors(BTreeMap<Field, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    /// Keeps the first message recorded for a field
    pub fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    pub fn clear(&mut self, field: Field) {
        self.0.remove(&field);
    }

    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(f, m)| (*f, m.as_str()))
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut out = FieldErrors::new();
        for (name, errs) in errors.field_errors() {
            let name: &str = &name;
            let Ok(field) = name.parse::<Field>() else {
                tracing::warn!("Validation error on unknown field {}", name);
                continue;
            };
            if let Some(err) = errs.first() {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field));
                out.insert(field, message);
            }
        }
        out
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self.iter().map(|(field, msg)| format!("{}: {}", field, msg)).collect();
        write!(f, "{}", parts.join("; "))
    }
}

/// Synchronous field rules only
pub fn check_fields(draft: &BookDraft) -> FieldErrors {
    match draft.validate() {
        Ok(()) => FieldErrors::new(),
        Err(errors) => errors.into(),
    }
}

/// Rule set applied by a form on submit
pub struct BookRules<'a> {
    unique_against: Option<&'a dyn BookStore>,
}

impl<'a> BookRules<'a> {
    /// Rules for a new record: field rules plus remote id uniqueness
    pub fn for_create(store: &'a dyn BookStore) -> Self {
        Self {
            unique_against: Some(store),
        }
    }

    /// Rules for an existing record, whose id is fixed
    pub fn for_update() -> Self {
        Self { unique_against: None }
    }

    /// Run every rule and return the complete error map.
    ///
    /// A failure to fetch the collection for the uniqueness check is a
    /// remote error, not a field error.
    pub async fn validate(&self, draft: &BookDraft) -> AppResult<FieldErrors> {
        let mut errors = check_fields(draft);

        if let Some(store) = self.unique_against {
            if !errors.contains(Field::Id) {
                let books = store.list(SortBy::None).await?;
                if books.iter().any(|b| b.id == draft.id) {
                    errors.insert(Field::Id, MSG_ID_NOT_UNIQUE);
                }
            }
        }

        if !errors.is_empty() {
            tracing::debug!("Draft {:?} rejected: {}", draft.id, errors);
        }
        Ok(errors)
    }
}
