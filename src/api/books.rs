//! `data_buku` collection endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::{Book, BookDraft},
    repository::SortField,
    validation::check_fields,
    ServerState,
};

/// Query parameters for listing books
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Ascending sort key; absent means insertion order
    #[serde(rename = "_sort")]
    pub sort: Option<SortField>,
}

/// Apply the field rules the client applies, minus remote uniqueness
fn check_book(book: &Book) -> AppResult<()> {
    let errors = check_fields(&BookDraft::from(book));
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(errors))
    }
}

/// List all books
pub async fn list_books(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> Json<Vec<Book>> {
    Json(state.repository.books_list(query.sort).await)
}

/// Get one book
pub async fn get_book(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Book>> {
    Ok(Json(state.repository.books_get(&id).await?))
}

/// Create a book
pub async fn create_book(
    State(state): State<ServerState>,
    Json(book): Json<Book>,
) -> AppResult<(StatusCode, Json<Book>)> {
    check_book(&book)?;
    let created = state.repository.books_create(book).await?;
    tracing::info!("Created book {}", created.id);
    Ok((StatusCode::CREATED, Json(created)))
}

/// Replace a book; the id in the path wins over the body
pub async fn update_book(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(book): Json<Book>,
) -> AppResult<Json<Book>> {
    check_book(&book)?;
    let updated = state.repository.books_replace(&id, book).await?;
    tracing::info!("Updated book {}", updated.id);
    Ok(Json(updated))
}

/// Delete a book
pub async fn delete_book(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.repository.books_delete(&id).await?;
    tracing::info!("Deleted book {}", id);
    Ok(StatusCode::NO_CONTENT)
}
