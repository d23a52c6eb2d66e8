//! Data models for Data Buku

pub mod book;
pub mod enums;

// Re-export commonly used types
pub use book::{Book, BookDraft, Field};
pub use enums::{Genre, SortBy};
