//! Storage for the development backend: an in-memory collection,
//! optionally mirrored to a json-server style `db.json`

pub mod books;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::{error::AppResult, models::Book};

pub use books::SortField;

/// On-disk layout, compatible with json-server
#[derive(Debug, Default, Serialize, Deserialize)]
struct Database {
    #[serde(default)]
    data_buku: Vec<Book>,
}

/// Main repository struct holding the book collection in insertion order
#[derive(Clone, Default)]
pub struct Repository {
    books: Arc<RwLock<IndexMap<String, Book>>>,
    db_path: Option<PathBuf>,
}

impl Repository {
    /// Empty, memory-only repository
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Repository backed by `path`. A missing file starts an empty
    /// collection that is written on the first mutation.
    pub async fn open(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref().to_path_buf();
        let database = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice::<Database>(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("{} does not exist yet, starting empty", path.display());
                Database::default()
            }
            Err(e) => return Err(e.into()),
        };

        let mut books = IndexMap::with_capacity(database.data_buku.len());
        for book in database.data_buku {
            if let Some(previous) = books.insert(book.id.clone(), book) {
                tracing::warn!("Duplicate book id {} in {}, keeping the last", previous.id, path.display());
            }
        }
        tracing::info!("Loaded {} books from {}", books.len(), path.display());

        Ok(Self {
            books: Arc::new(RwLock::new(books)),
            db_path: Some(path),
        })
    }

    /// Persist `next`, then make it the live collection. A failed write
    /// leaves `live` untouched.
    async fn commit(
        &self,
        live: &mut IndexMap<String, Book>,
        next: IndexMap<String, Book>,
    ) -> AppResult<()> {
        self.persist(&next).await?;
        *live = next;
        Ok(())
    }

    /// Write the collection to the backing file, if any.
    /// Called with the write lock held so files never interleave.
    async fn persist(&self, books: &IndexMap<String, Book>) -> AppResult<()> {
        let Some(path) = &self.db_path else {
            return Ok(());
        };
        let database = Database {
            data_buku: books.values().cloned().collect(),
        };
        let bytes = serde_json::to_vec_pretty(&database)?;
        tokio::fs::write(path, bytes).await?;
        tracing::debug!("Persisted {} books to {}", books.len(), path.display());
        Ok(())
    }
}
