//! Client for the remote book store (`data_buku` REST resource)

use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use std::time::Duration;

use crate::{
    config::AppConfig,
    error::{AppError, AppResult},
    models::{Book, SortBy},
};

/// The four operations of the remote book collection.
///
/// The remote store is authoritative; callers re-list after every mutation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Fetch every record, ordered ascending by `sort` on the remote side
    async fn list(&self, sort: SortBy) -> AppResult<Vec<Book>>;

    async fn create(&self, book: &Book) -> AppResult<Book>;

    /// Full replace of the record at `id`
    async fn update(&self, id: &str, book: &Book) -> AppResult<Book>;

    async fn delete(&self, id: &str) -> AppResult<()>;
}

/// `BookStore` over HTTP/JSON
#[derive(Clone)]
pub struct HttpBookStore {
    client: Client,
    collection: Url,
}

impl HttpBookStore {
    pub fn new(collection_url: &str, timeout: Duration) -> AppResult<Self> {
        let collection = Url::parse(collection_url)
            .map_err(|e| AppError::BadRequest(format!("Invalid store URL {}: {}", collection_url, e)))?;
        if collection.cannot_be_a_base() {
            return Err(AppError::BadRequest(format!(
                "Store URL {} cannot carry a record path",
                collection_url
            )));
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, collection })
    }

    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        Self::new(
            &config.collection_url(),
            Duration::from_secs(config.backend.timeout_secs),
        )
    }

    pub fn collection_url(&self) -> &Url {
        &self.collection
    }

    /// `{collection}/{id}`, with the id encoded as a single path segment
    fn record_url(&self, id: &str) -> Url {
        let mut url = self.collection.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(id);
        }
        url
    }

    fn check(response: Response) -> AppResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let url = response.url().to_string();
        tracing::warn!("Remote store responded {} for {}", status, url);
        Err(AppError::RemoteStatus { status, url })
    }
}

#[async_trait]
impl BookStore for HttpBookStore {
    async fn list(&self, sort: SortBy) -> AppResult<Vec<Book>> {
        let mut request = self.client.get(self.collection.clone());
        if let Some(key) = sort.query_value() {
            request = request.query(&[("_sort", key)]);
        }
        tracing::debug!("GET {} sort={:?}", self.collection, sort);

        let response = Self::check(request.send().await?)?;
        Ok(response.json().await?)
    }

    async fn create(&self, book: &Book) -> AppResult<Book> {
        tracing::debug!("POST {} id={}", self.collection, book.id);
        let response = self.client.post(self.collection.clone()).json(book).send().await?;
        let response = Self::check(response)?;
        Ok(response.json().await?)
    }

    async fn update(&self, id: &str, book: &Book) -> AppResult<Book> {
        let url = self.record_url(id);
        tracing::debug!("PUT {}", url);
        let response = self.client.put(url).json(book).send().await?;
        let response = Self::check(response)?;
        Ok(response.json().await?)
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        let url = self.record_url(id);
        tracing::debug!("DELETE {}", url);
        let response = self.client.delete(url).send().await?;
        Self::check(response)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> HttpBookStore {
        HttpBookStore::new("http://localhost:8000/data_buku", Duration::from_secs(1)).unwrap()
    }

    #[test]
    fn test_record_url_encodes_id_as_one_segment() {
        let store = store();
        assert_eq!(
            store.record_url("B 1").as_str(),
            "http://localhost:8000/data_buku/B%201"
        );
    }

    #[test]
    fn test_record_url_with_trailing_slash_collection() {
        let store = HttpBookStore::new("http://localhost:8000/data_buku/", Duration::from_secs(1)).unwrap();
        assert_eq!(store.record_url("B1").as_str(), "http://localhost:8000/data_buku/B1");
    }

    #[test]
    fn test_rejects_unusable_url() {
        assert!(HttpBookStore::new("not a url", Duration::from_secs(1)).is_err());
        assert!(HttpBookStore::new("mailto:someone@example.com", Duration::from_secs(1)).is_err());
    }
}
