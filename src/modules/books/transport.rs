//! Book resource calls, behind a trait so controllers can run without a network.

use std::time::Duration;

use async_trait::async_trait;
use bookshelf_http::{ResourceClient, TransportError};
use bookshelf_kernel::settings::ApiSettings;

use super::models::{Book, BookId, NewBook};

/// The five calls the catalog makes against the book resource.
#[async_trait]
pub trait BookTransport: Send + Sync {
    async fn list(&self) -> Result<Vec<Book>, TransportError>;

    async fn get(&self, id: &BookId) -> Result<Book, TransportError>;

    /// The server assigns the id of the returned book.
    async fn create(&self, book: &NewBook) -> Result<Book, TransportError>;

    async fn update(&self, id: &BookId, book: &NewBook) -> Result<Book, TransportError>;

    async fn delete(&self, id: &BookId) -> Result<(), TransportError>;
}

/// [`BookTransport`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: ResourceClient,
}

impl HttpTransport {
    pub fn new(api_url: &str, timeout: Option<Duration>) -> Result<Self, TransportError> {
        Ok(Self {
            client: ResourceClient::new(api_url, timeout)?,
        })
    }

    pub fn from_settings(api: &ApiSettings) -> Result<Self, TransportError> {
        Self::new(&api.base_url, api.request_timeout())
    }

    pub fn api_url(&self) -> &str {
        self.client.base_url().as_str()
    }
}

#[async_trait]
impl BookTransport for HttpTransport {
    async fn list(&self) -> Result<Vec<Book>, TransportError> {
        self.client.list().await
    }

    async fn get(&self, id: &BookId) -> Result<Book, TransportError> {
        self.client.get(id.as_str()).await
    }

    async fn create(&self, book: &NewBook) -> Result<Book, TransportError> {
        self.client.create(book).await
    }

    async fn update(&self, id: &BookId, book: &NewBook) -> Result<Book, TransportError> {
        self.client.update(id.as_str(), book).await
    }

    async fn delete(&self, id: &BookId) -> Result<(), TransportError> {
        self.client.delete(id.as_str()).await
    }
}
