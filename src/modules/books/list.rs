//! Collection listing and search.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use bookshelf_http::TransportError;
use tokio::sync::RwLock;

use super::models::Book;
use super::transport::BookTransport;

/// Something that re-fetches the collection after a mutation.
#[async_trait]
pub trait RefreshSignal: Send + Sync {
    async fn request_refresh(&self);
}

/// Counts one refresh as in flight until dropped, including when the
/// refresh future itself is dropped mid-request.
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Owns the last fetched collection and derives filtered views from it.
///
/// The collection is only ever replaced wholesale, so overlapping refreshes
/// settle on whichever finished last.
pub struct ListController {
    transport: Arc<dyn BookTransport>,
    books: RwLock<Vec<Book>>,
    in_flight: AtomicUsize,
}

impl ListController {
    pub fn new(transport: Arc<dyn BookTransport>) -> Self {
        Self {
            transport,
            books: RwLock::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
        }
    }

    /// Fetch the collection and replace the stored one.
    ///
    /// On failure the previous collection is kept and the error is only logged;
    /// it is returned for callers that want to know, never surfaced as a notice.
    pub async fn refresh(&self) -> Result<usize, TransportError> {
        let _in_flight = InFlight::enter(&self.in_flight);

        let result = self.transport.list().await;

        let mut books = self.books.write().await;
        match result {
            Ok(fetched) => {
                tracing::debug!(count = fetched.len(), "collection refreshed");
                *books = fetched;
                Ok(books.len())
            }
            Err(err) => {
                tracing::warn!(error = %err, kept = books.len(), "collection refresh failed");
                Err(err)
            }
        }
    }

    pub async fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    pub async fn books(&self) -> Vec<Book> {
        self.books.read().await.clone()
    }

    /// Books matching `query`, in collection order.
    pub async fn filtered(&self, query: &str) -> Vec<Book> {
        let books = self.books.read().await;
        filter_books(&books, query).into_iter().cloned().collect()
    }
}

#[async_trait]
impl RefreshSignal for ListController {
    async fn request_refresh(&self) {
        let _ = self.refresh().await;
    }
}

/// Case-insensitive substring match of `query` against title, author or genre.
/// An empty query keeps everything.
pub fn filter_books<'a>(books: &'a [Book], query: &str) -> Vec<&'a Book> {
    let needle = query.to_lowercase();
    books
        .iter()
        .filter(|book| {
            needle.is_empty()
                || book.title.to_lowercase().contains(&needle)
                || book.author.to_lowercase().contains(&needle)
                || book.genre.to_lowercase().contains(&needle)
        })
        .collect()
}
