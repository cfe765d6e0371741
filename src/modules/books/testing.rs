//! In-memory doubles for controller tests.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bookshelf_http::{StatusCode, TransportError};

use super::list::RefreshSignal;
use super::models::{Book, BookId, NewBook, Status};
use super::transport::BookTransport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    List,
    Get,
    Create,
    Update,
    Delete,
}

impl Op {
    fn method(self) -> &'static str {
        match self {
            Op::List | Op::Get => "GET",
            Op::Create => "POST",
            Op::Update => "PUT",
            Op::Delete => "DELETE",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List,
    Get(BookId),
    Create(NewBook),
    Update(BookId, NewBook),
    Delete(BookId),
}

/// Book resource held in memory, recording every call it receives.
#[derive(Default)]
pub struct FakeTransport {
    books: Mutex<Vec<Book>>,
    calls: Mutex<Vec<Call>>,
    failing: Mutex<HashSet<Op>>,
    stalled: Mutex<HashSet<Op>>,
    next_id: AtomicUsize,
}

impl FakeTransport {
    pub fn with_books(books: Vec<Book>) -> Arc<Self> {
        Arc::new(Self {
            books: Mutex::new(books),
            ..Self::default()
        })
    }

    /// Make every later `op` call fail with a 500.
    pub fn fail(&self, op: Op) {
        self.failing.lock().unwrap().insert(op);
    }

    /// Make every later `op` call hang without ever answering.
    pub fn stall(&self, op: Op) {
        self.stalled.lock().unwrap().insert(op);
    }

    pub fn recover(&self) {
        self.failing.lock().unwrap().clear();
        self.stalled.lock().unwrap().clear();
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn books(&self) -> Vec<Book> {
        self.books.lock().unwrap().clone()
    }

    fn record(&self, op: Op, call: Call) -> Result<(), TransportError> {
        self.calls.lock().unwrap().push(call);
        if self.failing.lock().unwrap().contains(&op) {
            return Err(status_error(op, StatusCode::INTERNAL_SERVER_ERROR));
        }
        Ok(())
    }
}

fn status_error(op: Op, status: StatusCode) -> TransportError {
    TransportError::Status {
        method: op.method(),
        url: "memory://books".to_string(),
        status,
    }
}

fn persisted(id: BookId, book: &NewBook) -> Book {
    Book {
        id,
        title: book.title.clone(),
        author: book.author.clone(),
        genre: book.genre.clone(),
        published_year: book.published_year,
        status: book.status,
        image: book.image.clone(),
    }
}

#[async_trait]
impl BookTransport for FakeTransport {
    async fn list(&self) -> Result<Vec<Book>, TransportError> {
        self.record(Op::List, Call::List)?;
        if self.stalled.lock().unwrap().contains(&Op::List) {
            std::future::pending::<()>().await;
        }
        Ok(self.books())
    }

    async fn get(&self, id: &BookId) -> Result<Book, TransportError> {
        self.record(Op::Get, Call::Get(id.clone()))?;
        self.books()
            .into_iter()
            .find(|book| &book.id == id)
            .ok_or_else(|| status_error(Op::Get, StatusCode::NOT_FOUND))
    }

    async fn create(&self, book: &NewBook) -> Result<Book, TransportError> {
        self.record(Op::Create, Call::Create(book.clone()))?;
        let n = self.next_id.fetch_add(1, Ordering::SeqCst);
        let created = persisted(BookId::new(format!("new-{n}")), book);
        self.books.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: &BookId, book: &NewBook) -> Result<Book, TransportError> {
        self.record(Op::Update, Call::Update(id.clone(), book.clone()))?;
        let mut books = self.books.lock().unwrap();
        let slot = books
            .iter_mut()
            .find(|existing| &existing.id == id)
            .ok_or_else(|| status_error(Op::Update, StatusCode::NOT_FOUND))?;
        *slot = persisted(id.clone(), book);
        Ok(slot.clone())
    }

    async fn delete(&self, id: &BookId) -> Result<(), TransportError> {
        self.record(Op::Delete, Call::Delete(id.clone()))?;
        let mut books = self.books.lock().unwrap();
        let before = books.len();
        books.retain(|book| &book.id != id);
        if books.len() == before {
            return Err(status_error(Op::Delete, StatusCode::NOT_FOUND));
        }
        Ok(())
    }
}

/// Counts refresh requests instead of fetching anything.
#[derive(Default)]
pub struct CountingRefresh {
    count: AtomicUsize,
}

impl CountingRefresh {
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RefreshSignal for CountingRefresh {
    async fn request_refresh(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }
}

pub fn book(id: &str, title: &str, author: &str, genre: &str) -> Book {
    Book {
        id: BookId::from(id),
        title: title.to_string(),
        author: author.to_string(),
        genre: genre.to_string(),
        published_year: 2000,
        status: Status::Available,
        image: format!("http://covers.test/{id}.jpg"),
    }
}

pub fn shelf() -> Vec<Book> {
    vec![
        book("b1", "Dune", "Frank Herbert", "SciFi"),
        book("b2", "Emma", "Jane Austen", "Classic"),
        book("b3", "Neuromancer", "William Gibson", "Cyberpunk"),
    ]
}
