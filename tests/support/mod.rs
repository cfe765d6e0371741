//! Fake book resource served over HTTP for integration tests.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Debug, Clone, PartialEq)]
pub struct Recorded {
    pub method: &'static str,
    pub path: String,
    pub body: Option<Value>,
}

#[derive(Default)]
struct Store {
    books: Vec<Value>,
    requests: Vec<Recorded>,
    fail_writes: bool,
}

/// In-memory book collection keyed by a document-style `_id`.
#[derive(Clone, Default)]
pub struct FakeCatalog {
    inner: Arc<Mutex<Store>>,
}

impl FakeCatalog {
    pub async fn seed(&self, id: &str, title: &str, author: &str, genre: &str) {
        self.inner.lock().await.books.push(json!({
            "_id": id,
            "title": title,
            "author": author,
            "genre": genre,
            "publishedYear": 2001,
            "status": "Available",
            "image": format!("http://covers.test/{id}.jpg"),
            "__v": 0
        }));
    }

    pub async fn fail_writes(&self) {
        self.inner.lock().await.fail_writes = true;
    }

    pub async fn requests(&self) -> Vec<Recorded> {
        self.inner.lock().await.requests.clone()
    }

    pub async fn count(&self, method: &str, path: &str) -> usize {
        self.requests()
            .await
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    /// Serve on an ephemeral local port and return the resource URL.
    pub async fn spawn(&self) -> String {
        let app = Router::new()
            .route("/books", get(list).post(create))
            .route("/books/{id}", get(fetch).put(update).delete(remove))
            .with_state(self.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/books", addr)
    }
}

fn record(state: &mut Store, method: &'static str, path: String, body: Option<Value>) {
    state.requests.push(Recorded { method, path, body });
}

async fn list(State(catalog): State<FakeCatalog>) -> Json<Vec<Value>> {
    let mut state = catalog.inner.lock().await;
    record(&mut state, "GET", "/books".into(), None);
    Json(state.books.clone())
}

async fn fetch(
    State(catalog): State<FakeCatalog>,
    Path(id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    let mut state = catalog.inner.lock().await;
    record(&mut state, "GET", format!("/books/{id}"), None);
    state
        .books
        .iter()
        .find(|b| b["_id"] == id.as_str())
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn create(
    State(catalog): State<FakeCatalog>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), StatusCode> {
    let mut state = catalog.inner.lock().await;
    record(&mut state, "POST", "/books".into(), Some(body.clone()));
    if state.fail_writes {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }

    let mut book = body;
    book["_id"] = json!(uuid::Uuid::now_v7().to_string());
    state.books.push(book.clone());
    Ok((StatusCode::CREATED, Json(book)))
}

async fn update(
    State(catalog): State<FakeCatalog>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    let mut state = catalog.inner.lock().await;
    record(&mut state, "PUT", format!("/books/{id}"), Some(body.clone()));
    if state.fail_writes {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }

    let slot = state
        .books
        .iter_mut()
        .find(|b| b["_id"] == id.as_str())
        .ok_or(StatusCode::NOT_FOUND)?;
    let mut book = body;
    book["_id"] = json!(id);
    *slot = book.clone();
    Ok(Json(book))
}

async fn remove(State(catalog): State<FakeCatalog>, Path(id): Path<String>) -> StatusCode {
    let mut state = catalog.inner.lock().await;
    record(&mut state, "DELETE", format!("/books/{id}"), None);
    if state.fail_writes {
        return StatusCode::INTERNAL_SERVER_ERROR;
    }

    let before = state.books.len();
    state.books.retain(|b| b["_id"] != id.as_str());
    if state.books.len() == before {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::OK
    }
}
