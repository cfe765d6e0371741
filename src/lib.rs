//! Bookshelf: a client for a REST book catalog.
//!
//! The [`Catalog`] ties a [`BookTransport`] to the controllers the shell drives:
//! the list/search controller, the add/edit form and the deletion flow.

pub mod modules;

pub use modules::books::{
    deletion::{DeletionFlow, DeletionState},
    error::CatalogError,
    form::{FormController, FormMode, FormPhase},
    list::{filter_books, ListController, RefreshSignal},
    models::{Book, BookDraft, BookField, BookId, NewBook, Status},
    transport::{BookTransport, HttpTransport},
    validation::{accepts_year_input, validate_draft, ValidationErrors},
    Catalog,
};
