//! Error taxonomy of the catalog controllers

use bookshelf_http::TransportError;
use thiserror::Error;

use super::form::FormPhase;
use super::models::BookId;
use super::validation::ValidationErrors;

#[derive(Error, Debug)]
pub enum CatalogError {
    /// The record to edit does not exist.
    #[error("book '{0}' not found")]
    NotFound(BookId),

    /// Local field checks failed; nothing was sent.
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("form is {0:?}, expected Idle")]
    NotReady(FormPhase),

    #[error("no deletion is pending confirmation")]
    NothingPending,
}

impl CatalogError {
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            CatalogError::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}
