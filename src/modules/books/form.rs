//! Record-editing controller shared by the add and edit screens.

use std::sync::Arc;

use bookshelf_events::{EventBus, Notice};
use bookshelf_kernel::Route;

use super::error::CatalogError;
use super::list::RefreshSignal;
use super::models::{Book, BookDraft, BookField, BookId, NewBook};
use super::transport::BookTransport;
use super::validation::{accepts_year_input, validate_draft, ValidationErrors};

const FIX_ERRORS: &str = "Fix validation errors first";
const NOT_FOUND: &str = "Book not found";
const SUBMIT_FAILED: &str = "Something went wrong";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(BookId),
}

/// Where the form is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    /// Edit mode only: the record is being fetched.
    Loading,
    Idle,
    Submitting,
    /// The edit session ended because the record could not be loaded.
    Closed,
}

/// Holds the phase at `Submitting` for as long as it lives.
struct Submitting<'a> {
    phase: &'a mut FormPhase,
}

impl<'a> Submitting<'a> {
    fn enter(phase: &'a mut FormPhase) -> Self {
        *phase = FormPhase::Submitting;
        Self { phase }
    }
}

impl Drop for Submitting<'_> {
    fn drop(&mut self) {
        *self.phase = FormPhase::Idle;
    }
}

pub struct FormController {
    mode: FormMode,
    phase: FormPhase,
    draft: BookDraft,
    errors: ValidationErrors,
    current_year: i32,
    transport: Arc<dyn BookTransport>,
    refresher: Arc<dyn RefreshSignal>,
    events: EventBus,
}

impl FormController {
    /// Blank draft, ready for input.
    pub fn create(
        transport: Arc<dyn BookTransport>,
        refresher: Arc<dyn RefreshSignal>,
        events: EventBus,
    ) -> Self {
        Self::with_mode(FormMode::Create, FormPhase::Idle, transport, refresher, events)
    }

    /// Edit session for `id`. Call [`FormController::load`] before anything else.
    pub fn edit(
        id: BookId,
        transport: Arc<dyn BookTransport>,
        refresher: Arc<dyn RefreshSignal>,
        events: EventBus,
    ) -> Self {
        Self::with_mode(FormMode::Edit(id), FormPhase::Loading, transport, refresher, events)
    }

    fn with_mode(
        mode: FormMode,
        phase: FormPhase,
        transport: Arc<dyn BookTransport>,
        refresher: Arc<dyn RefreshSignal>,
        events: EventBus,
    ) -> Self {
        Self {
            mode,
            phase,
            draft: BookDraft::default(),
            errors: ValidationErrors::default(),
            current_year: time::OffsetDateTime::now_utc().year(),
            transport,
            refresher,
            events,
        }
    }

    /// Pin the upper bound of the year range instead of reading the clock.
    pub fn with_current_year(mut self, year: i32) -> Self {
        self.current_year = year;
        self
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn draft(&self) -> &BookDraft {
        &self.draft
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Fetch the record under edit into the draft.
    ///
    /// Any failure ends the session: the form is closed, an error notice is
    /// emitted and the shell is sent back to the list.
    pub async fn load(&mut self) -> Result<(), CatalogError> {
        let id = match (&self.mode, self.phase) {
            (FormMode::Edit(id), FormPhase::Loading) => id.clone(),
            _ => return Err(CatalogError::NotReady(self.phase)),
        };

        match self.transport.get(&id).await {
            Ok(book) => {
                tracing::debug!(book_id = %id, "loaded book for edit");
                self.draft = BookDraft::from(&book);
                self.phase = FormPhase::Idle;
                Ok(())
            }
            Err(err) => {
                tracing::error!(book_id = %id, error = %err, "failed to load book for edit");
                self.phase = FormPhase::Closed;
                self.events.notify(Notice::error(NOT_FOUND));
                self.events.navigate(Route::Home);
                if err.is_not_found() {
                    Err(CatalogError::NotFound(id))
                } else {
                    Err(err.into())
                }
            }
        }
    }

    /// Apply one field edit. Returns `false` when the edit is ignored: the form
    /// is not idle, a year keystroke fails the input filter, or the status is
    /// not one of the known values.
    ///
    /// An accepted edit clears the error previously reported for that field only.
    pub fn set_field(&mut self, field: BookField, value: &str) -> bool {
        if self.phase != FormPhase::Idle {
            return false;
        }

        match field {
            BookField::Title => self.draft.title = value.to_string(),
            BookField::Author => self.draft.author = value.to_string(),
            BookField::Genre => self.draft.genre = value.to_string(),
            BookField::Image => self.draft.image = value.to_string(),
            BookField::PublishedYear => {
                if !accepts_year_input(value) {
                    return false;
                }
                self.draft.published_year = value.to_string();
            }
            BookField::Status => match value.parse() {
                Ok(status) => self.draft.status = status,
                Err(_) => return false,
            },
        }

        self.errors.clear(field);
        true
    }

    /// Check the whole draft, replacing the stored error set.
    pub fn validate(&mut self) -> Result<NewBook, ValidationErrors> {
        match validate_draft(&self.draft, self.current_year) {
            Ok(book) => {
                self.errors = ValidationErrors::default();
                Ok(book)
            }
            Err(errors) => {
                self.errors = errors.clone();
                Err(errors)
            }
        }
    }

    /// Validate, then create or update the record.
    ///
    /// Invalid drafts never reach the transport. On success the collection is
    /// refreshed and the shell navigates to the list; on failure the form stays
    /// editable. Either way the form is idle again when this returns.
    pub async fn submit(&mut self) -> Result<Book, CatalogError> {
        if self.phase != FormPhase::Idle {
            return Err(CatalogError::NotReady(self.phase));
        }

        let payload = match self.validate() {
            Ok(payload) => payload,
            Err(errors) => {
                tracing::debug!(fields = errors.len(), "submit blocked by validation");
                self.events.notify(Notice::error(FIX_ERRORS));
                return Err(CatalogError::Validation(errors));
            }
        };

        let Self {
            mode,
            phase,
            transport,
            refresher,
            events,
            ..
        } = self;
        let _submitting = Submitting::enter(phase);

        let result = match mode {
            FormMode::Create => transport.create(&payload).await,
            FormMode::Edit(id) => transport.update(id, &payload).await,
        };

        match result {
            Ok(book) => {
                tracing::info!(book_id = %book.id, mode = ?mode, "book saved");
                refresher.request_refresh().await;
                let message = match mode {
                    FormMode::Create => "Book added successfully!",
                    FormMode::Edit(_) => "Book updated successfully!",
                };
                events.notify(Notice::success(message));
                events.navigate(Route::Home);
                Ok(book)
            }
            Err(err) => {
                tracing::error!(mode = ?mode, error = %err, "failed to save book");
                events.notify(Notice::error(SUBMIT_FAILED));
                Err(err.into())
            }
        }
    }
}
