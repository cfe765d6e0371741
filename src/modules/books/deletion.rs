//! Two-step gate in front of the destructive delete call.

use std::sync::Arc;

use bookshelf_events::{EventBus, Notice};

use super::error::CatalogError;
use super::list::RefreshSignal;
use super::models::BookId;
use super::transport::BookTransport;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DeletionState {
    #[default]
    Closed,
    PendingConfirmation(BookId),
}

pub struct DeletionFlow {
    state: DeletionState,
    transport: Arc<dyn BookTransport>,
    refresher: Arc<dyn RefreshSignal>,
    events: EventBus,
}

impl DeletionFlow {
    pub fn new(
        transport: Arc<dyn BookTransport>,
        refresher: Arc<dyn RefreshSignal>,
        events: EventBus,
    ) -> Self {
        Self {
            state: DeletionState::Closed,
            transport,
            refresher,
            events,
        }
    }

    pub fn state(&self) -> &DeletionState {
        &self.state
    }

    pub fn pending(&self) -> Option<&BookId> {
        match &self.state {
            DeletionState::PendingConfirmation(id) => Some(id),
            DeletionState::Closed => None,
        }
    }

    /// Select `id` for deletion. A newer request replaces a pending one.
    pub fn request_delete(&mut self, id: BookId) {
        if let DeletionState::PendingConfirmation(previous) = &self.state {
            tracing::debug!(previous = %previous, book_id = %id, "replacing pending deletion");
        }
        self.state = DeletionState::PendingConfirmation(id);
    }

    /// Drop the pending selection without touching the server.
    pub fn cancel(&mut self) -> Option<BookId> {
        match std::mem::take(&mut self.state) {
            DeletionState::PendingConfirmation(id) => Some(id),
            DeletionState::Closed => None,
        }
    }

    /// Delete the pending target. The flow is closed afterwards whatever the outcome.
    pub async fn confirm(&mut self) -> Result<BookId, CatalogError> {
        let id = match std::mem::take(&mut self.state) {
            DeletionState::PendingConfirmation(id) => id,
            DeletionState::Closed => return Err(CatalogError::NothingPending),
        };

        match self.transport.delete(&id).await {
            Ok(()) => {
                tracing::info!(book_id = %id, "book deleted");
                self.refresher.request_refresh().await;
                self.events.notify(Notice::success("Book deleted!"));
                Ok(id)
            }
            Err(err) => {
                tracing::error!(book_id = %id, error = %err, "failed to delete book");
                self.events.notify(Notice::error("Delete failed!"));
                Err(err.into())
            }
        }
    }
}
