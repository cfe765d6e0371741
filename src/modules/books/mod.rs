pub mod deletion;
pub mod error;
pub mod form;
pub mod list;
pub mod models;
pub mod transport;
pub mod validation;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;

use bookshelf_events::EventBus;
use bookshelf_http::TransportError;
use bookshelf_kernel::settings::ApiSettings;

use deletion::DeletionFlow;
use form::FormController;
use list::ListController;
use models::BookId;
use transport::{BookTransport, HttpTransport};

/// Wires the controllers of one catalog session to a shared transport, list
/// and event bus.
#[derive(Clone)]
pub struct Catalog {
    transport: Arc<dyn BookTransport>,
    list: Arc<ListController>,
    events: EventBus,
}

impl Catalog {
    pub fn new(transport: Arc<dyn BookTransport>, events: EventBus) -> Self {
        let list = Arc::new(ListController::new(transport.clone()));
        Self {
            transport,
            list,
            events,
        }
    }

    /// Catalog over HTTP at `api.base_url`.
    pub fn from_settings(api: &ApiSettings, events: EventBus) -> Result<Self, TransportError> {
        let transport = HttpTransport::from_settings(api)?;
        tracing::info!(api = %transport.api_url(), "catalog transport ready");
        Ok(Self::new(Arc::new(transport), events))
    }

    pub fn transport(&self) -> &Arc<dyn BookTransport> {
        &self.transport
    }

    pub fn list(&self) -> &Arc<ListController> {
        &self.list
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn add_book_form(&self) -> FormController {
        FormController::create(self.transport.clone(), self.list.clone(), self.events.clone())
    }

    /// Edit session for `id`, still in its loading phase.
    pub fn edit_book_form(&self, id: BookId) -> FormController {
        FormController::edit(id, self.transport.clone(), self.list.clone(), self.events.clone())
    }

    pub fn deletion_flow(&self) -> DeletionFlow {
        DeletionFlow::new(self.transport.clone(), self.list.clone(), self.events.clone())
    }
}
