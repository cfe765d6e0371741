//! Event bus carrying user-facing notices and navigation requests out of the
//! catalog controllers.

use bookshelf_kernel::Route;
use tokio::sync::broadcast;

const DEFAULT_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A short message for the user, shown once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellEvent {
    Notice(Notice),
    Navigate(Route),
}

/// Fan-out publisher for [`ShellEvent`]s.
///
/// Publishing never fails from the caller's point of view: with no subscriber
/// attached the event is dropped.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<ShellEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ShellEvent> {
        self.tx.subscribe()
    }

    pub fn publish(&self, event: ShellEvent) {
        if let Err(broadcast::error::SendError(event)) = self.tx.send(event) {
            tracing::debug!(?event, "no subscribers for shell event");
        }
    }

    pub fn notify(&self, notice: Notice) {
        tracing::info!(level = ?notice.level, message = %notice.message, "notice");
        self.publish(ShellEvent::Notice(notice));
    }

    pub fn navigate(&self, route: Route) {
        tracing::info!(route = %route, "navigate");
        self.publish(ShellEvent::Navigate(route));
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Take every event currently buffered on `rx` without waiting.
pub fn drain(rx: &mut broadcast::Receiver<ShellEvent>) -> Vec<ShellEvent> {
    let mut events = Vec::new();
    loop {
        match rx.try_recv() {
            Ok(event) => events.push(event),
            Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "shell event receiver lagged");
            }
            Err(broadcast::error::TryRecvError::Empty)
            | Err(broadcast::error::TryRecvError::Closed) => break,
        }
    }
    events
}
