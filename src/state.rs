//! Shared application state for all routes. Built once at startup and cloned per request.

use crate::service::MessageService;
use crate::shutdown::Shutdown;
use crate::store::MessageStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn MessageStore>,
    /// Fires on process shutdown; pending store calls give up when it does.
    pub shutdown: Shutdown,
}

impl AppState {
    pub fn new(store: Arc<dyn MessageStore>, shutdown: Shutdown) -> Self {
        AppState { store, shutdown }
    }

    pub fn messages(&self) -> MessageService<'_> {
        MessageService::new(self.store.as_ref(), &self.shutdown)
    }
}
