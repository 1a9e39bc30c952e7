//! Contact-form backend: validated messages stored in a Firestore collection,
//! exposed as a small REST API.

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod model;
pub mod openapi;
pub mod response;
pub mod routes;
pub mod service;
pub mod shutdown;
pub mod state;
pub mod store;

pub use config::{resolve_credentials, Settings, StoreKind};
pub use error::{AppError, ConfigError, Operation, StoreError};
pub use model::{Message, MessageFields, MessageRequest};
pub use routes::{app, common_routes, message_routes};
pub use service::{MessageService, MessageValidator};
pub use shutdown::{Shutdown, ShutdownTrigger};
pub use state::AppState;
pub use store::{FirestoreStore, MemoryStore, MessageStore};
