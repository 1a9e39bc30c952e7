//! Message persistence. The Firestore collection is the system of record; the
//! in-memory store backs tests and local runs without credentials.

mod firestore;
mod memory;

pub use self::firestore::FirestoreStore;
pub use self::memory::MemoryStore;

use crate::config::{resolve_credentials, Settings, StoreKind};
use crate::error::{ConfigError, StoreError};
use crate::model::{Message, MessageFields};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Name of the document collection holding contact messages.
pub const COLLECTION: &str = "contactMessages";

#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Add a document; the store picks the id.
    async fn insert(&self, fields: &MessageFields, created_at: DateTime<Utc>) -> Result<String, StoreError>;

    /// Every message ordered by `createdAt`, most recent first.
    async fn list_newest_first(&self) -> Result<Vec<Message>, StoreError>;

    async fn get(&self, id: &str) -> Result<Option<Message>, StoreError>;

    /// Overwrite name, email and message and set `updatedAt`. Other fields are untouched.
    /// Never creates a document: a missing id is [`StoreError::NotFound`].
    async fn update(&self, id: &str, fields: &MessageFields, updated_at: DateTime<Utc>) -> Result<(), StoreError>;

    async fn delete(&self, id: &str) -> Result<(), StoreError>;

    /// Cheap round trip used by the readiness check.
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Build the store selected by settings. For Firestore this resolves credentials and connects once.
pub async fn open(settings: &Settings) -> Result<Arc<dyn MessageStore>, ConfigError> {
    match settings.store {
        StoreKind::Memory => {
            tracing::warn!("using in-memory message store; messages are lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreKind::Firestore => {
            let credentials = resolve_credentials(settings)?;
            let store = FirestoreStore::connect(&credentials, settings.database_id.as_deref()).await?;
            Ok(Arc::new(store))
        }
    }
}
