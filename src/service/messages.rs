//! Create, list, update and delete against the message store.

use crate::error::{AppError, Operation, StoreError};
use crate::model::{Message, MessageFields};
use crate::shutdown::Shutdown;
use crate::store::MessageStore;
use chrono::Utc;
use std::future::Future;

/// Runs one operation per call. Holds no state of its own between calls.
pub struct MessageService<'a> {
    store: &'a dyn MessageStore,
    shutdown: &'a Shutdown,
}

impl<'a> MessageService<'a> {
    pub fn new(store: &'a dyn MessageStore, shutdown: &'a Shutdown) -> Self {
        MessageService { store, shutdown }
    }

    /// Insert with a server-assigned `createdAt`. Returns the store-generated id.
    pub async fn create(&self, fields: MessageFields) -> Result<String, AppError> {
        let created_at = Utc::now();
        let id = self
            .guarded(self.store.insert(&fields, created_at))
            .await
            .map_err(|e| failed(Operation::Create, None, e))?;
        tracing::info!(id = %id, "message created");
        Ok(id)
    }

    /// All messages, newest first.
    pub async fn list(&self) -> Result<Vec<Message>, AppError> {
        let messages = self
            .guarded(self.store.list_newest_first())
            .await
            .map_err(|e| failed(Operation::List, None, e))?;
        tracing::debug!(count = messages.len(), "messages listed");
        Ok(messages)
    }

    /// Overwrite name/email/message and stamp `updatedAt`. `id` and `createdAt` are left alone.
    pub async fn update(&self, id: &str, fields: MessageFields) -> Result<(), AppError> {
        let existing = self
            .guarded(self.store.get(id))
            .await
            .map_err(|e| failed(Operation::Update, Some(id), e))?
            .ok_or_else(|| AppError::NotFound(id.to_string()))?;

        // updatedAt never precedes createdAt, even if the clock stepped back.
        let now = Utc::now();
        let updated_at = existing.created_at.map_or(now, |created| now.max(created));

        // A delete landing after the lookup surfaces from the store as NotFound.
        self.guarded(self.store.update(id, &fields, updated_at))
            .await
            .map_err(|e| failed(Operation::Update, Some(id), e))?;
        tracing::info!(id = %id, "message updated");
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        self.guarded(self.store.get(id))
            .await
            .map_err(|e| failed(Operation::Delete, Some(id), e))?
            .ok_or_else(|| AppError::NotFound(id.to_string()))?;

        self.guarded(self.store.delete(id))
            .await
            .map_err(|e| failed(Operation::Delete, Some(id), e))?;
        tracing::info!(id = %id, "message deleted");
        Ok(())
    }

    /// Await a store call unless shutdown fires first.
    async fn guarded<T, F>(&self, call: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        tokio::select! {
            biased;
            _ = self.shutdown.wait() => Err(StoreError::Interrupted),
            result = call => result,
        }
    }
}

fn failed(op: Operation, id: Option<&str>, err: StoreError) -> AppError {
    match &err {
        StoreError::Interrupted => {
            tracing::warn!(operation = op.as_str(), id = ?id, "message operation interrupted");
        }
        StoreError::NotFound(_) => {
            tracing::info!(operation = op.as_str(), id = ?id, "message removed before write");
        }
        StoreError::Backend(cause) => {
            tracing::error!(operation = op.as_str(), id = ?id, error = %cause, "message operation failed");
        }
    }
    AppError::from_store(op, err)
}
