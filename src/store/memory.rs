//! In-process message store.

use super::MessageStore;
use crate::error::StoreError;
use crate::model::{Message, MessageFields};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Default)]
pub struct MemoryStore {
    docs: RwLock<HashMap<String, Message>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<String, Message>>, StoreError> {
        self.docs.read().map_err(|_| StoreError::Backend("message store lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<String, Message>>, StoreError> {
        self.docs.write().map_err(|_| StoreError::Backend("message store lock poisoned".into()))
    }
}

#[async_trait]
impl MessageStore for MemoryStore {
    async fn insert(&self, fields: &MessageFields, created_at: DateTime<Utc>) -> Result<String, StoreError> {
        let id = uuid::Uuid::new_v4().simple().to_string();
        let message = Message {
            id: id.clone(),
            name: fields.name.clone(),
            email: fields.email.clone(),
            message: fields.message.clone(),
            created_at: Some(created_at),
            updated_at: None,
        };
        self.write()?.insert(id.clone(), message);
        Ok(id)
    }

    async fn list_newest_first(&self) -> Result<Vec<Message>, StoreError> {
        let mut messages: Vec<Message> = self.read()?.values().cloned().collect();
        // Ties broken by id so repeated listings are stable.
        messages.sort_by(|a, b| (Reverse(a.created_at), &a.id).cmp(&(Reverse(b.created_at), &b.id)));
        Ok(messages)
    }

    async fn get(&self, id: &str) -> Result<Option<Message>, StoreError> {
        Ok(self.read()?.get(id).cloned())
    }

    async fn update(&self, id: &str, fields: &MessageFields, updated_at: DateTime<Utc>) -> Result<(), StoreError> {
        let mut docs = self.write()?;
        let doc = docs
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        doc.name = fields.name.clone();
        doc.email = fields.email.clone();
        doc.message = fields.message.clone();
        doc.updated_at = Some(updated_at);
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.write()?.remove(id);
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.read().map(|_| ())
    }
}
