//! Firestore-backed message store over the `firestore` client crate.

use super::{MessageStore, COLLECTION};
use crate::config::{CredentialSource, ResolvedCredentials};
use crate::error::{ConfigError, StoreError};
use crate::model::{Message, MessageFields};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use firestore::errors::FirestoreError;
use firestore::{FirestoreDb, FirestoreDbOptions, FirestoreQueryDirection, FirestoreWritePrecondition};
use serde::{Deserialize, Serialize};

/// Fields written by an update; everything else on the document is preserved.
const UPDATE_MASK: [&str; 4] = ["name", "email", "message", "updatedAt"];

/// Stored shape of a message document. The id comes from the document name, not a field.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MessageDocument {
    #[serde(alias = "_firestore_id", default, skip_serializing)]
    id: Option<String>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    message: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "firestore::serialize_as_optional_timestamp"
    )]
    created_at: Option<DateTime<Utc>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "firestore::serialize_as_optional_timestamp"
    )]
    updated_at: Option<DateTime<Utc>>,
}

impl MessageDocument {
    fn from_fields(fields: &MessageFields) -> Self {
        MessageDocument {
            name: fields.name.clone(),
            email: fields.email.clone(),
            message: fields.message.clone(),
            ..Default::default()
        }
    }

    fn into_message(self, fallback_id: &str) -> Message {
        Message {
            id: self.id.unwrap_or_else(|| fallback_id.to_string()),
            name: self.name,
            email: self.email,
            message: self.message,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl From<FirestoreError> for StoreError {
    fn from(e: FirestoreError) -> Self {
        StoreError::Backend(e.to_string())
    }
}

/// An update guarded by `exists` fails with NOT_FOUND once the document is gone.
fn update_error(id: &str, e: FirestoreError) -> StoreError {
    match e {
        FirestoreError::DataNotFoundError(_) => StoreError::NotFound(id.to_string()),
        other => other.into(),
    }
}

/// ADC lookup failed; the message lists every way to configure credentials.
fn adc_unavailable(e: impl std::fmt::Display) -> ConfigError {
    ConfigError::CredentialsUnavailable(e.to_string())
}

pub struct FirestoreStore {
    db: FirestoreDb,
}

impl FirestoreStore {
    /// Authenticate with the resolved credentials and target the default or named database.
    pub async fn connect(credentials: &ResolvedCredentials, database_id: Option<&str>) -> Result<Self, ConfigError> {
        let mut options = FirestoreDbOptions::new(credentials.project_id.clone().unwrap_or_default());
        if let Some(database_id) = database_id {
            tracing::info!(database_id = %database_id, "targeting named Firestore database");
            options = options.with_database_id(database_id.to_string());
        }
        match &credentials.project_id {
            Some(project_id) => tracing::info!(project_id = %project_id, "connecting to Firestore"),
            None => tracing::warn!("connecting to Firestore without an explicit project id"),
        }

        let db = match &credentials.source {
            CredentialSource::File(path) | CredentialSource::Bundled(path) => {
                FirestoreDb::with_options_service_account_key_file(options, path.clone())
                    .await
                    .map_err(|e| ConfigError::Client(e.to_string()))?
            }
            CredentialSource::ApplicationDefault => FirestoreDb::with_options(options)
                .await
                .map_err(adc_unavailable)?,
        };
        Ok(FirestoreStore { db })
    }
}

#[async_trait]
impl MessageStore for FirestoreStore {
    async fn insert(&self, fields: &MessageFields, created_at: DateTime<Utc>) -> Result<String, StoreError> {
        let doc = MessageDocument {
            created_at: Some(created_at),
            ..MessageDocument::from_fields(fields)
        };
        let stored: MessageDocument = self
            .db
            .fluent()
            .insert()
            .into(COLLECTION)
            .generate_document_id()
            .object(&doc)
            .execute::<MessageDocument>()
            .await?;
        stored
            .id
            .ok_or_else(|| StoreError::Backend("inserted document has no id".into()))
    }

    async fn list_newest_first(&self) -> Result<Vec<Message>, StoreError> {
        let docs: Vec<MessageDocument> = self
            .db
            .fluent()
            .select()
            .from(COLLECTION)
            .order_by([("createdAt", FirestoreQueryDirection::Descending)])
            .obj::<MessageDocument>()
            .query()
            .await?;
        Ok(docs.into_iter().map(|d| d.into_message("")).collect())
    }

    async fn get(&self, id: &str) -> Result<Option<Message>, StoreError> {
        let doc: Option<MessageDocument> = self
            .db
            .fluent()
            .select()
            .by_id_in(COLLECTION)
            .obj::<MessageDocument>()
            .one(id)
            .await?;
        Ok(doc.map(|d| d.into_message(id)))
    }

    async fn update(&self, id: &str, fields: &MessageFields, updated_at: DateTime<Utc>) -> Result<(), StoreError> {
        let patch = MessageDocument {
            updated_at: Some(updated_at),
            ..MessageDocument::from_fields(fields)
        };
        let _: MessageDocument = self
            .db
            .fluent()
            .update()
            .fields(UPDATE_MASK)
            .in_col(COLLECTION)
            .precondition(FirestoreWritePrecondition::Exists(true))
            .document_id(id)
            .object(&patch)
            .execute::<MessageDocument>()
            .await
            .map_err(|e| update_error(id, e))?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.db
            .fluent()
            .delete()
            .from(COLLECTION)
            .document_id(id)
            .execute()
            .await?;
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let _: Vec<MessageDocument> = self
            .db
            .fluent()
            .select()
            .from(COLLECTION)
            .limit(1)
            .obj::<MessageDocument>()
            .query()
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use firestore::errors::{
        FirestoreDataNotFoundError, FirestoreErrorPublicGenericDetails, FirestoreSystemError,
    };

    #[test]
    fn failed_exists_precondition_is_not_found() {
        let gone = FirestoreError::DataNotFoundError(FirestoreDataNotFoundError::new(
            FirestoreErrorPublicGenericDetails::new("NotFound".into()),
            "no entity to update".into(),
        ));
        assert_eq!(update_error("abc", gone), StoreError::NotFound("abc".into()));

        let other = FirestoreError::SystemError(FirestoreSystemError::new(
            FirestoreErrorPublicGenericDetails::new("Internal".into()),
            "boom".into(),
        ));
        assert!(matches!(update_error("abc", other), StoreError::Backend(cause) if cause.contains("boom")));
    }

    #[test]
    fn adc_failures_list_every_credential_option() {
        let err = adc_unavailable("could not find default credentials");
        assert!(matches!(err, ConfigError::CredentialsUnavailable(_)));
        let text = err.to_string();
        assert!(text.contains("could not find default credentials"));
        assert!(text.contains("FIREBASE_CREDENTIALS"));
        assert!(text.contains("firebase-service-account.json"));
        assert!(text.contains("RESOURCE_DIR"));
        assert!(text.contains("GOOGLE_APPLICATION_CREDENTIALS"));
    }

    #[test]
    fn documents_serialize_with_camel_case_names_and_no_id() {
        let doc = MessageDocument {
            id: Some("abc".into()),
            name: "Ana".into(),
            email: "ana@example.com".into(),
            message: "Olá".into(),
            ..Default::default()
        };
        let value = serde_json::to_value(&doc).unwrap();
        let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["email", "message", "name"]);
    }

    #[test]
    fn missing_fields_read_back_as_empty() {
        let doc: MessageDocument = serde_json::from_value(serde_json::json!({ "_firestore_id": "x1" })).unwrap();
        let message = doc.into_message("fallback");
        assert_eq!(message.id, "x1");
        assert_eq!(message.name, "");
        assert!(message.created_at.is_none());
    }
}
