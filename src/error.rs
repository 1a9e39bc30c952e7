//! Typed errors and HTTP mapping.

use crate::service::FieldErrors;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("credentials file not found at: {}", .0.display())]
    CredentialsFileNotFound(PathBuf),
    #[error("invalid credentials file {}: {reason}", .path.display())]
    InvalidCredentials { path: PathBuf, reason: String },
    #[error(
        "could not locate Firestore credentials ({0}). Configure one of:\n\
         - set FIREBASE_CREDENTIALS to a service-account key file\n\
         - add firebase-service-account.json to RESOURCE_DIR\n\
         - set the GOOGLE_APPLICATION_CREDENTIALS environment variable"
    )]
    CredentialsUnavailable(String),
    #[error("invalid setting {key}={value:?}: {reason}")]
    InvalidSetting {
        key: &'static str,
        value: String,
        reason: String,
    },
    #[error("firestore client: {0}")]
    Client(String),
}

/// Failure of a single store call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The wait was cut short (process shutting down). Safe to retry.
    #[error("operation interrupted")]
    Interrupted,
    /// The document was gone when the write landed.
    #[error("no document with id {0}")]
    NotFound(String),
    #[error("{0}")]
    Backend(String),
}

/// The four message operations, used to word failures.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    Create,
    List,
    Update,
    Delete,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::List => "list",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }

    pub fn interrupted_message(&self) -> &'static str {
        match self {
            Operation::Create => "Envio interrompido, tente novamente.",
            Operation::List => "Consulta interrompida, tente novamente.",
            Operation::Update => "Atualização interrompida, tente novamente.",
            Operation::Delete => "Exclusão interrompida, tente novamente.",
        }
    }

    pub fn failure_prefix(&self) -> &'static str {
        match self {
            Operation::Create => "Falha ao registrar mensagem: ",
            Operation::List => "Falha ao consultar mensagens: ",
            Operation::Update => "Falha ao atualizar mensagem: ",
            Operation::Delete => "Falha ao excluir mensagem: ",
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Dados inválidos.")]
    Validation(FieldErrors),
    /// Body could not be read as JSON; keeps the extractor's status (400, 413 or 415).
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },
    /// Carries the id that was looked up.
    #[error("Mensagem não encontrada.")]
    NotFound(String),
    #[error("{}", .0.interrupted_message())]
    Interrupted(Operation),
    #[error("{}{source}", .op.failure_prefix())]
    Store {
        op: Operation,
        #[source]
        source: StoreError,
    },
}

impl AppError {
    pub fn from_store(op: Operation, err: StoreError) -> Self {
        match err {
            StoreError::Interrupted => AppError::Interrupted(op),
            StoreError::NotFound(id) => AppError::NotFound(id),
            source => AppError::Store { op, source },
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Rejected { status, .. } => *status,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Interrupted(_) | AppError::Store { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
    /// Field name to violated constraint; only present on validation failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub fields: Option<FieldErrors>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = self.to_string();
        let fields = match self {
            AppError::Validation(fields) => Some(fields),
            _ => None,
        };
        (status, Json(ErrorBody { error, fields })).into_response()
    }
}
