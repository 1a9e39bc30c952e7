//! Success bodies: `{id, message}` confirmations and plain lists.

use axum::{http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const CREATED_MESSAGE: &str = "Mensagem registrada com sucesso.";
pub const UPDATED_MESSAGE: &str = "Mensagem atualizada com sucesso.";
pub const DELETED_MESSAGE: &str = "Mensagem removida com sucesso.";

/// Confirmation returned by create, update and delete.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Confirmation {
    pub id: String,
    pub message: String,
}

pub fn created(id: String) -> (StatusCode, Json<Confirmation>) {
    confirm(StatusCode::CREATED, id, CREATED_MESSAGE)
}

pub fn updated(id: String) -> (StatusCode, Json<Confirmation>) {
    confirm(StatusCode::OK, id, UPDATED_MESSAGE)
}

pub fn deleted(id: String) -> (StatusCode, Json<Confirmation>) {
    confirm(StatusCode::OK, id, DELETED_MESSAGE)
}

pub fn success_many<T: Serialize>(data: Vec<T>) -> (StatusCode, Json<Vec<T>>) {
    (StatusCode::OK, Json(data))
}

fn confirm(status: StatusCode, id: String, message: &str) -> (StatusCode, Json<Confirmation>) {
    (
        status,
        Json(Confirmation {
            id,
            message: message.to_string(),
        }),
    )
}
