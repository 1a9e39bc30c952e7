//! Message handlers: create, list, update, delete.

use crate::error::{AppError, ErrorBody};
use crate::extractors::ValidatedMessage;
use crate::model::{Message, MessageRequest};
use crate::response::{created, deleted, success_many, updated, Confirmation};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::response::IntoResponse;

/// POST /api/messages
#[utoipa::path(
    post,
    path = "/api/messages",
    tag = "messages",
    request_body = MessageRequest,
    responses(
        (status = 201, description = "Message stored", body = Confirmation),
        (status = 400, description = "Invalid body or fields", body = ErrorBody),
        (status = 413, description = "Body over the size limit", body = ErrorBody),
        (status = 415, description = "Body is not application/json", body = ErrorBody),
        (status = 500, description = "Storage failure or interruption", body = ErrorBody),
    )
)]
pub async fn create_message(
    State(state): State<AppState>,
    ValidatedMessage(fields): ValidatedMessage,
) -> Result<impl IntoResponse, AppError> {
    let id = state.messages().create(fields).await?;
    Ok(created(id))
}

/// GET /api/messages, newest first.
#[utoipa::path(
    get,
    path = "/api/messages",
    tag = "messages",
    responses(
        (status = 200, description = "All messages, newest first", body = [Message]),
        (status = 500, description = "Storage failure or interruption", body = ErrorBody),
    )
)]
pub async fn list_messages(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let messages = state.messages().list().await?;
    Ok(success_many(messages))
}

/// PUT /api/messages/:id
#[utoipa::path(
    put,
    path = "/api/messages/{id}",
    tag = "messages",
    params(("id" = String, Path, description = "Message id")),
    request_body = MessageRequest,
    responses(
        (status = 200, description = "Message updated", body = Confirmation),
        (status = 400, description = "Invalid body or fields", body = ErrorBody),
        (status = 413, description = "Body over the size limit", body = ErrorBody),
        (status = 415, description = "Body is not application/json", body = ErrorBody),
        (status = 404, description = "No message with this id", body = ErrorBody),
        (status = 500, description = "Storage failure or interruption", body = ErrorBody),
    )
)]
pub async fn update_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedMessage(fields): ValidatedMessage,
) -> Result<impl IntoResponse, AppError> {
    state.messages().update(&id, fields).await?;
    Ok(updated(id))
}

/// DELETE /api/messages/:id
#[utoipa::path(
    delete,
    path = "/api/messages/{id}",
    tag = "messages",
    params(("id" = String, Path, description = "Message id")),
    responses(
        (status = 200, description = "Message removed", body = Confirmation),
        (status = 404, description = "No message with this id", body = ErrorBody),
        (status = 500, description = "Storage failure or interruption", body = ErrorBody),
    )
)]
pub async fn delete_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.messages().delete(&id).await?;
    Ok(deleted(id))
}
