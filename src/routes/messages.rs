//! Message routes under /api/messages.

use crate::handlers::{create_message, delete_message, list_messages, update_message};
use crate::state::AppState;
use axum::{routing::get, routing::put, Router};

pub fn message_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/messages", get(list_messages).post(create_message))
        .route("/api/messages/:id", put(update_message).delete(delete_message))
        .with_state(state)
}
