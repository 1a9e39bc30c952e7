//! Extract and validate a message body before any handler code runs.

use crate::error::AppError;
use crate::model::{MessageFields, MessageRequest};
use crate::service::MessageValidator;
use async_trait::async_trait;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::Json;

/// JSON body that passed [`MessageValidator`]. Rejection is an [`AppError`]
/// carrying the JSON extractor's own status.
#[derive(Clone, Debug)]
pub struct ValidatedMessage(pub MessageFields);

#[async_trait]
impl<S> FromRequest<S> for ValidatedMessage
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<MessageRequest>::from_request(req, state)
            .await
            .map_err(rejected)?;
        let fields = MessageValidator::validate(body).map_err(AppError::Validation)?;
        Ok(ValidatedMessage(fields))
    }
}

fn rejected(rejection: JsonRejection) -> AppError {
    AppError::Rejected {
        status: rejection.status(),
        message: rejection.body_text(),
    }
}
