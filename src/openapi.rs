//! OpenAPI document for the message API.

use crate::error::ErrorBody;
use crate::handlers::messages;
use crate::model::{Message, MessageRequest};
use crate::response::Confirmation;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(title = "contact-messages", description = "Contact-form messages stored in Firestore"),
    paths(
        messages::create_message,
        messages::list_messages,
        messages::update_message,
        messages::delete_message,
    ),
    components(schemas(Message, MessageRequest, Confirmation, ErrorBody)),
    tags((name = "messages", description = "Submitted contact messages"))
)]
pub struct ApiDoc;
