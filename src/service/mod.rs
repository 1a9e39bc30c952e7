//! Message operations and input validation.

mod messages;
mod validation;
pub use messages::MessageService;
pub use validation::{FieldErrors, MessageValidator, EMAIL_MAX_CHARS, MESSAGE_MAX_CHARS, NAME_MAX_CHARS};
