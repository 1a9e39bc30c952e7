//! HTTP handlers for the message API.

pub mod messages;
pub use messages::*;
