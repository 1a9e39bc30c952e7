//! Request extractors.

pub mod message;

pub use message::ValidatedMessage;
