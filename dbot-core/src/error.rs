//! Error types for the bot core.
//!
//! [`DbotError`] is the top-level error; [`HandlerError`] is used for handler failures.

use thiserror::Error;

/// Top-level error for dbot (bot transport, handler).
#[derive(Error, Debug)]
pub enum DbotError {
    #[error("Bot error: {0}")]
    Bot(String),

    #[error("Handler error: {0}")]
    Handler(#[from] HandlerError),
}

/// Errors produced by handlers.
#[derive(Error, Debug)]
pub enum HandlerError {
    /// Neither the reply nor the fallback reached the chat.
    #[error("Reply delivery failed: {0}")]
    Delivery(String),
}

/// Result type for core operations; uses [`DbotError`].
pub type Result<T> = std::result::Result<T, DbotError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delivery_error_converts_into_dbot_error() {
        let err: DbotError =
            HandlerError::Delivery("Bad Request: message is too long".to_string()).into();
        assert!(matches!(err, DbotError::Handler(HandlerError::Delivery(_))));
        assert_eq!(
            err.to_string(),
            "Handler error: Reply delivery failed: Bad Request: message is too long"
        );
    }
}
