//! # llm-handlers
//!
//! [`MessageRelay`] turns one inbound text into exactly one reply via the LLM, absorbing every
//! upstream failure into a fixed fallback. [`TextOnlyHandler`] and [`RelayHandler`] plug it into
//! the handler chain.

mod relay;
mod relay_handler;
mod text_only;

pub use relay::{IncomingMessage, MessageRelay, OutgoingMessage, FALLBACK_REPLY};
pub use relay_handler::{split_reply, RelayHandler, MAX_MESSAGE_CHARS};
pub use text_only::TextOnlyHandler;
