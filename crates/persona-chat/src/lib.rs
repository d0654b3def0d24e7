//! An out-of-the-box chat session with a fixed persona, backed by an
//! OpenAI-compatible completion service.
//!
//! The crate includes a CLI tool for chatting in the terminal. And you can
//! also use it as a library to bring the chat session into your own host
//! apps.

#![deny(missing_docs)]

pub mod commands;
mod session;

pub use session::{DEFAULT_MODEL, DEFAULT_PERSONA, Session, SessionBuilder};

/// Re-exports of [`persona_chat_core`] crate.
pub mod core {
    pub use persona_chat_core::*;
}
