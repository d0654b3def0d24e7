//! Core logic of a chat session: the transcript, the controller that
//! drives it, and the error types surfaced to front-ends.

#![deny(missing_docs)]
#![deny(clippy::missing_safety_doc)]

#[macro_use]
extern crate tracing;

mod controller;
pub mod conversation;
mod error;
mod model_client;

pub use controller::{Controller, ControllerBuilder, SessionState};
pub use error::Error;
pub use persona_chat_model::{Credential, ErrorKind};
