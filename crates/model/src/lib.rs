//! An abstraction layer for chat-completion services.
//!
//! This crate establishes an unified protocol for the conversation
//! controller to talk to a hosted model, so that the controller can be
//! driven by any completion service (or a scripted fake in tests)
//! without modifying the core codebase.
//!
//! Types in this crate don't define any behavior, instead they are the
//! constraints that the implementors should adhere to.

#![deny(missing_docs)]

mod credential;
mod error;
mod provider;
mod request;
mod response;

pub use credential::*;
pub use error::*;
pub use provider::*;
pub use request::*;
pub use response::*;
