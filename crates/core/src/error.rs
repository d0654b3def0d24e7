use persona_chat_model::ErrorKind;
use thiserror::Error;

/// Errors returned by [`Controller`](crate::Controller) operations.
///
/// None of them end the session. The caller may fix the cause and try
/// again.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Error {
    /// The credential or model is missing or blank.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The submitted message has no content.
    #[error("cannot send an empty message")]
    EmptyInput,

    /// The completion service failed. `message` is the description the
    /// service reported, unchanged.
    #[error("{message}")]
    Completion {
        /// What the service reported about the failure.
        kind: ErrorKind,
        /// The service's own description of the failure.
        message: String,
    },
}

impl Error {
    /// Returns `true` if the error came from the completion service.
    #[inline]
    pub fn is_completion(&self) -> bool {
        matches!(self, Error::Completion { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_message_is_verbatim() {
        let err = Error::Completion {
            kind: ErrorKind::Unauthorized,
            message: "Invalid API Key".to_owned(),
        };
        assert_eq!(err.to_string(), "Invalid API Key");
        assert!(err.is_completion());
        assert!(!Error::EmptyInput.is_completion());
    }
}
