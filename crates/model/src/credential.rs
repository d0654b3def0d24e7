use std::fmt::{self, Debug, Formatter};

/// An opaque secret used to authenticate to a completion service.
///
/// The secret is never printed: both `Debug` output and log records see
/// `<redacted>` instead. Surrounding whitespace (e.g. a trailing newline
/// from a pasted key) is trimmed on construction.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Credential(String);

impl Credential {
    /// Creates a new `Credential`.
    #[inline]
    pub fn new<S: AsRef<str>>(secret: S) -> Self {
        Self(secret.as_ref().trim().to_owned())
    }

    /// Returns `true` if the secret is blank.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the raw secret.
    ///
    /// Only transports should call this, when building the
    /// authentication header.
    #[inline]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

impl From<String> for Credential {
    #[inline]
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for Credential {
    #[inline]
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
