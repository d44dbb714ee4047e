use super::Error;

/// Error when a load, batch load, persist or delete fails at run time.
#[derive(Debug)]
pub(super) struct PersistenceError {
    message: Box<str>,
}

impl std::error::Error for PersistenceError {}

impl core::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "persistence failed: {}", self.message)
    }
}

impl Error {
    /// Creates a persistence error.
    pub fn persistence(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::Persistence(PersistenceError {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is a persistence error.
    ///
    /// A missing record counts as a persistence failure.
    pub fn is_persistence(&self) -> bool {
        matches!(
            self.kind(),
            super::ErrorKind::Persistence(_) | super::ErrorKind::RecordNotFound(_)
        )
    }
}
