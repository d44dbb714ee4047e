use super::Error;

/// Error when a type's declared mapping is invalid or disagrees with the
/// database schema.
///
/// This covers:
/// - a class-level mapping without a data binder name
/// - property mappings that are not allowed inside their class mapping
/// - relation mappings whose local or related property cannot be resolved
/// - tables, columns, procedures or parameters missing from the database
/// - storage types that do not match the declared property type
#[derive(Debug)]
pub(super) struct ConfigurationError {
    message: Box<str>,
}

impl std::error::Error for ConfigurationError {}

impl core::fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid configuration: {}", self.message)
    }
}

impl Error {
    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::Configuration(ConfigurationError {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is a configuration error.
    ///
    /// Only the outermost error is considered, so a configuration problem
    /// discovered while persisting is reported as a persistence error.
    pub fn is_configuration(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::Configuration(_))
    }
}
