use super::Error;

/// Error when an operation names a resource type the datastore does not know.
#[derive(Debug)]
pub(super) struct UnknownModelError {
    resource_type: Box<str>,
}

impl std::error::Error for UnknownModelError {}

impl core::fmt::Display for UnknownModelError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "resource type `{}` is not registered with this datastore",
            self.resource_type
        )
    }
}

impl Error {
    /// Creates an unknown model error.
    pub fn unknown_model(resource_type: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::UnknownModel(UnknownModelError {
            resource_type: resource_type.into().into(),
        }))
    }

    /// Returns `true` if this error is an unknown model error.
    pub fn is_unknown_model(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::UnknownModel(_))
    }
}
