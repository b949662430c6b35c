use super::Error;

/// Error when a response does not carry what the operation requires.
///
/// This occurs when:
/// - A single-resource fetch returns no body
/// - A create returns no body, or a body without primary `data`
///
/// The exchange itself succeeded, but the document cannot be turned into a
/// model. No partially-built model is ever returned alongside it.
#[derive(Debug)]
pub(super) struct MalformedResponseError {
    message: Box<str>,
}

impl std::error::Error for MalformedResponseError {}

impl core::fmt::Display for MalformedResponseError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "malformed response: {}", self.message)
    }
}

impl Error {
    /// Creates a malformed response error.
    pub fn malformed_response(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::MalformedResponse(MalformedResponseError {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is a malformed response error.
    pub fn is_malformed_response(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::MalformedResponse(_))
    }
}
