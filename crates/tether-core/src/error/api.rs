use super::Error;
use crate::document::ErrorObject;

/// Error when the server answers with a JSON:API error document.
///
/// The error objects are kept in the order the server sent them.
#[derive(Debug)]
pub(super) struct ApiError {
    status: u16,
    errors: Vec<ErrorObject>,
}

impl std::error::Error for ApiError {}

impl core::fmt::Display for ApiError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "server responded with {} error(s) (status {})",
            self.errors.len(),
            self.status
        )?;

        if let Some(first) = self.errors.first() {
            if let Some(title) = &first.title {
                write!(f, ": {title}")?;
            }
            if let Some(detail) = &first.detail {
                write!(f, ": {detail}")?;
            }
        }

        Ok(())
    }
}

impl Error {
    /// Creates an error from the `errors` member of a JSON:API error document.
    pub fn api(status: u16, errors: Vec<ErrorObject>) -> Error {
        Error::from(super::ErrorKind::Api(ApiError { status, errors }))
    }

    /// Returns `true` if this error carries a JSON:API error document.
    pub fn is_api(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::Api(_))
    }

    /// The error objects of a JSON:API error document, in wire order.
    pub fn api_errors(&self) -> Option<&[ErrorObject]> {
        match self.kind() {
            super::ErrorKind::Api(err) => Some(&err.errors),
            _ => None,
        }
    }

    /// The HTTP status of a failed exchange, when one was received.
    pub fn status(&self) -> Option<u16> {
        match self.kind() {
            super::ErrorKind::Api(err) => Some(err.status),
            super::ErrorKind::Transport(err) => err.status,
            _ => None,
        }
    }
}
