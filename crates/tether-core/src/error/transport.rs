use super::Error;

/// Error reported by the transport: a network failure or a non-2xx answer
/// whose body is not a JSON:API error document.
#[derive(Debug)]
pub(super) struct TransportError {
    pub(super) status: Option<u16>,
    message: Box<str>,
    body: Option<serde_json::Value>,
}

impl std::error::Error for TransportError {}

impl core::fmt::Display for TransportError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match self.status {
            Some(status) => write!(f, "transport failure (status {status}): {}", self.message),
            None => write!(f, "transport failure: {}", self.message),
        }
    }
}

impl Error {
    /// Creates a transport error.
    ///
    /// Transports call this for network failures (`status` is `None`) and may
    /// attach whatever body was received.
    pub fn transport(
        status: Option<u16>,
        message: impl Into<String>,
        body: Option<serde_json::Value>,
    ) -> Error {
        Error::from(super::ErrorKind::Transport(TransportError {
            status,
            message: message.into().into(),
            body,
        }))
    }

    /// Returns `true` if this error is a transport error.
    pub fn is_transport(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::Transport(_))
    }

    /// The body attached to a transport error, if any.
    pub fn transport_body(&self) -> Option<&serde_json::Value> {
        match self.kind() {
            super::ErrorKind::Transport(err) => err.body.as_ref(),
            _ => None,
        }
    }
}
