use std::error::Error as StdError;

/// Error produced while decoding an SSE stream or setting up an inspection.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{kind}")]
pub struct Error {
    kind: Box<ErrorKind>,
}

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub(crate) fn inner<E>(err: E) -> Self
    where
        E: StdError,
    {
        Self {
            kind: Box::new(ErrorKind::Inner(err.to_string())),
        }
    }

    pub(crate) fn parser(err: crate::parser::Error) -> Self {
        Self {
            kind: Box::new(ErrorKind::Sse(err.to_string())),
        }
    }

    pub(crate) fn invalid_argument(msg: impl Into<String>) -> Self {
        Self {
            kind: Box::new(ErrorKind::InvalidArgument(msg.into())),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ErrorKind {
    /// The byte stream did not hold valid SSE.
    #[error("malformed event stream: {0}")]
    Sse(String),
    /// The underlying transport failed.
    #[error("transport error: {0}")]
    Inner(String),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
