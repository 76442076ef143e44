use thiserror::Error;

pub type Result<T> = std::result::Result<T, FarCanvasError>;

#[derive(Debug, Error)]
pub enum FarCanvasError {
    /// The focus configuration cannot produce a usable mapping (zero or non-finite values).
    #[error("invalid focus configuration: {0}")]
    Configuration(String),
    /// The active strategy or the wrapped context does not provide this operation.
    #[error("{operation} not supported")]
    Unsupported { operation: &'static str },
    /// A context kind other than "2d" was requested, or attributes were supplied.
    #[error("{0}")]
    ContextType(String),
    #[error("far-canvas encountered a backend error")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("far-canvas encountered an error")]
    Other(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl FarCanvasError {
    pub(crate) fn unsupported(operation: &'static str) -> Self {
        FarCanvasError::Unsupported { operation }
    }
}

impl From<std::io::Error> for FarCanvasError {
    fn from(err: std::io::Error) -> Self {
        FarCanvasError::Other(Box::new(err))
    }
}

#[cfg(feature = "cairo")]
impl From<cairo::Error> for FarCanvasError {
    fn from(err: cairo::Error) -> Self {
        FarCanvasError::Backend(Box::new(err))
    }
}

#[cfg(feature = "cairo")]
impl From<cairo::BorrowError> for FarCanvasError {
    fn from(err: cairo::BorrowError) -> Self {
        FarCanvasError::Backend(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_message_names_the_operation() {
        let err = FarCanvasError::unsupported("translate");
        assert_eq!(err.to_string(), "translate not supported");
    }

    #[test]
    fn io_errors_keep_their_source() {
        use std::error::Error as _;
        let err: FarCanvasError = std::io::Error::other("disk").into();
        assert!(err.source().is_some());
    }
}
