use http::StatusCode;
use std::fmt::{self, Display, Formatter};

/// The boxed error type carried through handler chains and handed to the
/// configured error handler. Any error type returned by a handler is boxed
/// into this; the original value remains accessible by downcasting.
pub type RouteError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The built-in error type. It pairs a message with an HTTP status so the
/// default error handler can answer with the intended status code.
///
/// # Examples
///
/// ```
/// use http::StatusCode;
/// use tern::Error;
///
/// let err = Error::with_status(StatusCode::FORBIDDEN, "no such luck");
/// assert_eq!(err.status(), StatusCode::FORBIDDEN);
/// assert_eq!(err.to_string(), "no such luck");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    status: StatusCode,
    message: String,
}

impl Error {
    /// Creates an error with status `500 Internal Server Error`.
    pub fn new<M: Into<String>>(message: M) -> Self {
        Error::with_status(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// Creates an error with an explicit status.
    pub fn with_status<M: Into<String>>(status: StatusCode, message: M) -> Self {
        Error {
            status,
            message: message.into(),
        }
    }

    /// The HTTP status associated with this error.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// The error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for Error {}
