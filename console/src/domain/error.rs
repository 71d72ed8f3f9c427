//! Domain-level error types.
//!
//! These errors are transport agnostic. The controller converts every failure
//! into one of these values and the presentation layer decides whether it
//! becomes an inline banner or a transient notification.

use std::fmt;

use serde_json::Value;

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorCode {
    /// Client-side validation failed before any request was issued.
    InvalidRequest,
    /// The stored credential is missing or the API rejected it.
    Unauthorized,
    /// The requested record is not present in the loaded view.
    NotFound,
    /// The API answered with a non-success status.
    Server,
    /// The API could not be reached or did not answer in time.
    ServiceUnavailable,
    /// The API answered with a payload that could not be decoded.
    Decode,
    /// An unexpected local failure (storage, configuration).
    InternalError,
}

impl ErrorCode {
    fn fallback_message(self) -> &'static str {
        match self {
            Self::InvalidRequest => "invalid input",
            Self::Unauthorized => "session expired",
            Self::NotFound => "not found",
            Self::Server => "request failed",
            Self::ServiceUnavailable => "service unavailable",
            Self::Decode => "unexpected response",
            Self::InternalError => "internal error",
        }
    }
}

/// Domain error payload.
///
/// ## Invariants
/// - `message` is never blank; blank inputs are replaced with a code-specific
///   fallback so banners always carry readable text.
///
/// # Examples
/// ```
/// use admin_console::domain::{Error, ErrorCode};
///
/// let err = Error::server(422, "code required");
/// assert_eq!(err.code(), ErrorCode::Server);
/// assert_eq!(err.banner(), "Error: code required");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    code: ErrorCode,
    message: String,
    status: Option<u16>,
    details: Option<Value>,
}

impl Error {
    /// Create a new error for `code`.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            code.fallback_message().to_owned()
        } else {
            message
        };
        Self {
            code,
            message,
            status: None,
            details: None,
        }
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message shown to the operator.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// HTTP status reported by the API, when the error came from one.
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// Supplementary structured details.
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Attach structured details to the error.
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Text rendered in the persistent inline banner.
    pub fn banner(&self) -> String {
        format!("Error: {}", self.message)
    }

    /// Convenience constructor for [`ErrorCode::InvalidRequest`].
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Convenience constructor for [`ErrorCode::Unauthorized`].
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    /// Convenience constructor for [`ErrorCode::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::Server`] carrying the status.
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        let mut error = Self::new(ErrorCode::Server, message);
        error.status = Some(status);
        error
    }

    /// Convenience constructor for [`ErrorCode::ServiceUnavailable`].
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ServiceUnavailable, message)
    }

    /// Convenience constructor for [`ErrorCode::Decode`].
    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Decode, message)
    }

    /// Convenience constructor for [`ErrorCode::InternalError`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}
