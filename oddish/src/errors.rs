use backtrace::Backtrace;
use serde::{de, ser};
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::result::Result;
use std::sync::Arc;

/// Error kinds for Oddish operations
///
/// Each kind names one category of failure so callers can branch on it
/// without parsing messages.
///
/// # Examples
///
/// ```rust,ignore
/// use oddish::errors::{OddishError, ErrorKind, OddishResult};
///
/// fn example() -> OddishResult<()> {
///     Err(OddishError::new("unsupported id type: Int32", ErrorKind::InvalidId))
/// }
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ErrorKind {
    // Identity Errors
    /// The identifier value has an unsupported type
    InvalidId,
    /// A document with the same `_id` already exists
    DuplicateKey,

    // Mapping Errors
    /// A document could not be decoded into the destination type
    DecodeError,
    /// A value could not be encoded into a document
    EncodeError,

    // Cursor Errors
    /// The cursor failed while advancing or closing
    CursorError,

    // Query Errors
    /// The filter document uses an unsupported operator or shape
    FilterError,
    /// The operation is not valid in the current context
    InvalidOperation,

    // Backend Errors
    /// Error reported by the underlying database client
    BackendError,

    // Generic/Internal Errors - used as fallback
    /// Internal error (usually indicates a bug)
    InternalError,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::InvalidId => write!(f, "Invalid ID"),
            ErrorKind::DuplicateKey => write!(f, "Duplicate key"),
            ErrorKind::DecodeError => write!(f, "Decode error"),
            ErrorKind::EncodeError => write!(f, "Encode error"),
            ErrorKind::CursorError => write!(f, "Cursor error"),
            ErrorKind::FilterError => write!(f, "Filter error"),
            ErrorKind::InvalidOperation => write!(f, "Invalid operation"),
            ErrorKind::BackendError => write!(f, "Backend error"),
            ErrorKind::InternalError => write!(f, "Internal error"),
        }
    }
}

/// Custom Oddish error type.
///
/// `OddishError` carries a message, a kind, an optional cause and the
/// backtrace captured where it was created. Clones share the backtrace.
///
/// # Examples
///
/// ```rust,ignore
/// use oddish::errors::{OddishError, ErrorKind};
///
/// let cause = OddishError::new("connection reset", ErrorKind::BackendError);
/// let err = OddishError::new_with_cause("cursor close failed", ErrorKind::CursorError, cause);
/// ```
#[derive(Clone)]
pub struct OddishError {
    message: String,
    error_kind: ErrorKind,
    cause: Option<Box<OddishError>>,
    backtrace: Arc<Backtrace>,
}

impl OddishError {
    /// Creates a new `OddishError` with the specified message and error kind.
    ///
    /// # Arguments
    ///
    /// * `message` - A description of the error
    /// * `error_kind` - The category of error
    pub fn new(message: &str, error_kind: ErrorKind) -> Self {
        OddishError {
            message: message.to_string(),
            error_kind,
            cause: None,
            backtrace: Arc::new(Backtrace::new()),
        }
    }

    /// Creates a new `OddishError` that keeps `cause` in its error chain.
    pub fn new_with_cause(message: &str, error_kind: ErrorKind, cause: OddishError) -> Self {
        OddishError {
            message: message.to_string(),
            error_kind,
            cause: Some(Box::new(cause)),
            backtrace: Arc::new(Backtrace::new()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.error_kind
    }

    pub fn cause(&self) -> Option<&OddishError> {
        self.cause.as_deref()
    }
}

impl Display for OddishError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Debug for OddishError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.cause {
            Some(cause) => write!(f, "{}\nCaused by: {:?}", self.message, cause),
            None => write!(f, "{}\n{:?}", self.message, self.backtrace),
        }
    }
}

impl Error for OddishError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.cause {
            Some(cause) => Some(cause.as_ref()),
            None => None,
        }
    }
}

/// A result type alias for Oddish operations.
pub type OddishResult<T> = Result<T, OddishError>;

impl de::Error for OddishError {
    fn custom<T: Display>(msg: T) -> Self {
        OddishError::new(&msg.to_string(), ErrorKind::DecodeError)
    }
}

impl ser::Error for OddishError {
    fn custom<T: Display>(msg: T) -> Self {
        OddishError::new(&msg.to_string(), ErrorKind::EncodeError)
    }
}

impl From<bson::de::Error> for OddishError {
    fn from(err: bson::de::Error) -> Self {
        OddishError::new(
            &format!("Document decode error: {}", err),
            ErrorKind::DecodeError,
        )
    }
}

impl From<bson::ser::Error> for OddishError {
    fn from(err: bson::ser::Error) -> Self {
        OddishError::new(
            &format!("Document encode error: {}", err),
            ErrorKind::EncodeError,
        )
    }
}

impl From<bson::oid::Error> for OddishError {
    fn from(err: bson::oid::Error) -> Self {
        OddishError::new(&format!("ObjectId parse error: {}", err), ErrorKind::InvalidId)
    }
}

impl From<String> for OddishError {
    fn from(msg: String) -> Self {
        OddishError::new(&msg, ErrorKind::InternalError)
    }
}

impl From<&str> for OddishError {
    fn from(msg: &str) -> Self {
        OddishError::new(msg, ErrorKind::InternalError)
    }
}
