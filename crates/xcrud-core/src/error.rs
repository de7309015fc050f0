//! Error types for statement building and execution.

use crate::object::ObjectCategory;
use std::fmt;

/// The primary error type for all xcrud operations.
///
/// Every variant carries the fully qualified call (`ClassName.methodName`)
/// that raised it.
#[derive(Debug)]
pub enum Error {
    /// Call not enabled in the builder's current state
    Sequence(SequenceError),
    /// Bad argument count or type
    Argument(ArgumentError),
    /// Builder used before its defining call, or owner no longer available
    Logic(LogicError),
    /// The driver or server rejected the assembled statement
    Statement(StatementError),
    /// A named database object does not exist
    NotFound(NotFoundError),
}

/// Raised when a call is invoked while it is not enabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceError {
    /// Qualified name of the rejected call, e.g. `TableUpdate.where`
    pub call: String,
    /// Calls that are enabled in the current state
    pub enabled: Vec<&'static str>,
}

/// Raised when call arguments have the wrong count or type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentError {
    /// Qualified name of the call, e.g. `TableUpdate.set`
    pub function: String,
    /// Full diagnostic message
    pub message: String,
}

/// Raised when a builder is used in a way that indicates a programming error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicError {
    pub function: String,
    pub message: String,
}

/// Raised when the connection fails to run a statement.
#[derive(Debug)]
pub struct StatementError {
    /// Qualified name of the call, e.g. `TableUpdate.execute`
    pub call: String,
    /// Original driver message
    pub message: String,
    /// Server error code, when the driver reported one
    pub code: Option<u32>,
    /// The driver error that caused this one
    pub source: Option<DriverError>,
}

/// Raised when a named child object does not exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotFoundError {
    pub category: ObjectCategory,
    pub name: String,
    /// Qualified name of the lookup call, once known
    pub function: Option<String>,
}

/// Failure reported by a `Connection` implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverError {
    pub kind: DriverErrorKind,
    pub message: String,
    pub code: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverErrorKind {
    /// Connection lost or unreachable
    Connectivity,
    /// Malformed message on the wire
    Protocol,
    /// The server rejected the statement
    Server,
}

impl SequenceError {
    pub fn new(call: impl Into<String>, enabled: Vec<&'static str>) -> Self {
        Self {
            call: call.into(),
            enabled,
        }
    }
}

impl ArgumentError {
    /// Error prefixed with the call name: `<function>: <detail>`.
    pub fn new(function: impl Into<String>, detail: impl fmt::Display) -> Self {
        let function = function.into();
        let message = format!("{function}: {detail}");
        Self { function, message }
    }

    /// Wrong number of arguments.
    pub fn count(function: impl Into<String>, expected: usize, actual: usize) -> Self {
        let function = function.into();
        let message = format!(
            "Invalid number of arguments in {function}, expected {expected} but got {actual}"
        );
        Self { function, message }
    }

    /// Argument count outside an accepted range.
    pub fn count_range(
        function: impl Into<String>,
        min: usize,
        max: usize,
        actual: usize,
    ) -> Self {
        let function = function.into();
        let message = format!(
            "Invalid number of arguments in {function}, expected {min} to {max} but got {actual}"
        );
        Self { function, message }
    }
}

impl LogicError {
    pub fn new(function: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            function: function.into(),
            message: message.into(),
        }
    }
}

impl StatementError {
    /// Wrap a driver failure, keeping its message verbatim.
    pub fn from_driver(call: impl Into<String>, err: DriverError) -> Self {
        Self {
            call: call.into(),
            message: err.message.clone(),
            code: err.code,
            source: Some(err),
        }
    }
}

impl NotFoundError {
    pub fn new(category: ObjectCategory, name: impl Into<String>) -> Self {
        Self {
            category,
            name: name.into(),
            function: None,
        }
    }

    /// Attach the lookup call that failed.
    #[must_use]
    pub fn in_call(mut self, function: impl Into<String>) -> Self {
        self.function = Some(function.into());
        self
    }
}

impl DriverError {
    pub fn new(kind: DriverErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            code: None,
        }
    }

    /// Server-side rejection with an error code.
    pub fn server(code: u32, message: impl Into<String>) -> Self {
        Self {
            kind: DriverErrorKind::Server,
            message: message.into(),
            code: Some(code),
        }
    }

    pub fn connectivity(message: impl Into<String>) -> Self {
        Self::new(DriverErrorKind::Connectivity, message)
    }

    pub fn protocol(message: impl Into<String>) -> Self {
        Self::new(DriverErrorKind::Protocol, message)
    }
}

impl Error {
    /// Can the caller correct the call and try again on the same builder?
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::Sequence(_) | Error::Argument(_))
    }

    /// Qualified call name that raised this error.
    pub fn call(&self) -> Option<&str> {
        match self {
            Error::Sequence(e) => Some(&e.call),
            Error::Argument(e) => Some(&e.function),
            Error::Logic(e) => Some(&e.function),
            Error::Statement(e) => Some(&e.call),
            Error::NotFound(e) => e.function.as_deref(),
        }
    }

    /// Attach a call name to errors raised below the public call boundary.
    #[must_use]
    pub fn in_call(self, function: &str) -> Self {
        match self {
            Error::NotFound(e) if e.function.is_none() => Error::NotFound(e.in_call(function)),
            other => other,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Sequence(e) => write!(f, "{e}"),
            Error::Argument(e) => write!(f, "{e}"),
            Error::Logic(e) => write!(f, "{e}"),
            Error::Statement(e) => write!(f, "{e}"),
            Error::NotFound(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Statement(e) => e
                .source
                .as_ref()
                .map(|err| err as &(dyn std::error::Error + 'static)),
            _ => None,
        }
    }
}

impl fmt::Display for SequenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.enabled.is_empty() {
            write!(f, "{}: call not allowed, no calls are enabled", self.call)
        } else {
            write!(
                f,
                "{}: call not allowed, enabled calls are: {}",
                self.call,
                self.enabled.join(", ")
            )
        }
    }
}

impl fmt::Display for ArgumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl fmt::Display for LogicError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.function, self.message)
    }
}

impl fmt::Display for StatementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "{}: {} (code {})", self.call, self.message, code),
            None => write!(f, "{}: {}", self.call, self.message),
        }
    }
}

impl fmt::Display for NotFoundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(function) = &self.function {
            write!(f, "{function}: ")?;
        }
        match self.category {
            ObjectCategory::Schema => write!(f, "Unknown database '{}'", self.name),
            category => write!(
                f,
                "The {} '{}' does not exist",
                category.as_str().to_lowercase(),
                self.name
            ),
        }
    }
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for DriverError {}

impl From<SequenceError> for Error {
    fn from(err: SequenceError) -> Self {
        Error::Sequence(err)
    }
}

impl From<ArgumentError> for Error {
    fn from(err: ArgumentError) -> Self {
        Error::Argument(err)
    }
}

impl From<LogicError> for Error {
    fn from(err: LogicError) -> Self {
        Error::Logic(err)
    }
}

impl From<StatementError> for Error {
    fn from(err: StatementError) -> Self {
        Error::Statement(err)
    }
}

impl From<NotFoundError> for Error {
    fn from(err: NotFoundError) -> Self {
        Error::NotFound(err)
    }
}

/// Result type alias for xcrud operations.
pub type Result<T> = std::result::Result<T, Error>;
