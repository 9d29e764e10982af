use crate::store::StoreError;
use crate::time::error::Error as TimeError;
use std::fmt;
use std::time::Duration;

/// Transport-level outcome of a remote invocation. Always fatal to the task.
#[derive(Debug, Clone, PartialEq)]
pub enum Fault {
    /// The remote answered with a failure status or the exchange broke down.
    /// `code` is absent when no response was received at all.
    ServerError {
        code: Option<u16>,
        message: String,
        body: Option<String>,
    },
    /// No response within the configured budget.
    Timeout { timeout: Duration, message: String },
    /// The response body is not the expected XML.
    MalformedResponse(String),
}

impl Fault {
    pub fn message(&self) -> &str {
        match self {
            Fault::ServerError { message, .. } => message,
            Fault::Timeout { message, .. } => message,
            Fault::MalformedResponse(message) => message,
        }
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Fault::ServerError {
                code: Some(code), ..
            } => write!(f, "remote returned HTTP status code {}", code),
            Fault::ServerError { message, .. } => write!(f, "remote call failed: {}", message),
            Fault::Timeout { timeout, .. } => write!(f, "no response after {:?}", timeout),
            Fault::MalformedResponse(reason) => write!(f, "malformed response: {}", reason),
        }
    }
}

/// A structural assumption about the report that does not hold.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    UnexpectedRoot(String),
    MissingElement(&'static str),
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },
    InvalidAttribute {
        element: &'static str,
        attribute: &'static str,
        value: String,
    },
    InvalidTimestamp(TimeError),
}

impl std::error::Error for Fault {}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ParseError::UnexpectedRoot(name) => {
                write!(f, "expected a TestNG result document, found root '{}'", name)
            }
            ParseError::MissingElement(name) => write!(f, "element '{}' is missing", name),
            ParseError::MissingAttribute { element, attribute } => {
                write!(f, "element '{}' lacks attribute '{}'", element, attribute)
            }
            ParseError::InvalidAttribute {
                element,
                attribute,
                value,
            } => write!(
                f,
                "attribute '{}' of '{}' has invalid value '{}'",
                attribute, element, value
            ),
            ParseError::InvalidTimestamp(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::InvalidTimestamp(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TimeError> for ParseError {
    fn from(err: TimeError) -> Self {
        ParseError::InvalidTimestamp(err)
    }
}

#[derive(Debug)]
pub enum Error {
    Fault(Fault),
    Parse(ParseError),
    Store(StoreError),
    /// The driver itself could not be set up or could not write its output.
    Setup(String),
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Fault(fault) => Some(fault),
            Error::Parse(err) => Some(err),
            Error::Store(err) => Some(err),
            Error::Setup(_) => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Fault(fault) => write!(f, "Remote invocation failed, {}", fault),
            Error::Parse(err) => write!(f, "Cannot transform result, {}", err),
            Error::Store(err) => write!(f, "Cannot persist suite definition, {}", err),
            Error::Setup(reason) => write!(f, "{}", reason),
        }
    }
}

impl From<Fault> for Error {
    fn from(fault: Fault) -> Self {
        Error::Fault(fault)
    }
}

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Self {
        Error::Parse(err)
    }
}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        Error::Store(err)
    }
}
