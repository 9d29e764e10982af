use std::fmt;

/// An error that occurred while parsing a duration or a report timestamp.
#[derive(Clone, PartialEq)]
#[non_exhaustive]
pub enum Error {
    Syntax(String),
    UnitNotSupported(String),
    Timestamp(String),
}

impl ::std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::Syntax(ref err) => err.fmt(f),
            Error::UnitNotSupported(ref err) => err.fmt(f),
            Error::Timestamp(ref value) => write!(f, "'{}' is not an ISO-8601 timestamp", value),
        }
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::Syntax(ref err) => write!(f, "Syntax({})", err),
            Error::UnitNotSupported(ref err) => write!(f, "UnitNotSupported({})", err),
            Error::Timestamp(ref value) => write!(f, "Timestamp({})", value),
        }
    }
}
