pub mod http;

use derivative::*;
use std::error::Error as StdError;
use std::fmt;
use std::time::Duration;

/// Sends one message and hands back whatever the peer answered.
pub trait SendMessage<T, R> {
    fn send(&self, data: T) -> R;
}

/// Basic credentials for the remote service.
#[derive(Clone, Derivative)]
#[derivative(Debug)]
pub struct Credentials {
    pub username: String,
    #[derivative(Debug = "ignore")]
    pub password: String,
}

impl Credentials {
    pub fn new(username: String, password: String) -> Self {
        Self { username, password }
    }

    /// Value for the `Authorization` header.
    pub fn authorization(&self) -> String {
        let token = base64::encode(format!("{}:{}", self.username, self.password));
        format!("Basic {}", token)
    }
}

/// Per-request read budget, carried in the request extensions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RequestTimeout(pub Duration);

#[derive(Debug, Clone, PartialEq)]
pub enum SendError {
    /// The peer did not answer within the request's budget.
    Timeout,
    /// The exchange broke down before a complete response was read.
    Connection(String),
}

impl fmt::Display for SendError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SendError::Timeout => write!(f, "request timed out"),
            SendError::Connection(reason) => write!(f, "connection failed: {}", reason),
        }
    }
}

impl StdError for SendError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_authorization_header() {
        let credentials = Credentials::new("Aladdin".to_owned(), "open sesame".to_owned());

        assert_eq!(
            credentials.authorization(),
            "Basic QWxhZGRpbjpvcGVuIHNlc2FtZQ=="
        );
    }

    #[test]
    fn test_password_is_hidden_from_debug_output() {
        let credentials = Credentials::new("user".to_owned(), "secret".to_owned());
        let printed = format!("{:?}", credentials);

        assert!(printed.contains("user"));
        assert!(!printed.contains("secret"));
    }
}
