use crate::connection::{RequestTimeout, SendError, SendMessage};
use bytes::Bytes;
use http::Request as HttpRequest;
use http::Response as HttpResponse;
use reqwest::blocking::Client;
use reqwest::blocking::Request;
use reqwest::Error as RequestError;
use std::convert::TryFrom;
use std::error::Error as StdError;
use std::io;

impl SendMessage<HttpRequest<Vec<u8>>, Result<HttpResponse<Bytes>, SendError>> for Client {
    fn send(&self, data: HttpRequest<Vec<u8>>) -> Result<HttpResponse<Bytes>, SendError> {
        let timeout = data.extensions().get::<RequestTimeout>().map(|t| t.0);
        let mut request = Request::try_from(data)?;
        if timeout.is_some() {
            *request.timeout_mut() = timeout;
        }
        let response = self.execute(request)?;
        let mut builder = HttpResponse::builder().status(response.status());
        for (name, value) in response.headers() {
            builder = builder.header(name, value);
        }
        let body = response.bytes()?;
        builder
            .body(body)
            .map_err(|e| SendError::Connection(e.to_string()))
    }
}

impl From<RequestError> for SendError {
    fn from(error: RequestError) -> Self {
        if error.is_timeout() || timed_out(&error) {
            SendError::Timeout
        } else {
            SendError::Connection(error.to_string())
        }
    }
}

// Body reads that run out of time surface as wrapped io errors.
fn timed_out(error: &RequestError) -> bool {
    let mut source = error.source();
    while let Some(err) = source {
        if let Some(io_error) = err.downcast_ref::<io::Error>() {
            if io_error.kind() == io::ErrorKind::TimedOut {
                return true;
            }
        }
        source = err.source();
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_send_returns_status_headers_and_body() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/teamengine/rest/suites")
            .with_status(200)
            .with_header("content-type", "text/xml")
            .with_body("<suites/>")
            .create();
        let request = HttpRequest::get(format!("{}/teamengine/rest/suites", server.url()))
            .body(Vec::new())
            .unwrap();

        let response = Client::new().send(request).unwrap();

        mock.assert();
        assert_eq!(response.status(), 200);
        assert_eq!(response.headers()["content-type"], "text/xml");
        assert_eq!(response.body().as_ref(), b"<suites/>");
    }

    #[test]
    fn test_error_status_is_a_response_not_an_error() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/broken")
            .with_status(500)
            .with_body("<html><body><p>down</p></body></html>")
            .create();
        let mut request = HttpRequest::get(format!("{}/broken", server.url()))
            .body(Vec::new())
            .unwrap();
        request
            .extensions_mut()
            .insert(RequestTimeout(Duration::from_secs(5)));

        let response = Client::new().send(request).unwrap();

        assert_eq!(response.status(), 500);
    }

    #[test]
    fn test_refused_connection_is_reported() {
        let request = HttpRequest::get("http://127.0.0.1:1/")
            .body(Vec::new())
            .unwrap();

        let result = Client::new().send(request);

        assert!(matches!(result, Err(SendError::Connection(_))));
    }
}
