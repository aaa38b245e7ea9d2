//! HTTP transport abstraction for the VK client
//!
//! Defines the `Transport` trait that decouples the client from the HTTP
//! stack. The client never touches a socket directly: it hands a fully
//! built URL (GET) or endpoint plus form fields (POST) to the transport and
//! gets back a status code and body text. `HttpTransport` is the production
//! implementation over `reqwest`; tests substitute recording stubs that
//! replay canned responses.
//!
//! Uses `Pin<Box<dyn Future>>` return types for dyn-compatibility
//! (`Box<dyn Transport>`).

pub mod http;

pub use http::{HttpTransport, HttpTransportBuilder};

use std::future::Future;
use std::pin::Pin;

/// HTTP method for a dispatched request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// Raw outcome of a dispatched request: status code plus body text.
///
/// Interpreting the body (JSON decode, error-payload inspection) is the
/// caller's job; the transport only moves bytes.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: u16,
    pub body: String,
}

/// Errors from the transport layer.
///
/// These cover the request itself failing (connection, TLS, timeout) —
/// never application-level error payloads, which arrive as a normal
/// `Response` for the caller to inspect.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("failed to build HTTP client: {0}")]
    Build(String),

    #[error("invalid request URL: {0}")]
    Url(String),

    #[error("request failed: {0}")]
    Request(String),
}

/// Result alias for transport operations.
pub type Result<T> = std::result::Result<T, TransportError>;

/// Abstraction over the HTTP stack.
///
/// GET requests carry their query string inside `url` and ignore `form`;
/// POST requests send `form` as a URL-encoded body.
pub trait Transport: Send + Sync {
    fn send<'a>(
        &'a self,
        url: &'a str,
        method: Method,
        form: &'a [(String, String)],
    ) -> Pin<Box<dyn Future<Output = Result<Response>> + Send + 'a>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_includes_context() {
        let err = TransportError::Request("connection refused".into());
        assert_eq!(err.to_string(), "request failed: connection refused");

        let err = TransportError::Build("bad TLS backend".into());
        assert_eq!(err.to_string(), "failed to build HTTP client: bad TLS backend");
    }

    #[test]
    fn response_is_plain_data() {
        let response = Response {
            status: 200,
            body: r#"{"response":1}"#.into(),
        };
        assert_eq!(response.status, 200);
        assert!(response.body.contains("response"));
    }
}
