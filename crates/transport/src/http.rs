//! Production transport over `reqwest`
//!
//! One `HttpTransport` per client instance; the underlying connection pool
//! is owned by the transport and released when it is dropped. TLS
//! certificate verification is ON by default — disabling it is an explicit
//! opt-in for debugging against intercepting proxies only.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use crate::{Method, Response, Result, Transport, TransportError};

/// Identifies the library on every outgoing request.
pub const DEFAULT_USER_AGENT: &str = concat!("vk-client/", env!("CARGO_PKG_VERSION"));

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// `reqwest`-backed transport with a configurable timeout and user agent.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Build a transport with the default timeout and user agent.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Start configuring a transport.
    pub fn builder() -> HttpTransportBuilder {
        HttpTransportBuilder::default()
    }
}

/// Builder for [`HttpTransport`].
pub struct HttpTransportBuilder {
    timeout: Duration,
    user_agent: String,
    accept_invalid_certs: bool,
}

impl Default for HttpTransportBuilder {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            accept_invalid_certs: false,
        }
    }
}

impl HttpTransportBuilder {
    /// Overall request timeout. Not a correctness requirement of the
    /// protocol, just a sane bound on how long a call may hang.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Replace the user agent string sent on every request.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// DANGER: disable TLS certificate verification.
    ///
    /// This exposes every request — including the application secret that
    /// rides in the signed parameters — to on-path attackers. Never enable
    /// it outside of local debugging against an intercepting proxy.
    pub fn danger_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    pub fn build(self) -> Result<HttpTransport> {
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent)
            .danger_accept_invalid_certs(self.accept_invalid_certs)
            .build()
            .map_err(|e| TransportError::Build(e.to_string()))?;
        Ok(HttpTransport { client })
    }
}

impl Transport for HttpTransport {
    fn send<'a>(
        &'a self,
        url: &'a str,
        method: Method,
        form: &'a [(String, String)],
    ) -> Pin<Box<dyn Future<Output = Result<Response>> + Send + 'a>> {
        Box::pin(async move {
            // Query strings carry credential material; log the base URL only.
            let base_url = url.split('?').next().unwrap_or(url);
            tracing::debug!(url = base_url, method = ?method, "dispatching request");

            let request = match method {
                Method::Get => self.client.get(url),
                Method::Post => self.client.post(url).form(form),
            };
            let response = request
                .send()
                .await
                .map_err(|e| TransportError::Request(e.to_string()))?;

            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .map_err(|e| TransportError::Request(format!("reading response body: {e}")))?;

            tracing::debug!(url = base_url, status, bytes = body.len(), "received response");
            Ok(Response { status, body })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults_build() {
        assert!(HttpTransport::new().is_ok());
    }

    #[test]
    fn builder_accepts_overrides() {
        let transport = HttpTransport::builder()
            .timeout(Duration::from_secs(5))
            .user_agent("vk-client-test/0.0")
            .build();
        assert!(transport.is_ok());
    }

    #[test]
    fn default_user_agent_names_library_and_version() {
        assert!(DEFAULT_USER_AGENT.starts_with("vk-client/"));
        assert!(DEFAULT_USER_AGENT.contains(env!("CARGO_PKG_VERSION")));
    }

    #[tokio::test]
    async fn unreachable_host_is_a_request_error() {
        let transport = HttpTransport::builder()
            .timeout(Duration::from_millis(200))
            .build()
            .unwrap();
        // Reserved TEST-NET-1 address, nothing listens there.
        let result = transport
            .send("http://192.0.2.1/method/ping.json", Method::Get, &[])
            .await;
        assert!(matches!(result, Err(TransportError::Request(_))));
    }
}
