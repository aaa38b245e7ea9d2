//! VK client: authorization lifecycle plus signed method invocation
//!
//! Owns the credential state and the injected transport for one session.
//! Authorization state machine:
//!
//! 1. `Unauthenticated` — fresh state, or a supplied-but-unvalidated token
//! 2. `exchange_code` trades an authorization code for a token (one-time;
//!    re-exchange while authorized is rejected before any network I/O)
//! 3. `set_access_token` installs an out-of-band token after a live
//!    validation probe; failure drops the session back to unauthenticated
//! 4. Signed calls go through `api` / `call`
//!
//! The mutating transitions take `&mut self`, so they cannot interleave on
//! one client. Network-touching operations suspend at the transport
//! boundary and block nothing else.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::RngExt;
use reqwest::Url;
use serde_json::Value;
use tracing::{debug, info, warn};
use transport::{HttpTransport, Method, Transport, TransportError};

use crate::authorize::{self, TokenResponse};
use crate::constants::{API_URL, DEFAULT_CALLBACK_URL, VALIDATION_METHOD};
use crate::credentials::Credentials;
use crate::error::{Error, Result};
use crate::sign::{self, SignContext};

/// How the response body should come back from [`VkClient::call`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseFormat {
    /// Ask the API for JSON and parse the body.
    Decoded,
    /// Ask the API for the named wire format (`"xml"`, ...) and return the
    /// body verbatim.
    Raw(String),
}

/// Result payload of a [`VkClient::call`].
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Decoded(Value),
    Raw(String),
}

type ClockFn = Box<dyn Fn() -> u64 + Send + Sync>;
type NonceFn = Box<dyn Fn() -> u32 + Send + Sync>;

/// Client for the VK API: builds authorization URLs, exchanges codes for
/// tokens, and dispatches signed method calls through the injected
/// transport.
///
/// One logical owner per instance. The transport (and its connection pool)
/// is owned exclusively by the client and released when it is dropped.
pub struct VkClient {
    credentials: Credentials,
    transport: Box<dyn Transport>,
    clock: ClockFn,
    nonce: NonceFn,
}

impl VkClient {
    /// Create a client over an explicit transport.
    pub fn new(credentials: Credentials, transport: Box<dyn Transport>) -> Self {
        Self {
            credentials,
            transport,
            clock: Box::new(unix_now),
            nonce: Box::new(random_nonce),
        }
    }

    /// Create a client over the default `reqwest` transport (TLS verified,
    /// default timeout and user agent).
    pub fn with_default_transport(credentials: Credentials) -> Result<Self> {
        let transport = HttpTransport::new()?;
        Ok(Self::new(credentials, Box::new(transport)))
    }

    /// Replace the timestamp source. Signatures become deterministic under
    /// a fixed clock; intended for tests.
    pub fn with_clock(mut self, clock: impl Fn() -> u64 + Send + Sync + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Replace the nonce source. Intended for tests.
    pub fn with_nonce(mut self, nonce: impl Fn() -> u32 + Send + Sync + 'static) -> Self {
        self.nonce = Box::new(nonce);
        self
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn is_authorized(&self) -> bool {
        self.credentials.is_authorized()
    }

    /// Pin an API version for every subsequent request.
    pub fn set_api_version(&mut self, version: impl Into<String>) {
        self.credentials.set_api_version(version);
    }

    /// Build the URL the user visits to grant the requested scopes.
    /// Pure URL construction, no network I/O.
    pub fn authorize_url(&self, scopes: &str, callback: &str, test_mode: bool) -> Url {
        authorize::build_authorize_url(self.credentials.app_id(), scopes, callback, test_mode)
    }

    /// [`authorize_url`](Self::authorize_url) against the default landing
    /// page, without test mode.
    pub fn authorize_url_default(&self, scopes: &str) -> Url {
        self.authorize_url(scopes, DEFAULT_CALLBACK_URL, false)
    }

    /// Exchange an authorization code for an access token.
    ///
    /// One-time transition: once a validated token is installed the
    /// exchange is rejected with [`Error::AlreadyAuthorized`] before any
    /// network I/O. On success the token is stored, the session becomes
    /// authorized, and the endpoint's full reply is returned with auxiliary
    /// fields passed through.
    pub async fn exchange_code(&mut self, code: &str, callback: &str) -> Result<TokenResponse> {
        if self.credentials.access_token().is_some() && self.credentials.is_authorized() {
            return Err(Error::AlreadyAuthorized);
        }

        debug!(callback, "exchanging authorization code");
        let url = authorize::build_token_url(
            self.credentials.app_id(),
            self.credentials.api_secret(),
            code,
            callback,
        );
        let response = self.transport.send(url.as_str(), Method::Get, &[]).await?;
        let token = authorize::parse_token_response(&response.body)?;

        self.credentials.install_token(token.access_token.clone());
        info!(user_id = ?token.user_id, "authorization code exchanged for access token");
        Ok(token)
    }

    /// [`exchange_code`](Self::exchange_code) against the default landing
    /// page.
    pub async fn exchange_code_default(&mut self, code: &str) -> Result<TokenResponse> {
        self.exchange_code(code, DEFAULT_CALLBACK_URL).await
    }

    /// Probe whether the current access token is live.
    ///
    /// Never raises: a missing token (no network call is made), a transport
    /// failure, an error payload, and a malformed body all collapse to
    /// `false`. The result is never cached.
    pub async fn validate_token(&self) -> bool {
        self.probe_token(self.credentials.access_token()).await
    }

    /// Install a token obtained out of band.
    ///
    /// The candidate token is validated with a live probe before it
    /// replaces the current one. On success it is stored and the session
    /// becomes authorized; on failure the previous token is kept, the
    /// session drops to unauthorized, and [`Error::InvalidToken`] is
    /// returned. Always permitted, including when already authorized.
    pub async fn set_access_token(&mut self, token: impl Into<String>) -> Result<()> {
        let token = token.into();
        if self.probe_token(Some(&token)).await {
            self.credentials.install_token(token);
            info!("access token validated and installed");
            Ok(())
        } else {
            self.credentials.mark_unauthorized();
            warn!("access token failed validation");
            Err(Error::InvalidToken)
        }
    }

    /// Invoke an API method and return the JSON-decoded body.
    ///
    /// Shorthand for [`call`](Self::call) with `ResponseFormat::Decoded`
    /// over GET. An application-level error from the service still decodes
    /// successfully — inspect the `error` field of the returned value.
    pub async fn api(&self, method: &str, params: &[(&str, &str)]) -> Result<Value> {
        let body = self
            .dispatch(method, params, "json", Method::Get, self.credentials.access_token())
            .await?;
        serde_json::from_str(&body).map_err(|e| Error::Decode(format!("{method} response: {e}")))
    }

    /// Invoke an API method with an explicit response format and HTTP
    /// method.
    ///
    /// Parameters are augmented with the authentication set, sorted,
    /// signed, and dispatched as a query string (GET) or form body (POST).
    /// `execute` always goes out as POST regardless of `http_method`.
    pub async fn call(
        &self,
        method: &str,
        params: &[(&str, &str)],
        format: ResponseFormat,
        http_method: Method,
    ) -> Result<Payload> {
        let wire_format = match &format {
            ResponseFormat::Decoded => "json",
            ResponseFormat::Raw(name) => name.as_str(),
        };
        let body = self
            .dispatch(method, params, wire_format, http_method, self.credentials.access_token())
            .await?;
        match format {
            ResponseFormat::Decoded => {
                let value = serde_json::from_str(&body)
                    .map_err(|e| Error::Decode(format!("{method} response: {e}")))?;
                Ok(Payload::Decoded(value))
            }
            ResponseFormat::Raw(_) => Ok(Payload::Raw(body)),
        }
    }

    /// Sign and send one request, returning the raw body text.
    ///
    /// `access_token` is passed explicitly so the validation path can probe
    /// a candidate token that is not installed yet.
    async fn dispatch(
        &self,
        method: &str,
        params: &[(&str, &str)],
        wire_format: &str,
        http_method: Method,
        access_token: Option<&str>,
    ) -> Result<String> {
        let params = sign::signed_params(
            params,
            &SignContext {
                app_id: self.credentials.app_id(),
                secret: self.credentials.api_secret(),
                access_token,
                api_version: self.credentials.api_version(),
                timestamp: (self.clock)(),
                nonce: (self.nonce)(),
            },
        );

        let endpoint = format!("{API_URL}{method}.{wire_format}");
        // VK requires `execute` (server-side batch code) to arrive as POST.
        let post = method == "execute" || http_method == Method::Post;
        debug!(method, wire_format, post, "invoking API method");

        let response = if post {
            let form: Vec<(String, String)> = params.into_iter().collect();
            self.transport.send(&endpoint, Method::Post, &form).await?
        } else {
            let url = Url::parse_with_params(&endpoint, params.iter())
                .map_err(|e| TransportError::Url(format!("{endpoint}: {e}")))?;
            self.transport.send(url.as_str(), Method::Get, &[]).await?
        };

        Ok(response.body)
    }

    async fn probe_token(&self, access_token: Option<&str>) -> bool {
        let Some(token) = access_token else {
            return false;
        };
        let result = self
            .dispatch(VALIDATION_METHOD, &[], "json", Method::Get, Some(token))
            .await;
        match result {
            Ok(body) => match serde_json::from_str::<Value>(&body) {
                Ok(value) => value.get("response").is_some(),
                Err(error) => {
                    debug!(%error, "validation response did not decode");
                    false
                }
            },
            Err(error) => {
                debug!(%error, "token validation call failed");
                false
            }
        }
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

fn random_nonce() -> u32 {
    rand::rng().random_range(0..=10_000)
}
