//! VK API client library
//!
//! Signs and dispatches calls against the VK HTTP API and manages the
//! OAuth-style authorization lifecycle. The remote methods themselves are
//! not modeled — callers pass a method name and a generic parameter
//! mapping and get back the decoded (or raw) response.
//!
//! Authorization flow:
//! 1. Build the grant URL via `VkClient::authorize_url`
//! 2. The user authorizes out of band and returns with a code
//! 3. `VkClient::exchange_code` trades the code for an access token
//! 4. Signed calls go through `VkClient::api` / `VkClient::call`
//!
//! Tokens obtained elsewhere are installed with
//! `VkClient::set_access_token`, which validates them against the service
//! first. The HTTP stack is injected through the `transport::Transport`
//! trait, so tests run against recorded stubs instead of the network.

pub mod authorize;
pub mod client;
pub mod constants;
pub mod credentials;
pub mod error;
pub mod sign;

pub use authorize::{TokenResponse, build_authorize_url};
pub use client::{Payload, ResponseFormat, VkClient};
pub use credentials::Credentials;
pub use error::{Error, Result};
pub use transport::{HttpTransport, Method, Transport};
