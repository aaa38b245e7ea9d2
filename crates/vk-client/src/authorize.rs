//! Authorization URL construction and token endpoint responses
//!
//! The pure half of the authorization flow: building the URL the user
//! visits to grant access, building the token-endpoint URL for the code
//! exchange, and interpreting the token endpoint's JSON reply. Network
//! dispatch and state transitions live in [`crate::client`].

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::constants::{ACCESS_TOKEN_URL, AUTHORIZE_URL};
use crate::error::{Error, Result};

/// Build the authorization URL the user visits to grant the requested
/// scopes.
///
/// Values are percent-encoded exactly as supplied — no trimming or
/// validation of `scopes` — so parsing the query string yields them back
/// unchanged. `test_mode=1` is appended only when `test_mode` is set.
pub fn build_authorize_url(app_id: &str, scopes: &str, callback: &str, test_mode: bool) -> Url {
    let mut params = vec![
        ("client_id", app_id),
        ("scope", scopes),
        ("redirect_uri", callback),
        ("response_type", "code"),
    ];
    if test_mode {
        params.push(("test_mode", "1"));
    }
    Url::parse_with_params(AUTHORIZE_URL, &params)
        .expect("authorize endpoint is a valid base URL")
}

/// Build the token-endpoint URL for exchanging an authorization code.
pub(crate) fn build_token_url(app_id: &str, api_secret: &str, code: &str, callback: &str) -> Url {
    Url::parse_with_params(
        ACCESS_TOKEN_URL,
        &[
            ("client_id", app_id),
            ("client_secret", api_secret),
            ("code", code),
            ("redirect_uri", callback),
        ],
    )
    .expect("token endpoint is a valid base URL")
}

/// Successful reply from the token endpoint.
///
/// Only `access_token` is guaranteed; everything else the endpoint chooses
/// to include (`expires_in`, `user_id`, anything future) is passed through
/// unchanged, unknown fields via `extra`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    /// Seconds until the token expires, when the endpoint reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    /// Auxiliary fields returned by the endpoint, passed through unchanged.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Interpret a token endpoint body.
///
/// A body carrying an `error` field becomes [`Error::Authorization`] with
/// the error code and, when present, its description. Anything that is not
/// valid JSON or lacks `access_token` becomes [`Error::Decode`].
pub(crate) fn parse_token_response(body: &str) -> Result<TokenResponse> {
    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| Error::Decode(format!("token endpoint response: {e}")))?;

    if let Some(error) = value.get("error") {
        let code = match error.as_str() {
            Some(code) => code.to_owned(),
            None => error.to_string(),
        };
        let description = value
            .get("error_description")
            .and_then(|v| v.as_str())
            .map(str::to_owned);
        return Err(Error::Authorization { code, description });
    }

    serde_json::from_value(value)
        .map_err(|e| Error::Decode(format!("token endpoint response: {e}")))
}
