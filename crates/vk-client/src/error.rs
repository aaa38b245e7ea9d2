//! Error taxonomy for client operations
//!
//! Every failure is a distinct, matchable variant — nothing is collapsed
//! into a boolean or swallowed. Callers can tell "the service returned an
//! error payload" (decodes fine, they inspect the `error` field themselves)
//! apart from "the request itself failed" (`Transport` / `Decode`).

/// Errors surfaced by the VK client.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A code exchange was attempted while a validated token is already
    /// installed. The exchange is a one-time transition, not a refresh.
    #[error("already authorized")]
    AlreadyAuthorized,

    /// The token endpoint rejected the code or the application credentials.
    #[error("{}", authorization_message(.code, .description))]
    Authorization {
        code: String,
        description: Option<String>,
    },

    /// Token validation failed during direct assignment.
    #[error("invalid access token")]
    InvalidToken,

    /// The request never produced a usable response (connection, TLS,
    /// timeout).
    #[error("transport error: {0}")]
    Transport(#[from] transport::TransportError),

    /// The response body did not parse as the requested format.
    #[error("decode error: {0}")]
    Decode(String),
}

/// Result alias for client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// `"<code>: <description>"` when a description exists, else `"<code>"`.
fn authorization_message(code: &str, description: &Option<String>) -> String {
    match description {
        Some(description) => format!("{code}: {description}"),
        None => code.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authorization_display_includes_description() {
        let err = Error::Authorization {
            code: "invalid_client".into(),
            description: Some("bad secret".into()),
        };
        assert_eq!(err.to_string(), "invalid_client: bad secret");
    }

    #[test]
    fn authorization_display_without_description_is_bare_code() {
        let err = Error::Authorization {
            code: "invalid_grant".into(),
            description: None,
        };
        assert_eq!(err.to_string(), "invalid_grant");
    }

    #[test]
    fn transport_errors_convert() {
        let err: Error = transport::TransportError::Request("connection reset".into()).into();
        assert!(matches!(err, Error::Transport(_)));
        assert_eq!(err.to_string(), "transport error: request failed: connection reset");
    }

    #[test]
    fn fixed_messages() {
        assert_eq!(Error::AlreadyAuthorized.to_string(), "already authorized");
        assert_eq!(Error::InvalidToken.to_string(), "invalid access token");
    }
}
