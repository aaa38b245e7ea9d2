//! Credential State for a VK client session
//!
//! Holds the application identity, the optional access token, and the
//! authorization flag. Pure data plus invariant enforcement — no I/O.
//!
//! Invariant: `authorized == true` implies an access token is present and
//! was confirmed valid by the gateway at the moment it was set. Only the
//! authorization flow flips the flag; there is no background re-validation.
//!
//! Single owner per session: every state-changing operation borrows
//! `&mut self`, so the borrow checker statically serializes the
//! authorization-mutating paths (code exchange, direct token assignment).

use common::Secret;

/// Application identity plus authorization state.
#[derive(Debug)]
pub struct Credentials {
    app_id: String,
    api_secret: Secret<String>,
    api_version: Option<String>,
    access_token: Option<String>,
    authorized: bool,
}

impl Credentials {
    /// Create state for an application. `app_id` and `api_secret` are
    /// immutable for the lifetime of the session.
    pub fn new(app_id: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            api_secret: Secret::new(api_secret.into()),
            api_version: None,
            access_token: None,
            authorized: false,
        }
    }

    /// Create state with a token obtained elsewhere. The token is stored
    /// but the session stays unauthorized until the gateway validates it.
    pub fn with_access_token(
        app_id: impl Into<String>,
        api_secret: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        let mut credentials = Self::new(app_id, api_secret);
        credentials.access_token = Some(access_token.into());
        credentials
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    /// The application secret, for signing and wire encoding only.
    pub(crate) fn api_secret(&self) -> &str {
        self.api_secret.expose()
    }

    pub fn api_version(&self) -> Option<&str> {
        self.api_version.as_deref()
    }

    /// Pin an API version. No validation; overwrites any previous pin and
    /// applies to every subsequent request.
    pub fn set_api_version(&mut self, version: impl Into<String>) {
        self.api_version = Some(version.into());
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    pub fn is_authorized(&self) -> bool {
        self.authorized
    }

    /// Store a token the gateway just confirmed valid and mark the session
    /// authorized. The only path that sets the flag.
    pub(crate) fn install_token(&mut self, token: String) {
        self.access_token = Some(token);
        self.authorized = true;
    }

    /// Drop to unauthorized without touching the stored token.
    pub(crate) fn mark_unauthorized(&mut self) {
        self.authorized = false;
    }
}
