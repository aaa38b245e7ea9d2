//! VK endpoint constants
//!
//! Fixed URLs of the remote service. These are not configuration — the
//! protocol pins them — so they live here rather than in any config layer.

/// Authorization endpoint the user visits to grant access.
pub const AUTHORIZE_URL: &str = "https://oauth.vk.com/authorize";

/// Token endpoint for the one-time code exchange.
pub const ACCESS_TOKEN_URL: &str = "https://oauth.vk.com/access_token";

/// Base of the method invocation endpoint; `<method>.<format>` is appended.
pub const API_URL: &str = "https://api.vk.com/method/";

/// Default OAuth landing page used when the caller supplies no redirect URI.
pub const DEFAULT_CALLBACK_URL: &str = "https://api.vk.com/blank.html";

/// Lightweight authenticated method used to probe whether a token is live.
pub const VALIDATION_METHOD: &str = "getUserSettings";
