//! Secret wrapper for credential material
//!
//! The application secret participates in every request signature and must
//! never reach logs or error output. Wrapping it in `Secret` makes that a
//! type-level guarantee: `Debug` and `Display` render `[REDACTED]`, and the
//! inner value is zeroed on drop.

use std::fmt;
use zeroize::Zeroize;

/// Sensitive value - redacted in Debug/Display/logs, zeroed on drop.
pub struct Secret<T: Zeroize>(T);

impl<T: Zeroize> Secret<T> {
    /// Wrap a sensitive value.
    pub fn new(value: T) -> Self {
        Self(value)
    }

    /// Expose the inner value. Call sites are the audit surface for where
    /// the secret actually leaves the wrapper (signing, wire encoding).
    pub fn expose(&self) -> &T {
        &self.0
    }
}

impl<T: Zeroize> fmt::Debug for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl<T: Zeroize> fmt::Display for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl<T: Zeroize> Drop for Secret<T> {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl<T: Zeroize + Clone> Clone for Secret<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl From<&str> for Secret<String> {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for Secret<String> {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_and_display_are_redacted() {
        let secret = Secret::new(String::from("s3cr3t"));
        assert_eq!(format!("{:?}", secret), "[REDACTED]");
        assert_eq!(format!("{}", secret), "[REDACTED]");
    }

    #[test]
    fn redaction_survives_embedding_in_larger_output() {
        #[derive(Debug)]
        #[allow(dead_code)]
        struct Holder {
            app_id: String,
            api_secret: Secret<String>,
        }

        let holder = Holder {
            app_id: "42".into(),
            api_secret: "s3cr3t".into(),
        };
        let debug = format!("{holder:?}");
        assert!(!debug.contains("s3cr3t"), "secret leaked: {debug}");
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn expose_returns_the_value() {
        let secret: Secret<String> = "s3cr3t".into();
        assert_eq!(secret.expose(), "s3cr3t");
    }

    #[test]
    fn clone_preserves_the_value() {
        let secret: Secret<String> = Secret::new("token".into());
        let cloned = secret.clone();
        assert_eq!(cloned.expose(), "token");
    }
}
