//! Request signing
//!
//! Every API call carries a `sig` parameter authenticating it: the MD5 hex
//! digest of the key-sorted `key=value` concatenation (no separator between
//! pairs) with the raw application secret appended. The secret therefore
//! enters the digest twice — once as the `client_secret` parameter inside
//! the sorted mapping and once as the trailing suffix.
//!
//! `BTreeMap` provides the ordinal (byte-wise) key ordering the signature
//! depends on, so callers may supply parameters in any order.

use std::collections::BTreeMap;

use md5::{Digest, Md5};

/// Per-request values the gateway mixes into the signed mapping.
pub(crate) struct SignContext<'a> {
    pub app_id: &'a str,
    pub secret: &'a str,
    pub access_token: Option<&'a str>,
    pub api_version: Option<&'a str>,
    /// Current Unix time in seconds.
    pub timestamp: u64,
    /// Random value in `0..=10000`, replay-noise only.
    pub nonce: u32,
}

/// Compute the signature over an already-sorted parameter mapping.
///
/// Pure and deterministic: the result depends only on the entries and the
/// secret. The mapping must not yet contain `sig`.
pub fn sign(params: &BTreeMap<String, String>, secret: &str) -> String {
    let mut payload = String::new();
    for (key, value) in params {
        payload.push_str(key);
        payload.push('=');
        payload.push_str(value);
    }
    payload.push_str(secret);

    Md5::digest(payload.as_bytes())
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect()
}

/// Augment the caller's parameters with the authentication set, sign the
/// result, and return the full mapping including `sig`.
pub(crate) fn signed_params(
    params: &[(&str, &str)],
    context: &SignContext<'_>,
) -> BTreeMap<String, String> {
    let mut params: BTreeMap<String, String> = params
        .iter()
        .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
        .collect();

    params.insert("timestamp".into(), context.timestamp.to_string());
    params.insert("api_id".into(), context.app_id.to_owned());
    params.insert("random".into(), context.nonce.to_string());
    params.insert("client_secret".into(), context.secret.to_owned());
    if let Some(token) = context.access_token {
        params.insert("access_token".into(), token.to_owned());
    }
    if let Some(version) = context.api_version {
        params.insert("v".into(), version.to_owned());
    }

    let sig = sign(&params, context.secret);
    params.insert("sig".into(), sig);
    params
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context<'a>() -> SignContext<'a> {
        SignContext {
            app_id: "42",
            secret: "s3cr3t",
            access_token: None,
            api_version: None,
            timestamp: 1_700_000_000,
            nonce: 4242,
        }
    }

    #[test]
    fn empty_input_matches_known_md5_vectors() {
        // MD5("") and MD5("a") are fixed reference digests.
        assert_eq!(
            sign(&BTreeMap::new(), ""),
            "d41d8cd98f00b204e9800998ecf8427e"
        );
        assert_eq!(
            sign(&BTreeMap::new(), "a"),
            "0cc175b9c0f1b6a831c399e269772661"
        );
    }

    #[test]
    fn signature_is_deterministic() {
        let params = signed_params(&[("user_id", "1")], &context());
        let again = signed_params(&[("user_id", "1")], &context());
        assert_eq!(params.get("sig"), again.get("sig"));
    }

    #[test]
    fn parameter_order_does_not_matter() {
        let forward = signed_params(&[("a", "1"), ("b", "2")], &context());
        let reversed = signed_params(&[("b", "2"), ("a", "1")], &context());
        assert_eq!(forward.get("sig"), reversed.get("sig"));
    }

    #[test]
    fn timestamp_changes_the_signature() {
        let first = signed_params(&[("user_id", "1")], &context());
        let later = signed_params(
            &[("user_id", "1")],
            &SignContext {
                timestamp: 1_700_000_001,
                ..context()
            },
        );
        assert_ne!(first.get("sig"), later.get("sig"));
    }

    #[test]
    fn nonce_changes_the_signature() {
        let first = signed_params(&[("user_id", "1")], &context());
        let other = signed_params(
            &[("user_id", "1")],
            &SignContext {
                nonce: 17,
                ..context()
            },
        );
        assert_ne!(first.get("sig"), other.get("sig"));
    }

    #[test]
    fn secret_changes_the_signature() {
        let params = BTreeMap::from([("a".to_owned(), "1".to_owned())]);
        assert_ne!(sign(&params, "s3cr3t"), sign(&params, "other"));
    }

    #[test]
    fn augmented_mapping_carries_the_authentication_set() {
        let params = signed_params(&[("user_id", "1")], &context());
        assert_eq!(params.get("api_id").map(String::as_str), Some("42"));
        assert_eq!(params.get("timestamp").map(String::as_str), Some("1700000000"));
        assert_eq!(params.get("random").map(String::as_str), Some("4242"));
        assert_eq!(params.get("client_secret").map(String::as_str), Some("s3cr3t"));
        assert_eq!(params.get("user_id").map(String::as_str), Some("1"));
        assert!(!params.contains_key("access_token"));
        assert!(!params.contains_key("v"));
    }

    #[test]
    fn token_and_version_are_included_when_set() {
        let params = signed_params(
            &[],
            &SignContext {
                access_token: Some("abc"),
                api_version: Some("5.199"),
                ..context()
            },
        );
        assert_eq!(params.get("access_token").map(String::as_str), Some("abc"));
        assert_eq!(params.get("v").map(String::as_str), Some("5.199"));
    }

    #[test]
    fn sig_is_lowercase_hex() {
        let params = signed_params(&[("user_id", "1")], &context());
        let sig = params.get("sig").unwrap();
        assert_eq!(sig.len(), 32);
        assert!(sig.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn sig_recomputes_from_the_sorted_mapping() {
        let mut params = signed_params(&[("user_id", "1")], &context());
        let sig = params.remove("sig").unwrap();
        assert_eq!(sig, sign(&params, "s3cr3t"));
    }
}
