//! Bybit V5 request signing.
//!
//! The signed payload is
//!
//! ```text
//! timestamp || api_key || key1 || value1 || key2 || value2 ...
//! ```
//!
//! with the parameters taken in ascending key order and no separators. The
//! HMAC-SHA256 digest of that payload, keyed by the API secret, is sent as
//! lowercase hex in the `X-BAPI-SIGN` header.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::params::ParamSet;

type HmacSha256 = Hmac<Sha256>;

/// Compute an HMAC-SHA256 signature and return it as a lowercase hex string.
///
/// An empty secret is accepted and yields a well-defined (useless) signature.
pub fn hmac_sha256_sign(secret: &str, message: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(message.as_bytes());
    let result = mac.finalize();
    hex::encode(result.into_bytes())
}

/// Build the canonical string that gets signed.
pub fn canonical_payload(params: &ParamSet, api_key: &str, timestamp: i64) -> String {
    let mut payload = String::with_capacity(32 + api_key.len() + params.len() * 16);
    payload.push_str(&timestamp.to_string());
    payload.push_str(api_key);
    for (k, v) in params.iter() {
        payload.push_str(k);
        payload.push_str(v);
    }
    payload
}

/// Sign a parameter set for the given credentials and millisecond timestamp.
pub fn sign(params: &ParamSet, api_key: &str, api_secret: &str, timestamp: i64) -> String {
    hmac_sha256_sign(api_secret, &canonical_payload(params, api_key, timestamp))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TS: i64 = 1_700_000_000_000;

    fn sample() -> ParamSet {
        ParamSet::from([("category", "spot"), ("symbol", "BTCUSDT")])
    }

    #[test]
    fn canonical_payload_layout() {
        assert_eq!(
            canonical_payload(&sample(), "test-key", TS),
            "1700000000000test-keycategoryspotsymbolBTCUSDT"
        );
    }

    #[test]
    fn known_vector() {
        assert_eq!(
            sign(&sample(), "test-key", "test-secret", TS),
            "1bb26ef65a8dd429cbb582ae557cbae1f87f33e1dc23afa1151cf184d43c1afb"
        );
    }

    #[test]
    fn empty_params_and_empty_secret() {
        assert_eq!(
            sign(&ParamSet::new(), "test-key", "test-secret", TS),
            "787ae15e15b7cef95616b9c13256fd3a1d342e8d3835ffe4991869a9ac74a987"
        );
        assert_eq!(
            sign(&ParamSet::new(), "test-key", "", TS),
            "3dfe1bb89d1a8acaf7781bd0e2de8e50933850bd26d51cf687a92abe41c12bfd"
        );
    }

    #[test]
    fn insertion_order_independent() {
        let mut a = ParamSet::new();
        a.insert("symbol", "BTCUSDT").insert("category", "spot").insert("limit", "10");
        let mut b = ParamSet::new();
        b.insert("limit", "10").insert("category", "spot").insert("symbol", "BTCUSDT");
        assert_eq!(sign(&a, "k", "s", TS), sign(&b, "k", "s", TS));
    }

    #[test]
    fn every_input_changes_the_signature() {
        let base = sign(&sample(), "test-key", "test-secret", TS);

        let mut changed = sample();
        changed.insert("symbol", "BTCUSDC");
        assert_ne!(base, sign(&changed, "test-key", "test-secret", TS));

        assert_ne!(base, sign(&sample(), "test-kez", "test-secret", TS));
        assert_ne!(base, sign(&sample(), "test-key", "test-secres", TS));
        assert_ne!(base, sign(&sample(), "test-key", "test-secret", TS + 1));
    }

    #[test]
    fn output_is_lowercase_hex() {
        let sig = sign(&sample(), "k", "s", TS);
        assert_eq!(sig.len(), 64);
        assert!(sig.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }
}
