//! Payload signatures.
//!
//! LiqPay signs `data` as `base64(sha1(private_key + data + private_key))`
//! over the raw digest bytes. The construction is fixed by the gateway and is
//! not an HMAC.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use sha1::{Digest, Sha1};

/// Signs an encoded payload with the merchant's private key
pub fn sign(private_key: &str, payload: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(private_key.as_bytes());
    hasher.update(payload.as_bytes());
    hasher.update(private_key.as_bytes());
    STANDARD.encode(hasher.finalize())
}

/// Checks a counterparty's signature. An empty signature never matches.
pub fn verify(private_key: &str, payload: &str, signature: &str) -> bool {
    if signature.is_empty() {
        return false;
    }

    let expected = sign(private_key, payload);
    constant_time_eq(expected.as_bytes(), signature.as_bytes())
}

fn constant_time_eq(lhs: &[u8], rhs: &[u8]) -> bool {
    if lhs.len() != rhs.len() {
        return false;
    }
    let mut diff = 0u8;
    for (a, b) in lhs.iter().zip(rhs.iter()) {
        diff |= a ^ b;
    }
    diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATA: &str = "eyJ2ZXJzaW9uIjoiMyIsImFjdGlvbiI6InBheSIsImFtb3VudCI6IjEyMy40NSIsImN1cnJlbmN5IjoiVUFIIiwiZGVzY3JpcHRpb24iOiJUZXN0Iiwib3JkZXJfaWQiOiIxMjMiLCJsYW5ndWFnZSI6InJ1IiwicHVibGljX2tleSI6InB1YjEifQ==";

    #[test]
    fn test_sign_known_vectors() {
        assert_eq!(sign("priv1", DATA), "ZVhjOWrvN3TVxoBGSsC64azRtyw=");
        assert_eq!(sign("priv1", "hello"), "dara7BYRf/puEQvnrfUekLlX/lo=");
        assert_eq!(sign("a", ""), "4MkDWJjdUvxlxBRUzsnE0mEb+zc=");
    }

    #[test]
    fn test_sign_is_deterministic() {
        assert_eq!(sign("priv1", DATA), sign("priv1", DATA));
    }

    #[test]
    fn test_one_byte_changes_signature() {
        let base = sign("priv1", "hello");
        assert_eq!(sign("priv1", "hellp"), "DgO8iaWANotBcMU7Ce5w6Tocjkw=");
        assert_ne!(sign("priv1", "hellp"), base);
        assert_eq!(sign("priv2", "hello"), "PNxjpXuHKA+E/3i5pBY+F81r44I=");
        assert_ne!(sign("priv2", "hello"), base);
    }

    #[test]
    fn test_verify() {
        let signature = sign("priv1", DATA);
        assert!(verify("priv1", DATA, &signature));
        assert!(!verify("priv2", DATA, &signature));
        assert!(!verify("priv1", "eyJ9", &signature));
        assert!(!verify("priv1", DATA, ""));
        // Prefix of a valid signature
        assert!(!verify("priv1", DATA, &signature[..10]));
    }
}
