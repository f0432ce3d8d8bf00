//! Cryptographic utilities for webhook signature verification.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Computes the HMAC-SHA256 signature of `payload` with `secret` and returns
/// it as a lowercase hex string.
pub fn sign_payload(secret: &str, payload: &[u8]) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts keys of any length");
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}

/// Verifies a hex-encoded HMAC-SHA256 signature against `payload`.
///
/// Uses the underlying MAC's constant-time comparison so a mismatch cannot
/// be probed byte by byte.
pub fn verify_signature(secret: &str, payload: &[u8], signature_hex: &str) -> bool {
    let Ok(signature) = hex::decode(signature_hex) else {
        return false;
    };
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts keys of any length");
    mac.update(payload);
    mac.verify_slice(&signature).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_payload_hex_length() {
        let sig = sign_payload("secret", b"body");
        assert_eq!(sig.len(), 64);
        assert!(sig.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_sign_payload_deterministic() {
        assert_eq!(
            sign_payload("secret", b"payload"),
            sign_payload("secret", b"payload")
        );
    }

    #[test]
    fn test_roundtrip_verifies() {
        let sig = sign_payload("secret", b"{\"status\":\"PAID\"}");
        assert!(verify_signature("secret", b"{\"status\":\"PAID\"}", &sig));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let sig = sign_payload("secret", b"body");
        assert!(!verify_signature("other", b"body", &sig));
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let sig = sign_payload("secret", b"body");
        assert!(!verify_signature("secret", b"tampered", &sig));
    }

    #[test]
    fn test_invalid_hex_rejected() {
        assert!(!verify_signature("secret", b"body", "not-hex"));
        assert!(!verify_signature("secret", b"body", ""));
    }
}
