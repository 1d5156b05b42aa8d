//! Webhook signature verification.
//!
//! Every webhook delivery carries an `x-line-signature` header: the base64
//! encoding of an HMAC-SHA256 digest of the raw request body, keyed with the
//! channel secret. The digest must be computed over the exact transport
//! bytes; re-serializing the JSON can reorder fields or change whitespace
//! and silently break verification.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Verifies webhook signatures for one channel.
///
/// Keyed with the channel secret at construction; [`verify`](Self::verify)
/// has no side effects and no request-ordering dependence.
#[derive(Clone)]
pub struct SignatureVerifier {
    mac: HmacSha256,
}

impl SignatureVerifier {
    /// Creates a verifier keyed with the given channel secret.
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        let mac = HmacSha256::new_from_slice(secret.as_ref())
            .expect("HMAC can accept any key length");
        Self { mac }
    }

    /// Computes the base64 signature for `body`.
    ///
    /// This is the value the platform would send in `x-line-signature` for
    /// that exact byte sequence.
    pub fn sign(&self, body: &[u8]) -> String {
        let mut mac = self.mac.clone();
        mac.update(body);
        STANDARD.encode(mac.finalize().into_bytes())
    }

    /// Checks a base64 `signature` against the digest of `body`.
    ///
    /// Returns `false` for any mismatch, including signatures that are not
    /// valid base64; verification failure is never an error. The digest
    /// comparison is constant-time.
    pub fn verify(&self, body: &[u8], signature: &str) -> bool {
        let Ok(provided) = STANDARD.decode(signature) else {
            return false;
        };
        let mut mac = self.mac.clone();
        mac.update(body);
        mac.verify_slice(&provided).is_ok()
    }
}

impl std::fmt::Debug for SignatureVerifier {
    // The key must not appear in debug output.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignatureVerifier").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_then_verify() {
        let verifier = SignatureVerifier::new("secret");
        let body = br#"{"events":[]}"#;
        let signature = verifier.sign(body);
        assert!(verifier.verify(body, &signature));
    }

    #[test]
    fn test_known_digest() {
        // HMAC-SHA256("secret", "hello") in base64.
        let verifier = SignatureVerifier::new("secret");
        assert_eq!(verifier.sign(b"hello"), "iKqz7ejTrflNJquQ07r9SiCDBww7zOnAFO4EpEOEfAs=");
    }

    #[test]
    fn test_tampered_signature_fails() {
        let verifier = SignatureVerifier::new("secret");
        let body = b"payload bytes";
        let mut signature = verifier.sign(body).into_bytes();
        // Flip one bit of the first base64 character.
        signature[0] ^= 0x01;
        let signature = String::from_utf8(signature).unwrap();
        assert!(!verifier.verify(body, &signature));
    }

    #[test]
    fn test_wrong_secret_fails() {
        let signer = SignatureVerifier::new("secret-a");
        let verifier = SignatureVerifier::new("secret-b");
        let body = b"payload bytes";
        let signature = signer.sign(body);
        assert!(!verifier.verify(body, &signature));
    }

    #[test]
    fn test_modified_body_fails() {
        let verifier = SignatureVerifier::new("secret");
        let signature = verifier.sign(b"original");
        assert!(!verifier.verify(b"modified", &signature));
    }

    #[test]
    fn test_malformed_signature_is_false_not_error() {
        let verifier = SignatureVerifier::new("secret");
        assert!(!verifier.verify(b"body", ""));
        assert!(!verifier.verify(b"body", "not base64 at all!!!"));
        assert!(!verifier.verify(b"body", "TWFu")); // valid base64, wrong digest
    }

    #[test]
    fn test_signature_covers_exact_bytes_not_reserialized_json() {
        let verifier = SignatureVerifier::new("secret");
        // Same JSON document, different byte sequences.
        let spaced = br#"{ "events": [] }"#;
        let compact = br#"{"events":[]}"#;
        let signature = verifier.sign(spaced);
        assert!(verifier.verify(spaced, &signature));
        assert!(!verifier.verify(compact, &signature));
    }
}
