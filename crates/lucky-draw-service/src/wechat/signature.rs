//! Handshake signature verification.
//!
//! The platform signs each request with
//! `sha1(sort([token, timestamp, nonce]).join(""))`, hex-encoded. The token is
//! shared configuration and never travels with the request.
//!
//! A request starts out as a [`SignedRequest`] and can only become a
//! [`VerifiedRequest`] through [`SignedRequest::verify`]. Verification is
//! attempted once per request.

use crate::crypto::{constant_time_eq, sha1_hex};

/// Signature parameters of an inbound request that has not been checked yet.
#[derive(Debug, Clone)]
pub struct SignedRequest {
    signature: String,
    timestamp: String,
    nonce: String,
}

/// A request whose signature matched the configured token.
#[derive(Debug, Clone)]
pub struct VerifiedRequest {
    /// Timestamp the platform signed.
    pub timestamp: String,
    /// Nonce the platform signed.
    pub nonce: String,
}

/// The request signature did not match.
///
/// Carries no detail on purpose: callers answer with an empty body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("signature mismatch")]
pub struct SignatureMismatch;

impl SignedRequest {
    /// Wrap the signature parameters of a request.
    #[must_use]
    pub fn new(
        signature: impl Into<String>,
        timestamp: impl Into<String>,
        nonce: impl Into<String>,
    ) -> Self {
        Self {
            signature: signature.into(),
            timestamp: timestamp.into(),
            nonce: nonce.into(),
        }
    }

    /// Check the signature against `token`, consuming the unverified request.
    ///
    /// # Errors
    ///
    /// Returns `SignatureMismatch` unless the hex digest matches exactly.
    pub fn verify(self, token: &str) -> Result<VerifiedRequest, SignatureMismatch> {
        if verify(token, &self.timestamp, &self.nonce, &self.signature) {
            Ok(VerifiedRequest {
                timestamp: self.timestamp,
                nonce: self.nonce,
            })
        } else {
            Err(SignatureMismatch)
        }
    }
}

/// Compute the signature the platform would send for these parameters.
#[must_use]
pub fn expected_signature(token: &str, timestamp: &str, nonce: &str) -> String {
    let mut parts = [token, timestamp, nonce];
    parts.sort_unstable();
    sha1_hex(&parts.concat())
}

/// Whether `signature` is the platform signature for these parameters.
///
/// The comparison is case-sensitive and constant-time.
#[must_use]
pub fn verify(token: &str, timestamp: &str, nonce: &str, signature: &str) -> bool {
    constant_time_eq(&expected_signature(token, timestamp, nonce), signature)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parts_are_sorted_before_hashing() {
        // "1" < "2" < "t"
        assert_eq!(expected_signature("t", "2", "1"), sha1_hex("12t"));
    }

    #[test]
    fn verifies_matching_signature() {
        let signature = sha1_hex("12t");
        assert!(verify("t", "2", "1", &signature));

        let verified = SignedRequest::new(signature, "2", "1").verify("t").unwrap();
        assert_eq!(verified.timestamp, "2");
        assert_eq!(verified.nonce, "1");
    }

    #[test]
    fn any_single_character_mutation_fails() {
        let signature = sha1_hex("12t");
        for i in 0..signature.len() {
            let mut bytes = signature.clone().into_bytes();
            bytes[i] = if bytes[i] == b'0' { b'1' } else { b'0' };
            let mutated = String::from_utf8(bytes).unwrap();
            assert!(!verify("t", "2", "1", &mutated), "position {i}");
        }
    }

    #[test]
    fn comparison_is_case_sensitive() {
        let upper = sha1_hex("12t").to_uppercase();
        assert!(!verify("t", "2", "1", &upper));
    }

    #[test]
    fn wrong_token_fails() {
        let signature = expected_signature("token-a", "1700000000", "42");
        let result = SignedRequest::new(signature, "1700000000", "42").verify("token-b");
        assert_eq!(result.unwrap_err(), SignatureMismatch);
    }

    #[test]
    fn empty_signature_fails() {
        assert!(!verify("t", "2", "1", ""));
    }
}
