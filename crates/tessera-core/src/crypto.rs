use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use sha2::{Digest, Sha256};

use crate::traits::SignatureVerifier;
use crate::types::EventDigest;

/// Derive a content-addressed event digest.
///
/// Formula: "E" + hex(SHA-256(content))
///
/// The leading marker distinguishes self-addressing digests from other
/// identifier material in logs and fixtures. Digest comparison elsewhere
/// in the engine is exact string match; nothing re-derives digests from
/// content during verification.
pub fn content_digest(content: &[u8]) -> EventDigest {
    let hash = Sha256::digest(content);
    EventDigest::new(format!("E{}", hex::encode(hash)))
}

// ---------------------------------------------------------------------------
// Ed25519Verifier — default adapter for the injected primitive
// ---------------------------------------------------------------------------

/// Ed25519 implementation of [`SignatureVerifier`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519Verifier;

impl SignatureVerifier for Ed25519Verifier {
    fn verify(&self, public_key: &[u8], message: &[u8], signature: &[u8]) -> bool {
        if public_key.len() != 32 || signature.len() != 64 {
            return false;
        }
        let mut key_bytes = [0u8; 32];
        key_bytes.copy_from_slice(public_key);
        let Ok(verifying_key) = VerifyingKey::from_bytes(&key_bytes) else {
            return false;
        };
        let mut sig_bytes = [0u8; 64];
        sig_bytes.copy_from_slice(signature);
        let sig = Signature::from_bytes(&sig_bytes);
        verifying_key.verify(message, &sig).is_ok()
    }
}
