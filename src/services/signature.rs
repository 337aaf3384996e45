//! Signature primitives: RSASSA-PKCS1-v1_5 over a precomputed SHA-256
//! digest. Signing propagates crypto failures; verification is the single
//! source of truth for "valid right now" and never errors.

use rsa::{Pkcs1v15Sign, RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;

use crate::middleware::error_handling::{ComplianceError, Result};

/// Algorithm identifiers persisted alongside every signature.
pub const SIGNATURE_ALGORITHM: &str = "RSASSA-PKCS1-v1_5";
pub const HASH_ALGORITHM: &str = "SHA-256";

/// Sign a SHA-256 digest with the given private key.
pub fn sign_digest(key: &RsaPrivateKey, digest: &[u8]) -> Result<Vec<u8>> {
    key.sign(Pkcs1v15Sign::new::<Sha256>(), digest)
        .map_err(|e| ComplianceError::Crypto(format!("digest signing failed: {}", e)))
}

/// Verify a digest/signature/public-key triple. Returns `false` on any
/// mismatch, malformed signature bytes, or internal error.
pub fn verify_digest(key: &RsaPublicKey, signature: &[u8], digest: &[u8]) -> bool {
    key.verify(Pkcs1v15Sign::new::<Sha256>(), digest, signature)
        .is_ok()
}
