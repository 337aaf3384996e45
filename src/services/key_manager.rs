//! Ephemeral RSA signing key pairs and the PEM container for their public
//! halves.
//!
//! Each sign operation acquires a fresh 2048-bit pair and discards the
//! private key when the call returns; only the public key ever reaches
//! persistent storage, embedded next to the signature it verifies. Key
//! acquisition sits behind [`KeyProvider`] so a durable, rotatable signer can
//! replace the ephemeral default without touching the signing pipeline.

use rsa::pkcs8::{DecodePublicKey, EncodePublicKey, LineEnding};
use rsa::{RsaPrivateKey, RsaPublicKey};

use crate::middleware::error_handling::{ComplianceError, Result};

/// Fixed modulus size for all signing keys (public exponent 65537).
pub const RSA_KEY_BITS: usize = 2048;

/// A freshly generated signing key pair. The private half never leaves the
/// scope of the sign operation that acquired it.
pub struct SigningKeyPair {
    private: RsaPrivateKey,
    public: RsaPublicKey,
}

impl SigningKeyPair {
    pub fn private_key(&self) -> &RsaPrivateKey {
        &self.private
    }

    pub fn public_key(&self) -> &RsaPublicKey {
        &self.public
    }
}

/// Generate a fresh RSA-2048 key pair. Fails only on catastrophic crypto
/// provider failure.
pub fn generate_keypair() -> Result<SigningKeyPair> {
    let mut rng = rand::thread_rng();
    let private = RsaPrivateKey::new(&mut rng, RSA_KEY_BITS)
        .map_err(|e| ComplianceError::Crypto(format!("RSA key generation failed: {}", e)))?;
    let public = private.to_public_key();
    Ok(SigningKeyPair { private, public })
}

/// Serialize a public key into its SPKI PEM container: fixed
/// `-----BEGIN PUBLIC KEY-----` markers with a 64-character-wrapped base64
/// body. Exactly reversible by [`import_public_key_pem`].
pub fn export_public_key_pem(key: &RsaPublicKey) -> Result<String> {
    key.to_public_key_pem(LineEnding::LF)
        .map_err(|e| ComplianceError::Crypto(format!("public key PEM export failed: {}", e)))
}

/// Reconstruct a verify-only public key from its PEM container. Returns
/// `None` on any malformed input - callers treat `None` as "cannot verify",
/// i.e. as a verification failure, never as a crash.
pub fn import_public_key_pem(pem: &str) -> Option<RsaPublicKey> {
    RsaPublicKey::from_public_key_pem(pem).ok()
}

/// Seam for key custody. The shipped implementation is ephemeral; a durable
/// key store with versioned identifiers can be substituted here.
pub trait KeyProvider: Send + Sync {
    fn acquire(&self) -> Result<SigningKeyPair>;
}

/// Fresh pair per call, private key dropped at the end of the signing scope.
/// There is no durable signer identity, no rotation, no re-signing.
pub struct EphemeralKeyProvider;

impl KeyProvider for EphemeralKeyProvider {
    fn acquire(&self) -> Result<SigningKeyPair> {
        generate_keypair()
    }
}
