//! SHA-256 digests over byte buffers, plus the canonical text->bytes
//! encoding applied before hashing. Hash equality is defined over the byte
//! form, never over abstract text - every caller that hashes text must go
//! through `encode_text` so independent implementations stay verifiable.

use sha2::{Digest, Sha256};

/// Deterministic SHA-256 over the given bytes. No side effects; identical
/// input always yields the identical digest.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// Lowercase hex form of the SHA-256 digest, as persisted in
/// `Invoice::document_hash`.
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(sha256(data))
}

/// Canonical UTF-8 byte form of a text document. Rust `str` is UTF-8 by
/// construction; this function fixes the encoding at the API boundary.
pub fn encode_text(text: &str) -> &[u8] {
    text.as_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_matches_known_vector() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn sha256_is_deterministic() {
        let payload = b"Invoice #1001, total 119.00 EUR";
        assert_eq!(sha256(payload), sha256(payload));
        assert_ne!(sha256(payload), sha256(b"Invoice #1001, total 120.00 EUR"));
    }

    #[test]
    fn text_hashing_goes_through_byte_encoding() {
        let text = "Rechnung \u{00fc}ber 119,00 \u{20ac}";
        assert_eq!(sha256_hex(encode_text(text)), sha256_hex(text.as_bytes()));
    }
}
