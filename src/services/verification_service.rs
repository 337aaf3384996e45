//! Signature verification with unconditional result logging.
//!
//! `verify_signature` is the library-call verdict: encode + hash the text,
//! decode the signature, import the PEM key, verify. Every failure mode -
//! mismatch, malformed base64, malformed PEM - collapses to `false`; it never
//! errors.
//!
//! `auto_verify_and_log` wraps the verdict with exactly one ValidationResult
//! row per call. Two error layers are independently non-fatal: an internal
//! verification failure still produces a `passed=false` row with its own
//! message, and a broken validation sink is logged and swallowed so the
//! boolean verdict always reaches the caller.

use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use uuid::Uuid;

use crate::middleware::error_handling::Result;
use crate::models::ValidationResult;
use crate::repositories::ValidationResultSink;
use crate::services::{hashing, key_manager, signature};

pub const SIGNATURE_MISMATCH_MESSAGE: &str = "signature mismatch or tampering detected";
pub const INTERNAL_ERROR_MESSAGE: &str = "internal error during signature verification";

/// Verify a text document against a base64 signature and PEM public key.
/// A key that fails to import means "cannot verify", i.e. `false`.
pub fn verify_signature(text: &str, signature_b64: &str, public_key_pem: &str) -> bool {
    match evaluate(text, signature_b64, public_key_pem) {
        Ok(verdict) => verdict,
        Err(err) => {
            tracing::error!("Unexpected signature verification failure: {}", err);
            false
        }
    }
}

fn evaluate(text: &str, signature_b64: &str, public_key_pem: &str) -> Result<bool> {
    let digest = hashing::sha256(hashing::encode_text(text));

    let signature_bytes = match BASE64.decode(signature_b64) {
        Ok(bytes) => bytes,
        Err(_) => return Ok(false),
    };

    let public_key = match key_manager::import_public_key_pem(public_key_pem) {
        Some(key) => key,
        None => return Ok(false),
    };

    Ok(signature::verify_digest(&public_key, &signature_bytes, &digest))
}

pub struct VerificationService {
    validations: Arc<dyn ValidationResultSink>,
}

impl VerificationService {
    pub fn new(validations: Arc<dyn ValidationResultSink>) -> Self {
        Self { validations }
    }

    /// Verify and append exactly one validation-result row describing the
    /// outcome. Returns the verdict regardless of sink health.
    pub async fn auto_verify_and_log(
        &self,
        invoice_id: Uuid,
        text: &str,
        signature_b64: &str,
        public_key_pem: &str,
    ) -> bool {
        let (passed, errors) = match evaluate(text, signature_b64, public_key_pem) {
            Ok(true) => (true, Vec::new()),
            Ok(false) => (false, vec![SIGNATURE_MISMATCH_MESSAGE.to_string()]),
            Err(err) => {
                tracing::error!(
                    "Unexpected verification failure for invoice {}: {}",
                    invoice_id,
                    err
                );
                (false, vec![INTERNAL_ERROR_MESSAGE.to_string()])
            }
        };

        if passed {
            tracing::info!("Signature verified for invoice {}", invoice_id);
        } else {
            tracing::warn!("Signature verification FAILED for invoice {}", invoice_id);
        }

        let row = ValidationResult::digital_signature(invoice_id, passed, errors);
        if let Err(err) = self.validations.append(&row).await {
            tracing::error!(
                "Failed to record validation result for invoice {}: {}",
                invoice_id,
                err
            );
        }

        passed
    }
}
