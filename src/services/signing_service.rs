//! Sign-and-store pipeline for invoice documents.
//!
//! Orchestrates key acquisition, hashing, and signing, then persists the
//! signature sub-record onto the invoice in one atomic field update. Crypto
//! failures abort before anything is written; a persistence failure is a
//! distinct storage error. Callers retry the entire pipeline, never a single
//! step.

use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use chrono::Utc;
use uuid::Uuid;

use crate::middleware::error_handling::Result;
use crate::models::DigitalSignature;
use crate::repositories::InvoiceStore;
use crate::services::key_manager::{EphemeralKeyProvider, KeyProvider};
use crate::services::signature::{HASH_ALGORITHM, SIGNATURE_ALGORITHM};
use crate::services::{hashing, key_manager, signature};

pub struct SigningService {
    invoices: Arc<dyn InvoiceStore>,
    keys: Arc<dyn KeyProvider>,
}

impl SigningService {
    /// Signing service with the default ephemeral key provider: a fresh pair
    /// per sign call, private key discarded when the call returns.
    pub fn new(invoices: Arc<dyn InvoiceStore>) -> Self {
        Self {
            invoices,
            keys: Arc::new(EphemeralKeyProvider),
        }
    }

    pub fn with_key_provider(invoices: Arc<dyn InvoiceStore>, keys: Arc<dyn KeyProvider>) -> Self {
        Self { invoices, keys }
    }

    /// Sign `document` and persist the signature onto the invoice.
    ///
    /// The private key exists only for the duration of this call. Partial
    /// signatures are never stored: every failure path before the final
    /// write leaves the invoice's previous signature state untouched.
    pub async fn sign_and_store(
        &self,
        invoice_id: Uuid,
        document: &[u8],
    ) -> Result<DigitalSignature> {
        let pair = self.keys.acquire()?;

        let digest = hashing::sha256(document);
        let signature_bytes = signature::sign_digest(pair.private_key(), &digest)?;
        let public_key_pem = key_manager::export_public_key_pem(pair.public_key())?;

        let record = DigitalSignature {
            signature: BASE64.encode(&signature_bytes),
            public_key: public_key_pem,
            algorithm: SIGNATURE_ALGORITHM.to_string(),
            hash_algorithm: HASH_ALGORITHM.to_string(),
            created_at: Utc::now(),
        };

        self.invoices.store_signature(invoice_id, &record).await?;

        let digest_hex = hex::encode(digest);
        tracing::info!(
            "Signed invoice {} - signature: {}, hash: {}",
            invoice_id,
            &record.signature[..16],
            &digest_hex[..16]
        );

        Ok(record)
    }
}
