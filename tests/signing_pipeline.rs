// End-to-end signing pipeline: sign-and-store onto an invoice record, then
// verify through the public library calls with unconditional result logging.

mod common;

use std::sync::Arc;

use chrono::Utc;

use common::{sent_invoice, InMemoryInvoiceStore, RecordingValidationSink, UnreachableValidationSink};
use fakturo_compliance::models::{ValidationType, VALIDATOR_VERSION};
use fakturo_compliance::services::verification_service::{
    verify_signature, SIGNATURE_MISMATCH_MESSAGE,
};
use fakturo_compliance::services::{SigningService, VerificationService};

const DOCUMENT: &str = "Invoice #1001, total 119.00 EUR";

#[tokio::test]
async fn sign_store_verify_roundtrip() {
    let store = Arc::new(InMemoryInvoiceStore::default());
    let invoice = sent_invoice("INV-1001", None, Utc::now());
    let invoice_id = invoice.id;
    store.insert(invoice).await;

    let signing = SigningService::new(store.clone());
    let record = signing
        .sign_and_store(invoice_id, DOCUMENT.as_bytes())
        .await
        .unwrap();

    // The signature sub-record landed on the invoice.
    let stored = store.get(invoice_id).await;
    let stored_signature = stored.digital_signature.expect("signature persisted");
    assert_eq!(stored_signature.signature, record.signature);
    assert_eq!(stored_signature.algorithm, "RSASSA-PKCS1-v1_5");
    assert_eq!(stored_signature.hash_algorithm, "SHA-256");

    // Fresh key pair per signature: a second sign replaces the record with a
    // different ephemeral public key.
    let second = signing
        .sign_and_store(invoice_id, DOCUMENT.as_bytes())
        .await
        .unwrap();
    assert_ne!(second.public_key, record.public_key);

    // Each signature verifies against its own embedded public key only.
    assert!(verify_signature(DOCUMENT, &record.signature, &record.public_key));
    assert!(verify_signature(DOCUMENT, &second.signature, &second.public_key));
    assert!(!verify_signature(DOCUMENT, &record.signature, &second.public_key));
    assert!(!verify_signature(
        "Invoice #1001, total 120.00 EUR",
        &record.signature,
        &record.public_key
    ));
}

#[tokio::test]
async fn auto_verify_logs_one_row_per_call() {
    let store = Arc::new(InMemoryInvoiceStore::default());
    let invoice = sent_invoice("INV-1001", None, Utc::now());
    let invoice_id = invoice.id;
    store.insert(invoice).await;

    let record = SigningService::new(store.clone())
        .sign_and_store(invoice_id, DOCUMENT.as_bytes())
        .await
        .unwrap();

    let sink = Arc::new(RecordingValidationSink::default());
    let verification = VerificationService::new(sink.clone());

    let passed = verification
        .auto_verify_and_log(invoice_id, DOCUMENT, &record.signature, &record.public_key)
        .await;
    assert!(passed);

    let failed = verification
        .auto_verify_and_log(
            invoice_id,
            "Invoice #1001, total 120.00 EUR",
            &record.signature,
            &record.public_key,
        )
        .await;
    assert!(!failed);

    let rows = sink.rows.read().await;
    assert_eq!(rows.len(), 2);

    assert!(rows[0].passed);
    assert_eq!(rows[0].validation_type, ValidationType::DigitalSignature);
    assert_eq!(rows[0].validator_version, VALIDATOR_VERSION);
    assert!(rows[0].error_messages.is_empty());
    assert!(rows[0].warning_messages.is_empty());

    assert!(!rows[1].passed);
    assert_eq!(
        rows[1].error_messages,
        vec![SIGNATURE_MISMATCH_MESSAGE.to_string()]
    );
}

#[tokio::test]
async fn verdict_is_correct_even_when_the_sink_is_down() {
    let store = Arc::new(InMemoryInvoiceStore::default());
    let invoice = sent_invoice("INV-1001", None, Utc::now());
    let invoice_id = invoice.id;
    store.insert(invoice).await;

    let record = SigningService::new(store.clone())
        .sign_and_store(invoice_id, DOCUMENT.as_bytes())
        .await
        .unwrap();

    let verification = VerificationService::new(Arc::new(UnreachableValidationSink));

    assert!(
        verification
            .auto_verify_and_log(invoice_id, DOCUMENT, &record.signature, &record.public_key)
            .await
    );
    assert!(
        !verification
            .auto_verify_and_log(invoice_id, "tampered", &record.signature, &record.public_key)
            .await
    );
}
