use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Invoice lifecycle status. Only `sent` invoices are eligible for signing
/// and archival; drafts are still mutable and archived invoices are frozen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Draft,
    Sent,
    Archived,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &str {
        match self {
            InvoiceStatus::Draft => "draft",
            InvoiceStatus::Sent => "sent",
            InvoiceStatus::Archived => "archived",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "draft" => Some(InvoiceStatus::Draft),
            "sent" => Some(InvoiceStatus::Sent),
            "archived" => Some(InvoiceStatus::Archived),
            _ => None,
        }
    }
}

/// The signature sub-record persisted onto an invoice by the sign-and-store
/// pipeline. At most one active signature exists per invoice; a re-sign
/// replaces the whole sub-record in a single field update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DigitalSignature {
    /// Base64-encoded RSASSA-PKCS1-v1_5 signature over the document digest.
    pub signature: String,
    /// SPKI PEM container for the (ephemeral) public key.
    pub public_key: String,
    pub algorithm: String,
    pub hash_algorithm: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    pub id: Uuid,
    pub invoice_number: String,
    /// Line items and taxes are computed upstream; this core only carries
    /// the total through audit snapshots.
    pub total_amount: Decimal,
    pub status: InvoiceStatus,
    /// Public URL of the rendered invoice document in blob storage.
    pub document_url: Option<String>,
    pub digital_signature: Option<DigitalSignature>,
    /// Hex SHA-256 digest recorded at archival time. Never overwritten after
    /// a mismatch - it is the forensic reference for tamper review.
    pub document_hash: Option<String>,
    pub gobd_compliant: bool,
    pub gobd_compliance_failed: bool,
    pub retention_period_years: Option<i32>,
    pub retention_started_at: Option<DateTime<Utc>>,
    pub scheduled_deletion_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The compliance/retention field group written atomically when an invoice is
/// archived for the first time.
#[derive(Debug, Clone, Serialize)]
pub struct ArchivalRecord {
    pub document_hash: String,
    pub retention_period_years: i32,
    pub retention_started_at: DateTime<Utc>,
    pub scheduled_deletion_date: DateTime<Utc>,
}
