use async_trait::async_trait;
use uuid::Uuid;

use crate::middleware::error_handling::Result;
use crate::models::{
    ArchivalRecord, AuditLogEntry, ComplianceStats, DigitalSignature, Invoice, ValidationResult,
};

pub mod invoice_repo;
pub mod compliance_repo;

pub use invoice_repo::*;
pub use compliance_repo::*;

/// Invoice record store seam.
///
/// Concurrency: this core does not serialize operations targeting the same
/// invoice id - the last successful write wins. Per-invoice ordering
/// (optimistic versioning, external locking) is the surrounding system's
/// responsibility.
#[async_trait]
pub trait InvoiceStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Invoice>>;

    /// All invoices the compliance sweep should visit: status `sent`, not
    /// already flagged as a compliance failure. Covers both unarchived
    /// invoices (first hash recording) and compliant ones (re-verification).
    async fn find_eligible_for_sweep(&self) -> Result<Vec<Invoice>>;

    /// Replace the invoice's signature sub-record in one atomic field update.
    async fn store_signature(&self, invoice_id: Uuid, signature: &DigitalSignature) -> Result<()>;

    /// Atomically persist the first-archival field group: document hash,
    /// gobd_compliant = true, and the retention/deletion dates.
    async fn record_archival(&self, invoice_id: Uuid, record: &ArchivalRecord) -> Result<()>;

    /// Set gobd_compliance_failed = true, leaving the recorded document hash
    /// untouched for forensic comparison.
    async fn flag_compliance_failure(&self, invoice_id: Uuid) -> Result<()>;

    async fn compliance_stats(&self) -> Result<ComplianceStats>;
}

/// Append-only audit log seam. Writes are non-fatal for callers: a degraded
/// sink is logged and swallowed, never propagated.
#[async_trait]
pub trait AuditLogSink: Send + Sync {
    async fn append(&self, entry: &AuditLogEntry) -> Result<()>;
}

/// Append-only validation result seam, same non-fatal write contract.
#[async_trait]
pub trait ValidationResultSink: Send + Sync {
    async fn append(&self, result: &ValidationResult) -> Result<()>;
}
