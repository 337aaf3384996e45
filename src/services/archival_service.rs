//! GoBD compliance sweep over sent invoices.
//!
//! Per-invoice state machine: unarchived -> {compliant, hash recorded} on the
//! first successful pass, or -> {compliance failed} when a later pass finds a
//! different hash. Once compliant an invoice never reverts to unarchived; a
//! mismatch only sets the failure flag and keeps the recorded hash for
//! forensic comparison.
//!
//! One sweep implementation serves both triggers: the daily interval loop and
//! the manual admin endpoint are thin adapters over [`ArchivalService::run_sweep`].

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Months, Utc};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use uuid::Uuid;

use crate::middleware::error_handling::{ComplianceError, Result};
use crate::models::{
    ArchivalRecord, AuditAction, AuditLogEntry, Invoice, InvoiceSweepResult, SweepActor,
    SweepSummary,
};
use crate::repositories::{AuditLogSink, InvoiceStore};
use crate::services::hashing;
use crate::utils::blob_storage::{extract_storage_path, DocumentStorage};

/// Statutory retention default: ten years from archival.
pub const DEFAULT_RETENTION_YEARS: i32 = 10;

/// Outcome of one invoice's sweep pass.
enum SweepAction {
    Archived,
    AlreadyCompliant,
    TamperDetected,
}

impl SweepAction {
    fn is_success(&self) -> bool {
        !matches!(self, SweepAction::TamperDetected)
    }

    fn message(&self) -> &'static str {
        match self {
            SweepAction::Archived => "document archived and hash recorded",
            SweepAction::AlreadyCompliant => "document hash unchanged",
            SweepAction::TamperDetected => "document hash mismatch, compliance failure flagged",
        }
    }
}

pub struct ArchivalService {
    invoices: Arc<dyn InvoiceStore>,
    documents: Arc<dyn DocumentStorage>,
    audit: Arc<dyn AuditLogSink>,
    retention_years: i32,
}

impl ArchivalService {
    pub fn new(
        invoices: Arc<dyn InvoiceStore>,
        documents: Arc<dyn DocumentStorage>,
        audit: Arc<dyn AuditLogSink>,
    ) -> Self {
        Self {
            invoices,
            documents,
            audit,
            retention_years: DEFAULT_RETENTION_YEARS,
        }
    }

    pub fn with_retention_years(mut self, years: i32) -> Self {
        self.retention_years = years;
        self
    }

    /// Run one compliance sweep. Never returns an error: a failure before
    /// the per-invoice loop becomes a single synthetic failed entry so both
    /// triggers always receive a well-formed summary.
    pub async fn run_sweep(&self, actor: SweepActor) -> SweepSummary {
        tracing::info!("Starting compliance sweep: actor={}", actor.as_audit_actor());

        let eligible = match self.invoices.find_eligible_for_sweep().await {
            Ok(invoices) => invoices,
            Err(err) => {
                tracing::error!("Compliance sweep could not list invoices: {}", err);
                let mut summary = SweepSummary::default();
                summary.push(InvoiceSweepResult {
                    invoice_id: Uuid::nil(),
                    success: false,
                    message: format!("sweep aborted: {}", err),
                });
                return summary;
            }
        };

        let mut summary = SweepSummary::default();

        // Strictly sequential. A stalled download stalls only the current
        // invoice's step; a failed invoice never aborts the batch.
        for invoice in &eligible {
            let result = match self.archive_invoice(invoice, actor).await {
                Ok(action) => InvoiceSweepResult {
                    invoice_id: invoice.id,
                    success: action.is_success(),
                    message: action.message().to_string(),
                },
                Err(err) => {
                    tracing::warn!("Sweep step failed for invoice {}: {}", invoice.id, err);
                    InvoiceSweepResult {
                        invoice_id: invoice.id,
                        success: false,
                        message: err.to_string(),
                    }
                }
            };
            summary.push(result);
        }

        tracing::info!(
            "Compliance sweep finished: total={}, succeeded={}, failed={}",
            summary.total,
            summary.succeeded,
            summary.failed
        );

        summary
    }

    async fn archive_invoice(&self, invoice: &Invoice, actor: SweepActor) -> Result<SweepAction> {
        let document_url = invoice.document_url.as_deref().ok_or_else(|| {
            ComplianceError::ResourceResolution("invoice has no document URL".to_string())
        })?;

        let path = extract_storage_path(document_url).ok_or_else(|| {
            ComplianceError::ResourceResolution(format!(
                "could not extract storage path from '{}'",
                document_url
            ))
        })?;

        let document = self.documents.download(&path).await?;
        let digest_hex = hashing::sha256_hex(&document);

        if let Some(recorded) = invoice.document_hash.as_deref() {
            if recorded == digest_hex {
                return Ok(SweepAction::AlreadyCompliant);
            }

            // The recorded hash is never overwritten after a mismatch; it is
            // the forensic reference. No automatic remediation, no retry.
            self.invoices.flag_compliance_failure(invoice.id).await?;
            tracing::warn!(
                "Document hash mismatch for invoice {}: recorded {}, current {}",
                invoice.id,
                &recorded[..12.min(recorded.len())],
                &digest_hex[..12]
            );
            return Ok(SweepAction::TamperDetected);
        }

        let now = Utc::now();
        let record = ArchivalRecord {
            document_hash: digest_hex,
            retention_period_years: self.retention_years,
            retention_started_at: now,
            scheduled_deletion_date: scheduled_deletion_date(now, self.retention_years),
        };

        self.invoices.record_archival(invoice.id, &record).await?;

        let entry = AuditLogEntry {
            invoice_id: invoice.id,
            action: AuditAction::Archived,
            new_state: serde_json::json!({
                "invoice_number": invoice.invoice_number,
                "document_hash": record.document_hash,
                "gobd_compliant": true,
                "retention_period_years": record.retention_period_years,
                "retention_started_at": record.retention_started_at,
                "scheduled_deletion_date": record.scheduled_deletion_date,
            }),
            actor: actor.as_audit_actor(),
            created_at: now,
        };
        if let Err(err) = self.audit.append(&entry).await {
            // The archival itself already committed; a degraded audit sink
            // must not fail the invoice.
            tracing::error!(
                "Failed to append audit entry for invoice {}: {}",
                invoice.id,
                err
            );
        }

        tracing::info!(
            "Invoice {} archived: hash {}, deletion scheduled {}",
            invoice.id,
            &record.document_hash[..12],
            record.scheduled_deletion_date
        );

        Ok(SweepAction::Archived)
    }
}

/// Deletion date at the end of the retention period. Deletion is only
/// scheduled here, never performed.
pub fn scheduled_deletion_date(start: DateTime<Utc>, years: i32) -> DateTime<Utc> {
    start
        .checked_add_months(Months::new(years.max(0) as u32 * 12))
        .unwrap_or(start)
}

/// Timed trigger adapter: runs the identical sweep the manual endpoint runs,
/// once per interval.
pub fn spawn_scheduled_sweeps(service: Arc<ArchivalService>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // interval fires immediately; consume that tick so the first sweep
        // runs one full period after startup.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let summary = service.run_sweep(SweepActor::System).await;
            tracing::info!(
                "Scheduled compliance sweep done: total={}, succeeded={}, failed={}",
                summary.total,
                summary.succeeded,
                summary.failed
            );
        }
    })
}
