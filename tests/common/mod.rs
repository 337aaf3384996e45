// Shared in-memory implementations of the compliance core's collaborator
// seams, used by the integration tests in place of Postgres and the blob
// bucket.
#![allow(dead_code)]

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tokio::sync::RwLock;
use uuid::Uuid;

use fakturo_compliance::middleware::error_handling::{ComplianceError, Result};
use fakturo_compliance::models::{
    ArchivalRecord, AuditLogEntry, ComplianceStats, DigitalSignature, Invoice, InvoiceStatus,
    ValidationResult,
};
use fakturo_compliance::repositories::{AuditLogSink, InvoiceStore, ValidationResultSink};
use fakturo_compliance::utils::blob_storage::DocumentStorage;

#[derive(Default)]
pub struct InMemoryInvoiceStore {
    pub invoices: RwLock<HashMap<Uuid, Invoice>>,
}

impl InMemoryInvoiceStore {
    pub async fn insert(&self, invoice: Invoice) {
        self.invoices.write().await.insert(invoice.id, invoice);
    }

    pub async fn get(&self, id: Uuid) -> Invoice {
        self.invoices
            .read()
            .await
            .get(&id)
            .cloned()
            .expect("invoice present")
    }
}

#[async_trait]
impl InvoiceStore for InMemoryInvoiceStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Invoice>> {
        Ok(self.invoices.read().await.get(&id).cloned())
    }

    async fn find_eligible_for_sweep(&self) -> Result<Vec<Invoice>> {
        let mut eligible: Vec<Invoice> = self
            .invoices
            .read()
            .await
            .values()
            .filter(|i| i.status == InvoiceStatus::Sent && !i.gobd_compliance_failed)
            .cloned()
            .collect();
        eligible.sort_by_key(|i| i.created_at);
        Ok(eligible)
    }

    async fn store_signature(&self, invoice_id: Uuid, signature: &DigitalSignature) -> Result<()> {
        let mut invoices = self.invoices.write().await;
        let invoice = invoices.get_mut(&invoice_id).ok_or_else(|| {
            ComplianceError::Persistence(format!("invoice {} not found", invoice_id))
        })?;
        invoice.digital_signature = Some(signature.clone());
        invoice.updated_at = Utc::now();
        Ok(())
    }

    async fn record_archival(&self, invoice_id: Uuid, record: &ArchivalRecord) -> Result<()> {
        let mut invoices = self.invoices.write().await;
        let invoice = invoices.get_mut(&invoice_id).ok_or_else(|| {
            ComplianceError::Persistence(format!("invoice {} not found", invoice_id))
        })?;
        invoice.document_hash = Some(record.document_hash.clone());
        invoice.gobd_compliant = true;
        invoice.retention_period_years = Some(record.retention_period_years);
        invoice.retention_started_at = Some(record.retention_started_at);
        invoice.scheduled_deletion_date = Some(record.scheduled_deletion_date);
        invoice.updated_at = Utc::now();
        Ok(())
    }

    async fn flag_compliance_failure(&self, invoice_id: Uuid) -> Result<()> {
        let mut invoices = self.invoices.write().await;
        let invoice = invoices.get_mut(&invoice_id).ok_or_else(|| {
            ComplianceError::Persistence(format!("invoice {} not found", invoice_id))
        })?;
        invoice.gobd_compliance_failed = true;
        invoice.updated_at = Utc::now();
        Ok(())
    }

    async fn compliance_stats(&self) -> Result<ComplianceStats> {
        let invoices = self.invoices.read().await;
        let sent = invoices
            .values()
            .filter(|i| i.status == InvoiceStatus::Sent);

        let mut stats = ComplianceStats {
            pending: 0,
            compliant: 0,
            failed: 0,
        };
        for invoice in sent {
            if invoice.gobd_compliance_failed {
                stats.failed += 1;
            } else if invoice.gobd_compliant {
                stats.compliant += 1;
            } else {
                stats.pending += 1;
            }
        }
        Ok(stats)
    }
}

#[derive(Default)]
pub struct InMemoryDocumentStorage {
    pub objects: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemoryDocumentStorage {
    pub async fn put(&self, path: &str, bytes: &[u8]) {
        self.objects
            .write()
            .await
            .insert(path.to_string(), bytes.to_vec());
    }
}

#[async_trait]
impl DocumentStorage for InMemoryDocumentStorage {
    async fn download(&self, path: &str) -> Result<Vec<u8>> {
        self.objects
            .read()
            .await
            .get(path)
            .cloned()
            .ok_or_else(|| {
                ComplianceError::ResourceResolution(format!("object not found: {}", path))
            })
    }
}

#[derive(Default)]
pub struct RecordingAuditLog {
    pub entries: RwLock<Vec<AuditLogEntry>>,
}

#[async_trait]
impl AuditLogSink for RecordingAuditLog {
    async fn append(&self, entry: &AuditLogEntry) -> Result<()> {
        self.entries.write().await.push(entry.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingValidationSink {
    pub rows: RwLock<Vec<ValidationResult>>,
}

#[async_trait]
impl ValidationResultSink for RecordingValidationSink {
    async fn append(&self, result: &ValidationResult) -> Result<()> {
        self.rows.write().await.push(result.clone());
        Ok(())
    }
}

/// Always refuses the append - models a degraded validation sink.
pub struct UnreachableValidationSink;

#[async_trait]
impl ValidationResultSink for UnreachableValidationSink {
    async fn append(&self, _result: &ValidationResult) -> Result<()> {
        Err(ComplianceError::Persistence(
            "validation sink unreachable".to_string(),
        ))
    }
}

pub fn sent_invoice(number: &str, document_url: Option<&str>, created_at: DateTime<Utc>) -> Invoice {
    Invoice {
        id: Uuid::new_v4(),
        invoice_number: number.to_string(),
        total_amount: Decimal::new(11900, 2),
        status: InvoiceStatus::Sent,
        document_url: document_url.map(|u| u.to_string()),
        digital_signature: None,
        document_hash: None,
        gobd_compliant: false,
        gobd_compliance_failed: false,
        retention_period_years: None,
        retention_started_at: None,
        scheduled_deletion_date: None,
        created_at,
        updated_at: created_at,
    }
}
