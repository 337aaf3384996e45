use async_trait::async_trait;
use serde_json::Value as JsonValue;
use sqlx::postgres::PgRow;
use sqlx::{query, PgPool, Row};
use uuid::Uuid;

use crate::middleware::error_handling::{ComplianceError, Result};
use crate::models::{ArchivalRecord, ComplianceStats, DigitalSignature, Invoice, InvoiceStatus};
use crate::repositories::InvoiceStore;

const INVOICE_COLUMNS: &str = "id, invoice_number, total_amount, status, document_url, \
     digital_signature, document_hash, gobd_compliant, gobd_compliance_failed, \
     retention_period_years, retention_started_at, scheduled_deletion_date, \
     created_at, updated_at";

pub struct PgInvoiceRepository {
    pool: PgPool,
}

impl PgInvoiceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_invoice(row: &PgRow) -> Result<Invoice> {
        let status_raw: String = row.try_get("status")?;
        let status = InvoiceStatus::parse(&status_raw).ok_or_else(|| {
            ComplianceError::Persistence(format!("unknown invoice status '{}'", status_raw))
        })?;

        let signature_json: Option<JsonValue> = row.try_get("digital_signature")?;
        let digital_signature = match signature_json {
            Some(value) => Some(serde_json::from_value::<DigitalSignature>(value).map_err(
                |e| ComplianceError::Persistence(format!("malformed digital_signature: {}", e)),
            )?),
            None => None,
        };

        Ok(Invoice {
            id: row.try_get("id")?,
            invoice_number: row.try_get("invoice_number")?,
            total_amount: row.try_get("total_amount")?,
            status,
            document_url: row.try_get("document_url")?,
            digital_signature,
            document_hash: row.try_get("document_hash")?,
            gobd_compliant: row.try_get("gobd_compliant")?,
            gobd_compliance_failed: row.try_get("gobd_compliance_failed")?,
            retention_period_years: row.try_get("retention_period_years")?,
            retention_started_at: row.try_get("retention_started_at")?,
            scheduled_deletion_date: row.try_get("scheduled_deletion_date")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

#[async_trait]
impl InvoiceStore for PgInvoiceRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Invoice>> {
        let row = query(&format!(
            "SELECT {} FROM invoices WHERE id = $1",
            INVOICE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(Self::row_to_invoice(&row)?)),
            None => Ok(None),
        }
    }

    async fn find_eligible_for_sweep(&self) -> Result<Vec<Invoice>> {
        let rows = query(&format!(
            "SELECT {} FROM invoices \
             WHERE status = 'sent' AND gobd_compliance_failed = FALSE \
             ORDER BY created_at ASC",
            INVOICE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        let mut invoices = Vec::with_capacity(rows.len());
        for row in &rows {
            invoices.push(Self::row_to_invoice(row)?);
        }

        Ok(invoices)
    }

    async fn store_signature(&self, invoice_id: Uuid, signature: &DigitalSignature) -> Result<()> {
        let payload = serde_json::to_value(signature).map_err(|e| {
            ComplianceError::Persistence(format!("signature serialization failed: {}", e))
        })?;

        let result = query(
            "UPDATE invoices SET digital_signature = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(invoice_id)
        .bind(payload)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(ComplianceError::Persistence(format!(
                "invoice {} not found for signature update",
                invoice_id
            )));
        }

        Ok(())
    }

    async fn record_archival(&self, invoice_id: Uuid, record: &ArchivalRecord) -> Result<()> {
        let result = query(
            "UPDATE invoices \
             SET document_hash = $2, \
                 gobd_compliant = TRUE, \
                 retention_period_years = $3, \
                 retention_started_at = $4, \
                 scheduled_deletion_date = $5, \
                 updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(invoice_id)
        .bind(&record.document_hash)
        .bind(record.retention_period_years)
        .bind(record.retention_started_at)
        .bind(record.scheduled_deletion_date)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(ComplianceError::Persistence(format!(
                "invoice {} not found for archival update",
                invoice_id
            )));
        }

        Ok(())
    }

    async fn flag_compliance_failure(&self, invoice_id: Uuid) -> Result<()> {
        query(
            "UPDATE invoices SET gobd_compliance_failed = TRUE, updated_at = NOW() WHERE id = $1",
        )
        .bind(invoice_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn compliance_stats(&self) -> Result<ComplianceStats> {
        let row = query(
            "SELECT \
                 COUNT(*) FILTER (WHERE gobd_compliant = FALSE AND gobd_compliance_failed = FALSE) AS pending, \
                 COUNT(*) FILTER (WHERE gobd_compliant = TRUE AND gobd_compliance_failed = FALSE) AS compliant, \
                 COUNT(*) FILTER (WHERE gobd_compliance_failed = TRUE) AS failed \
             FROM invoices WHERE status = 'sent'",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(ComplianceStats {
            pending: row.try_get("pending")?,
            compliant: row.try_get("compliant")?,
            failed: row.try_get("failed")?,
        })
    }
}
