use async_trait::async_trait;
use sqlx::{query, PgPool};

use crate::middleware::error_handling::Result;
use crate::models::{AuditLogEntry, ValidationResult};
use crate::repositories::{AuditLogSink, ValidationResultSink};

pub struct PgValidationResultRepository {
    pool: PgPool,
}

impl PgValidationResultRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ValidationResultSink for PgValidationResultRepository {
    async fn append(&self, result: &ValidationResult) -> Result<()> {
        query(
            r#"
            INSERT INTO validation_results (
                invoice_id,
                validation_type,
                passed,
                validator_version,
                error_messages,
                warning_messages,
                created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(result.invoice_id)
        .bind(result.validation_type.as_str())
        .bind(result.passed)
        .bind(&result.validator_version)
        .bind(&result.error_messages)
        .bind(&result.warning_messages)
        .bind(result.created_at)
        .execute(&self.pool)
        .await?;

        tracing::info!(
            "Validation result recorded: invoice={}, type={}, passed={}",
            result.invoice_id,
            result.validation_type.as_str(),
            result.passed
        );

        Ok(())
    }
}

pub struct PgAuditLogRepository {
    pool: PgPool,
}

impl PgAuditLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditLogSink for PgAuditLogRepository {
    async fn append(&self, entry: &AuditLogEntry) -> Result<()> {
        query(
            r#"
            INSERT INTO audit_log (
                invoice_id,
                action,
                new_state,
                actor,
                created_at
            ) VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(entry.invoice_id)
        .bind(entry.action.as_str())
        .bind(&entry.new_state)
        .bind(&entry.actor)
        .bind(entry.created_at)
        .execute(&self.pool)
        .await?;

        tracing::info!(
            "Audit log: invoice={}, action={}, actor={}",
            entry.invoice_id,
            entry.action.as_str(),
            entry.actor
        );

        Ok(())
    }
}
