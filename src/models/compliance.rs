use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

/// Version stamp written into every validation-result row so historical
/// verdicts can be traced back to the validator that produced them.
pub const VALIDATOR_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationType {
    DigitalSignature,
}

impl ValidationType {
    pub fn as_str(&self) -> &str {
        match self {
            ValidationType::DigitalSignature => "digital_signature",
        }
    }
}

/// Append-only record of one verification call. Created exactly once per
/// call to `auto_verify_and_log`, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub invoice_id: Uuid,
    pub validation_type: ValidationType,
    pub passed: bool,
    pub validator_version: String,
    pub error_messages: Vec<String>,
    pub warning_messages: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl ValidationResult {
    pub fn digital_signature(invoice_id: Uuid, passed: bool, error_messages: Vec<String>) -> Self {
        Self {
            invoice_id,
            validation_type: ValidationType::DigitalSignature,
            passed,
            validator_version: VALIDATOR_VERSION.to_string(),
            error_messages,
            warning_messages: Vec::new(),
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Archived,
}

impl AuditAction {
    pub fn as_str(&self) -> &str {
        match self {
            AuditAction::Archived => "archived",
        }
    }
}

/// Append-only audit row. Tampering is not a distinct action here: a hash
/// mismatch surfaces through the gobd_compliance_failed flag on the invoice
/// record itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLogEntry {
    pub invoice_id: Uuid,
    pub action: AuditAction,
    pub new_state: JsonValue,
    pub actor: String,
    pub created_at: DateTime<Utc>,
}

/// Who initiated a sweep - the daily timer or an administrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepActor {
    System,
    Admin(Uuid),
}

impl SweepActor {
    pub fn as_audit_actor(&self) -> String {
        match self {
            SweepActor::System => "system".to_string(),
            SweepActor::Admin(id) => id.to_string(),
        }
    }
}

/// Per-invoice outcome of one sweep pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceSweepResult {
    pub invoice_id: Uuid,
    pub success: bool,
    pub message: String,
}

/// Aggregate returned by both the timed and the manual trigger. The sweep
/// entry point never errors; a failure before the per-invoice loop becomes a
/// single synthetic failed entry so this shape is always well-formed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SweepSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub results: Vec<InvoiceSweepResult>,
}

impl SweepSummary {
    pub fn push(&mut self, result: InvoiceSweepResult) {
        self.total += 1;
        if result.success {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
        self.results.push(result);
    }
}

/// Read-only counts for the admin dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceStats {
    pub pending: i64,
    pub compliant: i64,
    pub failed: i64,
}
