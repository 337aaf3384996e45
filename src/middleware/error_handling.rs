// ============================================================================
// Error Handling - Compliance Core Error Taxonomy
// ============================================================================
//
// Three error kinds cover every failure this core can produce:
//
// - Crypto: key generation / signing primitive failure. Fatal at the signing
//   boundary (a failed signature is never reported as "unsigned but fine"),
//   downgraded to a boolean verdict at the verification boundary.
// - Persistence: database write/read failure. Fatal for the primary signature
//   write; logged and swallowed for audit/validation-result appends.
// - ResourceResolution: unparseable document URL or unreachable blob. Scoped
//   to a single invoice inside the archival sweep, never batch-fatal.
//
// A hash mismatch is NOT an error value - it is the terminal
// gobd_compliance_failed state transition on the invoice record.
//
// Client responses stay generic; detailed errors are logged server-side only.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ComplianceError {
    #[error("crypto provider failure: {0}")]
    Crypto(String),

    #[error("persistence failure: {0}")]
    Persistence(String),

    #[error("resource resolution failure: {0}")]
    ResourceResolution(String),
}

impl From<sqlx::Error> for ComplianceError {
    fn from(err: sqlx::Error) -> Self {
        ComplianceError::Persistence(err.to_string())
    }
}

impl From<reqwest::Error> for ComplianceError {
    fn from(err: reqwest::Error) -> Self {
        ComplianceError::ResourceResolution(err.to_string())
    }
}

impl IntoResponse for ComplianceError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ComplianceError::Crypto(ref e) => {
                tracing::error!("Crypto error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Signing operation failed".to_string())
            }
            ComplianceError::Persistence(ref e) => {
                tracing::error!("Persistence error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            ComplianceError::ResourceResolution(ref e) => {
                tracing::error!("Resource resolution error: {}", e);
                (StatusCode::BAD_GATEWAY, "Document storage unavailable".to_string())
            }
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ComplianceError>;
