use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::middleware::error_handling::Result;
use crate::models::{ComplianceStats, SweepActor, SweepSummary};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ManualSweepParams {
    /// Administrator who triggered the sweep; recorded as the audit actor.
    pub actor_id: Option<Uuid>,
}

/// Manual/administrative trigger. Calls the identical sweep function as the
/// daily timer and returns the identical summary shape.
pub async fn run_sweep(
    State(state): State<AppState>,
    Query(params): Query<ManualSweepParams>,
) -> Json<SweepSummary> {
    let actor = match params.actor_id {
        Some(id) => SweepActor::Admin(id),
        None => SweepActor::System,
    };

    Json(state.archival.run_sweep(actor).await)
}

/// Read-only compliance counts for the admin dashboard.
pub async fn compliance_status(State(state): State<AppState>) -> Result<Json<ComplianceStats>> {
    Ok(Json(state.invoices.compliance_stats().await?))
}

pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
