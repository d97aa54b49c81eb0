//! Axum HTTP handlers
//!
//! Response shapes keep the field names existing clients rely on
//! (`llm_response`, `decision`, `log_entry`, ...).

use std::collections::BTreeSet;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tracing::{debug, error, info};

use crate::decision::{Decision, Outcome, QueryRequest};
use crate::guard::{GuardError, GuardOutcome, QueryGuard};

/// Build the router with all endpoints
pub fn build_router(guard: Arc<QueryGuard>) -> Router {
    Router::new()
        .route("/metadata/{table}", get(handle_metadata))
        .route("/tables", get(handle_tables))
        .route("/process_query", post(handle_process_query))
        .route("/get_log", get(handle_get_log))
        .route("/clear_log", post(handle_clear_log))
        .route("/health", get(handle_health))
        .with_state(guard)
}

impl IntoResponse for GuardError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            GuardError::TableNotFound(_) => (StatusCode::NOT_FOUND, "Table not found".to_string()),
            GuardError::Catalog(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            GuardError::Audit(e) => {
                error!(error = %e, "failed to record decision");
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

/// Body returned by POST /process_query
#[derive(Debug, Serialize)]
pub struct ProcessResponse {
    pub role: String,
    pub table: String,
    pub accessible_fields: Vec<String>,
    pub llm_response: String,
    pub decision: Outcome,
    pub reason: String,
    pub unauthorized_fields: BTreeSet<String>,
    pub log_entry: Decision,
}

impl From<GuardOutcome> for ProcessResponse {
    fn from(outcome: GuardOutcome) -> Self {
        let GuardOutcome {
            grant, decision, ..
        } = outcome;
        Self {
            role: decision.role.clone(),
            table: decision.table.clone(),
            accessible_fields: grant.describe(),
            llm_response: decision.generated_sql.clone(),
            decision: decision.outcome,
            reason: decision.reason.clone(),
            unauthorized_fields: decision.unauthorized_fields.clone(),
            log_entry: decision,
        }
    }
}

/// GET /metadata/{table} -- table fields with types and labels
async fn handle_metadata(
    State(guard): State<Arc<QueryGuard>>,
    Path(table): Path<String>,
) -> Result<impl IntoResponse, GuardError> {
    let def = guard.metadata(&table)?;
    Ok(Json(def.clone()))
}

/// GET /tables -- known table names
async fn handle_tables(State(guard): State<Arc<QueryGuard>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "tables": guard.catalog().list_tables() }))
}

/// POST /process_query -- generate, validate and log
async fn handle_process_query(
    State(guard): State<Arc<QueryGuard>>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<ProcessResponse>, GuardError> {
    debug!(role = %request.role, table = %request.table, "processing query");
    let outcome = guard.process(&request).await?;
    Ok(Json(outcome.into()))
}

/// GET /get_log -- all decisions, oldest first
async fn handle_get_log(State(guard): State<Arc<QueryGuard>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "log": guard.audit().snapshot() }))
}

/// POST /clear_log -- drop all decisions
async fn handle_clear_log(State(guard): State<Arc<QueryGuard>>) -> Json<serde_json::Value> {
    guard.audit().clear();
    info!("audit log cleared");
    Json(serde_json::json!({ "message": "Log cleared" }))
}

/// GET /health -- liveness and log size
async fn handle_health(State(guard): State<Arc<QueryGuard>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "audit_entries": guard.audit().len(),
    }))
}
