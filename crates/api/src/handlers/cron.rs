//! Handler for the periodic ping trigger.
//!
//! An outside scheduler (a cron job, a platform scheduler) POSTs here
//! every few minutes with the shared secret; each call executes one
//! orchestrator run and returns its summary.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use pulse_core::cadence::ThreadRngUniform;
use pulse_core::error::CoreError;
use pulse_notify::{PgPingStore, PingOrchestrator, RunSummary};

use crate::error::{AppError, AppResult};
use crate::middleware::cron_auth::CronAuthorized;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/cron/ping-run
///
/// Execute one scheduling run. Requires the `x-cron-secret` header.
/// Overlapping invocations are refused with 409: the schema carries no
/// distributed lease, so the guard here is what keeps a slow run and the
/// next trigger from double-notifying groups.
pub async fn trigger_ping_run(
    _auth: CronAuthorized,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<RunSummary>>> {
    let Ok(_guard) = state.run_lock.try_lock() else {
        return Err(AppError::Core(CoreError::Conflict(
            "A ping run is already in progress".into(),
        )));
    };

    let store = Arc::new(PgPingStore::new(state.pool.clone()));
    let mut orchestrator =
        PingOrchestrator::new(store, Arc::clone(&state.transport), ThreadRngUniform);

    let summary = orchestrator.run(Utc::now()).await?;

    Ok(Json(DataResponse { data: summary }))
}
