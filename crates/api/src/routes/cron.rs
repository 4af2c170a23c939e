//! Route definitions for the cron trigger.

use axum::routing::post;
use axum::Router;

use crate::handlers::cron;
use crate::state::AppState;

/// Routes mounted at `/cron`.
///
/// ```text
/// POST /ping-run -> trigger_ping_run (x-cron-secret protected)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/ping-run", post(cron::trigger_ping_run))
}
