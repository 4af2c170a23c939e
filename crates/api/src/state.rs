use std::sync::Arc;

use pulse_notify::WebPushTransport;
use tokio::sync::Mutex;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: pulse_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Web Push transport, shared across runs (holds the VAPID keypair).
    pub transport: Arc<WebPushTransport>,
    /// Single-flight guard for ping runs: an overlapping trigger gets a
    /// 409 instead of double-notifying every due group.
    pub run_lock: Arc<Mutex<()>>,
}
