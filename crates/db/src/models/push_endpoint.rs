//! Push endpoint entity model and DTOs.

use pulse_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `push_endpoints` table: one push-subscribed device or
/// browser, identified by its delivery URL.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PushEndpoint {
    pub id: DbId,
    pub endpoint: String,
    pub p256dh: String,
    pub auth: String,
    pub user_id: DbId,
    pub session_id: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for storing a subscription. Re-subscribing with the same endpoint
/// URL refreshes the keys and re-attaches the owner in place.
#[derive(Debug, Deserialize)]
pub struct UpsertPushEndpoint {
    pub endpoint: String,
    pub p256dh: String,
    pub auth: String,
    pub user_id: DbId,
    pub session_id: Option<String>,
}
