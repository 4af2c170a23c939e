//! Group entity model.

use pulse_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `groups` table.
///
/// `next_ping_at` is `None` for a group that has never been scheduled;
/// once set it is always in the future relative to the `last_ping_at`
/// that produced it. Both fields are written only by the scheduling
/// engine.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Group {
    pub id: DbId,
    pub name: String,
    /// Desired pings per 7-day period.
    pub frequency: i32,
    /// `"fixed"` or `"random"`, parsed into `pulse_core::cadence::IntervalMode`.
    pub interval_mode: String,
    pub quiet_hours_start: Option<i16>,
    pub quiet_hours_end: Option<i16>,
    pub last_ping_at: Option<Timestamp>,
    pub next_ping_at: Option<Timestamp>,
    pub created_at: Timestamp,
}
