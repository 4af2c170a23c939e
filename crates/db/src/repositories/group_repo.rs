//! Repository for the `groups` table.

use pulse_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::group::Group;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, frequency, interval_mode, quiet_hours_start, \
                       quiet_hours_end, last_ping_at, next_ping_at, created_at";

/// Scheduling-side queries over groups.
pub struct GroupRepo;

impl GroupRepo {
    /// Groups whose next ping is due at or before `now`.
    pub async fn list_due(pool: &PgPool, now: Timestamp) -> Result<Vec<Group>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM groups \
             WHERE next_ping_at IS NOT NULL AND next_ping_at <= $1 \
             ORDER BY next_ping_at"
        );
        sqlx::query_as::<_, Group>(&query)
            .bind(now)
            .fetch_all(pool)
            .await
    }

    /// Groups that have never been scheduled.
    pub async fn list_unscheduled(pool: &PgPool) -> Result<Vec<Group>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM groups WHERE next_ping_at IS NULL ORDER BY id");
        sqlx::query_as::<_, Group>(&query).fetch_all(pool).await
    }

    /// Persist a group's scheduling fields.
    ///
    /// `last_ping_at` is left untouched when `None` (bootstrap seeding
    /// only assigns the first `next_ping_at`).
    pub async fn set_schedule(
        pool: &PgPool,
        id: DbId,
        last_ping_at: Option<Timestamp>,
        next_ping_at: Timestamp,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE groups \
             SET last_ping_at = COALESCE($2, last_ping_at), next_ping_at = $3 \
             WHERE id = $1",
        )
        .bind(id)
        .bind(last_ping_at)
        .bind(next_ping_at)
        .execute(pool)
        .await?;
        Ok(())
    }
}
