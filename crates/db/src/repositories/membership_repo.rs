//! Membership and notification-target queries.

use pulse_core::types::DbId;
use sqlx::{FromRow, PgPool};

/// A notification target: the user id plus the timezone used for
/// quiet-hours evaluation.
#[derive(Debug, Clone, FromRow)]
pub struct MemberRow {
    pub user_id: DbId,
    pub timezone: Option<String>,
}

/// Queries resolving who should receive a group or solo ping.
pub struct MembershipRepo;

impl MembershipRepo {
    /// Current members of a group with their timezones.
    pub async fn list_members(
        pool: &PgPool,
        group_id: DbId,
    ) -> Result<Vec<MemberRow>, sqlx::Error> {
        sqlx::query_as::<_, MemberRow>(
            "SELECT u.id AS user_id, u.timezone FROM group_members gm \
             JOIN users u ON u.id = gm.user_id \
             WHERE gm.group_id = $1 \
             ORDER BY u.id",
        )
        .bind(group_id)
        .fetch_all(pool)
        .await
    }

    /// Users in no group at all who hold at least one push endpoint.
    pub async fn list_solo_users(pool: &PgPool) -> Result<Vec<MemberRow>, sqlx::Error> {
        sqlx::query_as::<_, MemberRow>(
            "SELECT u.id AS user_id, u.timezone FROM users u \
             WHERE NOT EXISTS (SELECT 1 FROM group_members gm WHERE gm.user_id = u.id) \
               AND EXISTS (SELECT 1 FROM push_endpoints pe WHERE pe.user_id = u.id) \
             ORDER BY u.id",
        )
        .fetch_all(pool)
        .await
    }
}
