//! Repository for the `push_endpoints` table.

use pulse_core::types::DbId;
use sqlx::PgPool;

use crate::models::push_endpoint::{PushEndpoint, UpsertPushEndpoint};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, endpoint, p256dh, auth, user_id, session_id, created_at, updated_at";

/// Lifecycle operations for push endpoints.
pub struct PushEndpointRepo;

impl PushEndpointRepo {
    /// Insert a subscription, or refresh it in place when the endpoint URL
    /// is already known (keys and owner are updated).
    pub async fn upsert(
        pool: &PgPool,
        input: &UpsertPushEndpoint,
    ) -> Result<PushEndpoint, sqlx::Error> {
        let query = format!(
            "INSERT INTO push_endpoints (endpoint, p256dh, auth, user_id, session_id) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT ON CONSTRAINT uq_push_endpoints_endpoint DO UPDATE \
             SET p256dh = EXCLUDED.p256dh, auth = EXCLUDED.auth, \
                 user_id = EXCLUDED.user_id, session_id = EXCLUDED.session_id, \
                 updated_at = NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PushEndpoint>(&query)
            .bind(&input.endpoint)
            .bind(&input.p256dh)
            .bind(&input.auth)
            .bind(input.user_id)
            .bind(&input.session_id)
            .fetch_one(pool)
            .await
    }

    /// Delete an endpoint by its URL.
    ///
    /// Returns whether a row was removed; deleting an already-deleted
    /// endpoint is a no-op, which keeps the dead-endpoint cleanup path
    /// idempotent.
    pub async fn delete_by_endpoint(pool: &PgPool, endpoint: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM push_endpoints WHERE endpoint = $1")
            .bind(endpoint)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete every endpoint registered by a browser session (logout).
    ///
    /// Returns the number of endpoints removed.
    pub async fn delete_by_session(pool: &PgPool, session_id: &str) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM push_endpoints WHERE session_id = $1")
            .bind(session_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Endpoints belonging to any of the given users.
    pub async fn list_for_users(
        pool: &PgPool,
        user_ids: &[DbId],
    ) -> Result<Vec<PushEndpoint>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM push_endpoints WHERE user_id = ANY($1) ORDER BY user_id, id"
        );
        sqlx::query_as::<_, PushEndpoint>(&query)
            .bind(user_ids)
            .fetch_all(pool)
            .await
    }
}
