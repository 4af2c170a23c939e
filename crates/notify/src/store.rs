//! Persistence seam for the delivery engine.
//!
//! The engine reads and writes scheduling state through [`PingStore`], so
//! the orchestrator, fan-out, and dispatcher can run against an in-memory
//! store in tests. [`PgPingStore`] is the production implementation over
//! the `pulse-db` repositories.

use async_trait::async_trait;
use pulse_core::types::{DbId, Timestamp};
use pulse_db::models::group::Group;
use pulse_db::models::push_endpoint::PushEndpoint;
use pulse_db::repositories::{GroupRepo, MemberRow, MembershipRepo, PushEndpointRepo};
use pulse_db::DbPool;

/// Error from the backing store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Used by test doubles and non-SQL stores.
    #[error("{0}")]
    Other(String),
}

/// A notification target: one user with the timezone used for quiet-hours
/// evaluation and every device endpoint registered to them.
#[derive(Debug, Clone)]
pub struct Member {
    pub user_id: DbId,
    pub timezone: Option<String>,
    pub endpoints: Vec<PushEndpoint>,
}

/// Store operations the engine needs. Everything else the product does
/// with these tables stays outside this trait.
#[async_trait]
pub trait PingStore: Send + Sync {
    /// Groups whose `next_ping_at` has arrived.
    async fn due_groups(&self, now: Timestamp) -> Result<Vec<Group>, StoreError>;

    /// Groups that have never been scheduled.
    async fn unscheduled_groups(&self) -> Result<Vec<Group>, StoreError>;

    /// Persist a group's scheduling fields. `last_ping_at` is left
    /// untouched when `None` (bootstrap seeding).
    async fn set_group_schedule(
        &self,
        group_id: DbId,
        last_ping_at: Option<Timestamp>,
        next_ping_at: Timestamp,
    ) -> Result<(), StoreError>;

    /// Current members of a group with their endpoints.
    async fn group_members(&self, group_id: DbId) -> Result<Vec<Member>, StoreError>;

    /// Users in no group who hold at least one endpoint.
    async fn solo_users(&self) -> Result<Vec<Member>, StoreError>;

    /// Remove an endpoint by its URL. Removing a missing row is a no-op.
    async fn delete_endpoint(&self, endpoint: &str) -> Result<(), StoreError>;
}

// ---------------------------------------------------------------------------
// PgPingStore
// ---------------------------------------------------------------------------

/// PostgreSQL-backed store used in production.
#[derive(Clone)]
pub struct PgPingStore {
    pool: DbPool,
}

impl PgPingStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Attach endpoints to their owners, preserving member order.
    fn assemble_members(rows: Vec<MemberRow>, endpoints: Vec<PushEndpoint>) -> Vec<Member> {
        let mut members: Vec<Member> = rows
            .into_iter()
            .map(|row| Member {
                user_id: row.user_id,
                timezone: row.timezone,
                endpoints: Vec::new(),
            })
            .collect();
        for endpoint in endpoints {
            if let Some(member) = members.iter_mut().find(|m| m.user_id == endpoint.user_id) {
                member.endpoints.push(endpoint);
            }
        }
        members
    }

    async fn resolve_members(&self, rows: Vec<MemberRow>) -> Result<Vec<Member>, StoreError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let user_ids: Vec<DbId> = rows.iter().map(|r| r.user_id).collect();
        let endpoints = PushEndpointRepo::list_for_users(&self.pool, &user_ids).await?;
        Ok(Self::assemble_members(rows, endpoints))
    }
}

#[async_trait]
impl PingStore for PgPingStore {
    async fn due_groups(&self, now: Timestamp) -> Result<Vec<Group>, StoreError> {
        Ok(GroupRepo::list_due(&self.pool, now).await?)
    }

    async fn unscheduled_groups(&self) -> Result<Vec<Group>, StoreError> {
        Ok(GroupRepo::list_unscheduled(&self.pool).await?)
    }

    async fn set_group_schedule(
        &self,
        group_id: DbId,
        last_ping_at: Option<Timestamp>,
        next_ping_at: Timestamp,
    ) -> Result<(), StoreError> {
        Ok(GroupRepo::set_schedule(&self.pool, group_id, last_ping_at, next_ping_at).await?)
    }

    async fn group_members(&self, group_id: DbId) -> Result<Vec<Member>, StoreError> {
        let rows = MembershipRepo::list_members(&self.pool, group_id).await?;
        self.resolve_members(rows).await
    }

    async fn solo_users(&self) -> Result<Vec<Member>, StoreError> {
        let rows = MembershipRepo::list_solo_users(&self.pool).await?;
        self.resolve_members(rows).await
    }

    async fn delete_endpoint(&self, endpoint: &str) -> Result<(), StoreError> {
        PushEndpointRepo::delete_by_endpoint(&self.pool, endpoint).await?;
        Ok(())
    }
}
