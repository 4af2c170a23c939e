//! Group fan-out: one payload to every member device.

use std::sync::Arc;

use pulse_core::quiet_hours;
use pulse_core::types::{DbId, Timestamp};
use serde::Serialize;

use crate::dispatcher::NotificationDispatcher;
use crate::error::NotifyError;
use crate::payload::CheckInPayload;
use crate::store::PingStore;
use crate::transport::PushTransport;

/// Counters for one group fan-out.
///
/// `sent`/`failed` count delivery attempts (a member may have several
/// devices); `skipped_quiet_hours` counts members.
#[derive(Debug, Default, Clone, Serialize)]
pub struct FanoutCounts {
    pub sent: u32,
    pub failed: u32,
    pub skipped_quiet_hours: u32,
}

/// Resolves a group's members and dispatches to each of their endpoints.
pub struct GroupFanoutCoordinator<S, T> {
    store: Arc<S>,
    dispatcher: NotificationDispatcher<S, T>,
}

impl<S: PingStore, T: PushTransport> GroupFanoutCoordinator<S, T> {
    pub fn new(store: Arc<S>, dispatcher: NotificationDispatcher<S, T>) -> Self {
        Self { store, dispatcher }
    }

    /// Deliver `payload` to every endpoint of every member who is not
    /// inside their quiet window, evaluated in the member's own timezone.
    ///
    /// Partial failure is expected and reported through the counters;
    /// nothing is rolled back. A member with no endpoints contributes to
    /// no counter at all.
    pub async fn fan_out(
        &self,
        group_id: DbId,
        payload: &CheckInPayload,
        quiet_start: Option<i16>,
        quiet_end: Option<i16>,
        now: Timestamp,
    ) -> Result<FanoutCounts, NotifyError> {
        let members = self.store.group_members(group_id).await?;
        let mut counts = FanoutCounts::default();

        for member in &members {
            if member.endpoints.is_empty() {
                continue;
            }

            if quiet_hours::is_quiet_now(quiet_start, quiet_end, member.timezone.as_deref(), now)
            {
                counts.skipped_quiet_hours += 1;
                tracing::debug!(
                    group_id,
                    user_id = member.user_id,
                    "Member inside quiet hours, skipping"
                );
                continue;
            }

            for endpoint in &member.endpoints {
                let result = self.dispatcher.send(endpoint, payload).await?;
                if result.delivered {
                    counts.sent += 1;
                } else {
                    counts.failed += 1;
                    tracing::warn!(
                        group_id,
                        user_id = member.user_id,
                        endpoint = %endpoint.endpoint,
                        error = result.error.as_deref().unwrap_or("unknown"),
                        purged = result.endpoint_purged,
                        "Delivery attempt failed"
                    );
                }
            }
        }

        Ok(counts)
    }
}
