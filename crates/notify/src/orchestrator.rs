//! The periodic ping run.
//!
//! Invoked from the outside on a fixed cadence (a cron job hitting the
//! trigger endpoint). Stateless between invocations: all scheduling state
//! lives on the group rows, so a run can be cut short without leaving any
//! group half-updated.

use std::sync::Arc;

use pulse_core::cadence::{self, IntervalMode, UniformSource};
use pulse_core::types::{DbId, Timestamp};
use pulse_db::models::group::Group;
use serde::Serialize;

use crate::dispatcher::NotificationDispatcher;
use crate::error::NotifyError;
use crate::fanout::{FanoutCounts, GroupFanoutCoordinator};
use crate::payload::CheckInPayload;
use crate::store::PingStore;
use crate::transport::{PushError, PushTransport};

// ---------------------------------------------------------------------------
// Run summary
// ---------------------------------------------------------------------------

/// Outcome of processing one due group.
#[derive(Debug, Serialize)]
pub struct GroupOutcome {
    pub group_id: DbId,
    pub group_name: String,
    pub sent: u32,
    pub failed: u32,
    pub skipped_quiet_hours: u32,
    /// The rescheduled time, when persisting it succeeded.
    pub next_ping_at: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Totals for users outside any group.
#[derive(Debug, Default, Serialize)]
pub struct SoloOutcome {
    pub sent: u32,
    pub failed: u32,
}

/// Aggregate result of one orchestrator invocation. Returned to the
/// caller and logged; never persisted.
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub started_at: Timestamp,
    pub groups: Vec<GroupOutcome>,
    /// Groups seeded with their first `next_ping_at` this run. Seeding
    /// sends nothing; the group becomes due on a later run.
    pub initialized_groups: u32,
    pub solo: SoloOutcome,
}

// ---------------------------------------------------------------------------
// PingOrchestrator
// ---------------------------------------------------------------------------

/// Drives one scheduling run: seeds never-scheduled groups, fans out to
/// due groups, notifies solo users, and reports a [`RunSummary`].
pub struct PingOrchestrator<S, T, R> {
    store: Arc<S>,
    dispatcher: NotificationDispatcher<S, T>,
    fanout: GroupFanoutCoordinator<S, T>,
    sampler: R,
}

impl<S, T, R> PingOrchestrator<S, T, R>
where
    S: PingStore,
    T: PushTransport,
    R: UniformSource,
{
    pub fn new(store: Arc<S>, transport: Arc<T>, sampler: R) -> Self {
        let dispatcher = NotificationDispatcher::new(Arc::clone(&store), transport);
        let fanout = GroupFanoutCoordinator::new(Arc::clone(&store), dispatcher.clone());
        Self {
            store,
            dispatcher,
            fanout,
            sampler,
        }
    }

    /// Execute one run.
    ///
    /// Best-effort per unit of work: a failure while processing one group
    /// or one user is caught, logged, and recorded in the summary without
    /// aborting the rest. Only two things end the run early: a discovery
    /// query failing, and a missing VAPID keypair (fatal for every send,
    /// so carrying on would only burn each group's slot).
    pub async fn run(&mut self, now: Timestamp) -> Result<RunSummary, NotifyError> {
        let unscheduled = self.store.unscheduled_groups().await?;
        let mut initialized_groups = 0u32;
        for group in &unscheduled {
            match self.seed_group(group, now).await {
                Ok(()) => initialized_groups += 1,
                Err(e) => {
                    tracing::error!(group_id = group.id, error = %e, "Failed to seed group schedule");
                }
            }
        }

        let due = self.store.due_groups(now).await?;
        let mut groups = Vec::with_capacity(due.len());
        for group in &due {
            match self.process_group(group, now).await {
                Ok(outcome) => groups.push(outcome),
                Err(NotifyError::Push(PushError::MissingVapidKeys)) => {
                    return Err(PushError::MissingVapidKeys.into());
                }
                Err(e) => {
                    tracing::error!(group_id = group.id, error = %e, "Failed to process due group");
                    groups.push(GroupOutcome {
                        group_id: group.id,
                        group_name: group.name.clone(),
                        sent: 0,
                        failed: 0,
                        skipped_quiet_hours: 0,
                        next_ping_at: None,
                        error: Some(e.to_string()),
                    });
                }
            }
        }

        let solo = self.notify_solo_users().await?;

        let summary = RunSummary {
            started_at: now,
            groups,
            initialized_groups,
            solo,
        };
        tracing::info!(
            due_groups = summary.groups.len(),
            initialized_groups = summary.initialized_groups,
            solo_sent = summary.solo.sent,
            solo_failed = summary.solo.failed,
            "Ping run complete"
        );
        Ok(summary)
    }

    /// Assign a first `next_ping_at` to a never-scheduled group. Sends
    /// nothing; the group becomes due on a later run.
    async fn seed_group(&mut self, group: &Group, now: Timestamp) -> Result<(), NotifyError> {
        let mode: IntervalMode = group.interval_mode.parse()?;
        let first = cadence::bootstrap_ping_at(mode, now, &mut self.sampler);
        self.store.set_group_schedule(group.id, None, first).await?;
        tracing::info!(group_id = group.id, next_ping_at = %first, "Seeded first ping time");
        Ok(())
    }

    /// Fan out to one due group and advance its schedule.
    ///
    /// The reschedule is unconditional on delivery outcome: a failing
    /// endpoint must never stall the group's cadence. The one exception
    /// is a missing VAPID keypair, which leaves the schedule untouched so
    /// the group is still due once push is configured.
    async fn process_group(
        &mut self,
        group: &Group,
        now: Timestamp,
    ) -> Result<GroupOutcome, NotifyError> {
        let payload = CheckInPayload::for_group(&group.name);
        let fan_result = self
            .fanout
            .fan_out(
                group.id,
                &payload,
                group.quiet_hours_start,
                group.quiet_hours_end,
                now,
            )
            .await;

        if let Err(NotifyError::Push(PushError::MissingVapidKeys)) = fan_result {
            return Err(PushError::MissingVapidKeys.into());
        }

        let mode: IntervalMode = group.interval_mode.parse()?;
        let next = cadence::next_ping_at(group.frequency, mode, now, &mut self.sampler);
        self.store
            .set_group_schedule(group.id, Some(now), next)
            .await?;

        let (counts, error) = match fan_result {
            Ok(counts) => (counts, None),
            Err(e) => {
                tracing::error!(group_id = group.id, error = %e, "Group fan-out failed");
                (FanoutCounts::default(), Some(e.to_string()))
            }
        };

        Ok(GroupOutcome {
            group_id: group.id,
            group_name: group.name.clone(),
            sent: counts.sent,
            failed: counts.failed,
            skipped_quiet_hours: counts.skipped_quiet_hours,
            next_ping_at: Some(next),
            error,
        })
    }

    /// Notify every user who is in no group but has at least one endpoint.
    ///
    /// Solo targets carry no scheduling state and no quiet-hours config:
    /// each run notifies all of them, matching the product's original
    /// behaviour.
    async fn notify_solo_users(&self) -> Result<SoloOutcome, NotifyError> {
        let solo = self.store.solo_users().await?;
        let payload = CheckInPayload::for_solo_user();
        let mut outcome = SoloOutcome::default();

        for member in &solo {
            for endpoint in &member.endpoints {
                match self.dispatcher.send(endpoint, &payload).await {
                    Ok(result) if result.delivered => outcome.sent += 1,
                    Ok(result) => {
                        outcome.failed += 1;
                        tracing::warn!(
                            user_id = member.user_id,
                            endpoint = %endpoint.endpoint,
                            error = result.error.as_deref().unwrap_or("unknown"),
                            "Solo delivery attempt failed"
                        );
                    }
                    Err(PushError::MissingVapidKeys) => {
                        return Err(PushError::MissingVapidKeys.into());
                    }
                    Err(e) => {
                        outcome.failed += 1;
                        tracing::error!(user_id = member.user_id, error = %e, "Solo dispatch error");
                    }
                }
            }
        }

        Ok(outcome)
    }
}
