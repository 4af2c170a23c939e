//! Pulse notification delivery engine.
//!
//! Decides when each group is due for a "check in now" prompt, fans the
//! prompt out to every member device, and reacts to delivery failures:
//!
//! - [`payload`] — the push payload shape sent to devices.
//! - [`transport`] — Web Push delivery behind the [`PushTransport`] trait.
//! - [`store`] — persistence seam ([`PingStore`]) plus the PostgreSQL
//!   implementation, so engine semantics are testable in memory.
//! - [`dispatcher`] — single-attempt delivery with failure classification
//!   and dead-endpoint cleanup.
//! - [`fanout`] — per-group member fan-out with quiet-hours handling.
//! - [`orchestrator`] — the periodically triggered run entry point and
//!   its summary types.

pub mod dispatcher;
pub mod error;
pub mod fanout;
pub mod orchestrator;
pub mod payload;
pub mod store;
pub mod transport;

pub use dispatcher::{DeliveryResult, NotificationDispatcher};
pub use error::NotifyError;
pub use fanout::{FanoutCounts, GroupFanoutCoordinator};
pub use orchestrator::{GroupOutcome, PingOrchestrator, RunSummary, SoloOutcome};
pub use payload::CheckInPayload;
pub use store::{Member, PgPingStore, PingStore, StoreError};
pub use transport::{PushError, PushTransport, VapidKeys, WebPushTransport};
