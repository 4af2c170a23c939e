//! Engine-level error type.

use crate::store::StoreError;
use crate::transport::PushError;

/// Errors surfaced by the delivery engine.
///
/// Per-group and per-user failures inside a run are caught and logged by
/// the orchestrator; this type reaches the caller only for run-level
/// failures (discovery queries, missing push credentials).
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Push(#[from] PushError),

    #[error(transparent)]
    Core(#[from] pulse_core::error::CoreError),
}
