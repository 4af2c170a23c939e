//! Single-attempt push dispatch with failure classification.

use std::sync::Arc;

use pulse_db::models::push_endpoint::PushEndpoint;

use crate::payload::CheckInPayload;
use crate::store::PingStore;
use crate::transport::{PushError, PushTransport};

/// Outcome of one delivery attempt. Consumed by the fan-out counters and
/// never persisted.
#[derive(Debug, Clone)]
pub struct DeliveryResult {
    pub delivered: bool,
    pub error: Option<String>,
    /// The provider reported the endpoint permanently invalid; its record
    /// has been removed from the store.
    pub endpoint_purged: bool,
}

/// Sends one payload to one endpoint and reacts to the verdict.
///
/// No internal retries: each call is a single final attempt, and any
/// retry policy belongs to the caller.
pub struct NotificationDispatcher<S, T> {
    store: Arc<S>,
    transport: Arc<T>,
}

impl<S, T> Clone for NotificationDispatcher<S, T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            transport: Arc::clone(&self.transport),
        }
    }
}

impl<S: PingStore, T: PushTransport> NotificationDispatcher<S, T> {
    pub fn new(store: Arc<S>, transport: Arc<T>) -> Self {
        Self { store, transport }
    }

    /// One delivery attempt.
    ///
    /// A permanently invalid endpoint is deleted from the store so later
    /// fan-outs stop targeting it; failure of that cleanup is logged and
    /// does not change the delivery verdict. Missing delivery credentials
    /// are surfaced to the caller rather than folded into the failure
    /// counts.
    pub async fn send(
        &self,
        endpoint: &PushEndpoint,
        payload: &CheckInPayload,
    ) -> Result<DeliveryResult, PushError> {
        match self.transport.send(endpoint, payload).await {
            Ok(()) => Ok(DeliveryResult {
                delivered: true,
                error: None,
                endpoint_purged: false,
            }),
            Err(PushError::MissingVapidKeys) => Err(PushError::MissingVapidKeys),
            Err(err) if err.is_permanent() => {
                tracing::info!(
                    endpoint = %endpoint.endpoint,
                    user_id = endpoint.user_id,
                    "Endpoint gone, removing subscription"
                );
                if let Err(delete_err) = self.store.delete_endpoint(&endpoint.endpoint).await {
                    tracing::error!(
                        endpoint = %endpoint.endpoint,
                        error = %delete_err,
                        "Failed to remove dead endpoint"
                    );
                }
                Ok(DeliveryResult {
                    delivered: false,
                    error: Some(err.to_string()),
                    endpoint_purged: true,
                })
            }
            Err(err) => Ok(DeliveryResult {
                delivered: false,
                error: Some(err.to_string()),
                endpoint_purged: false,
            }),
        }
    }
}
