//! Web Push delivery transport.
//!
//! [`WebPushTransport`] sends one encrypted message per endpoint using the
//! Web Push protocol (VAPID-signed, aes128gcm payload encryption). The
//! VAPID keypair is optional at construction and validated on first use,
//! so a process without push configured can still boot; the first send
//! then fails with [`PushError::MissingVapidKeys`].

use std::time::Duration;

use async_trait::async_trait;
use pulse_db::models::push_endpoint::PushEndpoint;
use web_push::{
    ContentEncoding, HyperWebPushClient, SubscriptionInfo, VapidSignatureBuilder, WebPushClient,
    WebPushError, WebPushMessage, WebPushMessageBuilder, URL_SAFE_NO_PAD,
};

use crate::payload::CheckInPayload;

/// Per-attempt delivery timeout. A timed-out attempt counts as transient.
const SEND_TIMEOUT: Duration = Duration::from_secs(10);

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for push delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum PushError {
    /// The VAPID keypair is missing; no send can succeed until it is set.
    #[error("VAPID keys are not configured (set VAPID_PUBLIC_KEY and VAPID_PRIVATE_KEY)")]
    MissingVapidKeys,

    /// The provider reported the endpoint as expired or unregistered.
    #[error("endpoint is no longer valid")]
    EndpointGone,

    /// Any other transport failure: network error, provider rejection,
    /// malformed keys, timeout.
    #[error("push delivery failed: {0}")]
    Delivery(String),
}

impl PushError {
    /// Whether the failed endpoint should be purged rather than retried.
    pub fn is_permanent(&self) -> bool {
        matches!(self, PushError::EndpointGone)
    }
}

// ---------------------------------------------------------------------------
// VapidKeys
// ---------------------------------------------------------------------------

/// VAPID keypair identifying this server to push providers.
#[derive(Debug, Clone)]
pub struct VapidKeys {
    /// Public half, handed to clients when they subscribe.
    pub public_key: String,
    /// Private half (URL-safe base64), used to sign delivery requests.
    pub private_key: String,
}

impl VapidKeys {
    /// Load the keypair from environment variables.
    ///
    /// Returns `None` when `VAPID_PUBLIC_KEY` or `VAPID_PRIVATE_KEY` is
    /// absent, signalling that push delivery is not configured. Sends
    /// then fail with [`PushError::MissingVapidKeys`] instead of the
    /// process refusing to start.
    pub fn from_env() -> Option<Self> {
        let public_key = std::env::var("VAPID_PUBLIC_KEY").ok()?;
        let private_key = std::env::var("VAPID_PRIVATE_KEY").ok()?;
        Some(Self {
            public_key,
            private_key,
        })
    }
}

// ---------------------------------------------------------------------------
// PushTransport
// ---------------------------------------------------------------------------

/// One delivery attempt to one endpoint.
///
/// Implementations do not retry; each call is final for that invocation.
#[async_trait]
pub trait PushTransport: Send + Sync {
    async fn send(&self, endpoint: &PushEndpoint, payload: &CheckInPayload)
        -> Result<(), PushError>;
}

// ---------------------------------------------------------------------------
// WebPushTransport
// ---------------------------------------------------------------------------

/// Production transport speaking the Web Push protocol.
pub struct WebPushTransport {
    client: HyperWebPushClient,
    keys: Option<VapidKeys>,
}

impl WebPushTransport {
    pub fn new(keys: Option<VapidKeys>) -> Self {
        Self {
            client: HyperWebPushClient::new(),
            keys,
        }
    }

    /// The public half of the keypair, for client-side subscription.
    pub fn public_key(&self) -> Option<&str> {
        self.keys.as_ref().map(|k| k.public_key.as_str())
    }

    fn build_message(
        &self,
        endpoint: &PushEndpoint,
        body: &[u8],
    ) -> Result<WebPushMessage, PushError> {
        let keys = self.keys.as_ref().ok_or(PushError::MissingVapidKeys)?;

        let subscription = SubscriptionInfo::new(
            endpoint.endpoint.clone(),
            endpoint.p256dh.clone(),
            endpoint.auth.clone(),
        );

        let signature =
            VapidSignatureBuilder::from_base64(&keys.private_key, URL_SAFE_NO_PAD, &subscription)
                .map_err(classify)?
                .build()
                .map_err(classify)?;

        let mut builder = WebPushMessageBuilder::new(&subscription);
        builder.set_payload(ContentEncoding::Aes128Gcm, body);
        builder.set_vapid_signature(signature);
        builder.build().map_err(classify)
    }
}

#[async_trait]
impl PushTransport for WebPushTransport {
    async fn send(
        &self,
        endpoint: &PushEndpoint,
        payload: &CheckInPayload,
    ) -> Result<(), PushError> {
        let body =
            serde_json::to_vec(payload).map_err(|e| PushError::Delivery(e.to_string()))?;
        let message = self.build_message(endpoint, &body)?;

        match tokio::time::timeout(SEND_TIMEOUT, self.client.send(message)).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(err)) => Err(classify(err)),
            Err(_) => Err(PushError::Delivery(format!(
                "delivery attempt timed out after {}s",
                SEND_TIMEOUT.as_secs()
            ))),
        }
    }
}

/// Map provider errors onto the engine's failure taxonomy. Only
/// gone/expired endpoints are permanent; everything else is transient.
fn classify(err: WebPushError) -> PushError {
    match err {
        WebPushError::EndpointNotValid | WebPushError::EndpointNotFound => PushError::EndpointGone,
        other => PushError::Delivery(other.to_string()),
    }
}
