pub mod cron;
pub mod health;
pub mod push_endpoint;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// POST   /cron/ping-run                        trigger a ping run (shared secret)
///
/// POST   /push/subscriptions                   store a subscription
/// DELETE /push/subscriptions                   remove a subscription by endpoint URL
/// DELETE /push/subscriptions/session/{id}      remove a session's subscriptions
/// GET    /push/public-key                      VAPID public key for clients
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/cron", cron::router())
        .nest("/push", push_endpoint::router())
}
