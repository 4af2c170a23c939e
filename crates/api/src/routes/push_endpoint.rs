//! Route definitions for the push subscription lifecycle.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::push_endpoint;
use crate::state::AppState;

/// Routes mounted at `/push`.
///
/// ```text
/// POST   /subscriptions                  -> subscribe
/// DELETE /subscriptions                  -> unsubscribe
/// DELETE /subscriptions/session/{id}     -> remove_session_subscriptions
/// GET    /public-key                     -> public_key
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/subscriptions",
            post(push_endpoint::subscribe).delete(push_endpoint::unsubscribe),
        )
        .route(
            "/subscriptions/session/{session_id}",
            delete(push_endpoint::remove_session_subscriptions),
        )
        .route("/public-key", get(push_endpoint::public_key))
}
