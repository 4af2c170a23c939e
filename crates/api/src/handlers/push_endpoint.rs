//! Handlers for the push subscription lifecycle.
//!
//! The product's web layer authenticates users before calling these and
//! passes the resolved user id along; session machinery is an external
//! collaborator, not part of this service.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use pulse_core::error::CoreError;
use pulse_db::models::push_endpoint::UpsertPushEndpoint;
use pulse_db::repositories::PushEndpointRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/push/subscriptions
///
/// Store a push subscription. Re-subscribing with a known endpoint URL
/// refreshes the keys and re-attaches the owner in place.
pub async fn subscribe(
    State(state): State<AppState>,
    Json(input): Json<UpsertPushEndpoint>,
) -> AppResult<impl IntoResponse> {
    if input.endpoint.trim().is_empty() {
        return Err(AppError::BadRequest("endpoint must not be empty".into()));
    }
    if input.p256dh.trim().is_empty() || input.auth.trim().is_empty() {
        return Err(AppError::BadRequest(
            "subscription keys must not be empty".into(),
        ));
    }

    let subscription = PushEndpointRepo::upsert(&state.pool, &input).await?;

    tracing::info!(
        user_id = subscription.user_id,
        endpoint = %subscription.endpoint,
        "Push subscription stored"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: subscription })))
}

/// Request body for `DELETE /push/subscriptions`.
#[derive(Debug, Deserialize)]
pub struct UnsubscribeRequest {
    pub endpoint: String,
}

/// DELETE /api/v1/push/subscriptions
///
/// Remove a subscription by its endpoint URL. Removing an endpoint that
/// is already gone is a no-op, so the response is 204 either way.
pub async fn unsubscribe(
    State(state): State<AppState>,
    Json(input): Json<UnsubscribeRequest>,
) -> AppResult<StatusCode> {
    let removed = PushEndpointRepo::delete_by_endpoint(&state.pool, &input.endpoint).await?;

    if removed {
        tracing::info!(endpoint = %input.endpoint, "Push subscription removed");
    }

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/push/subscriptions/session/{session_id}
///
/// Remove every subscription registered by a browser session (logout).
/// Returns the number of subscriptions removed.
pub async fn remove_session_subscriptions(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> AppResult<Json<DataResponse<serde_json::Value>>> {
    let removed = PushEndpointRepo::delete_by_session(&state.pool, &session_id).await?;

    if removed > 0 {
        tracing::info!(session_id = %session_id, removed, "Session subscriptions removed");
    }

    Ok(Json(DataResponse {
        data: serde_json::json!({ "removed": removed }),
    }))
}

/// GET /api/v1/push/public-key
///
/// The VAPID public key clients need to create a subscription. 404 until
/// the keypair is configured.
pub async fn public_key(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<serde_json::Value>>> {
    let key = state.transport.public_key().ok_or_else(|| {
        AppError::Core(CoreError::NotFound {
            entity: "VAPID public key",
            key: "VAPID_PUBLIC_KEY".into(),
        })
    })?;

    Ok(Json(DataResponse {
        data: serde_json::json!({ "public_key": key }),
    }))
}
