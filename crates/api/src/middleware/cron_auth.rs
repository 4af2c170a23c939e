//! Shared-secret authorization for the cron trigger endpoint.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use pulse_core::error::CoreError;

use crate::error::AppError;
use crate::state::AppState;

/// Header the periodic-job caller presents its secret in.
pub const CRON_SECRET_HEADER: &str = "x-cron-secret";

/// Extractor proving the request came from the authorized periodic-job
/// caller. Rejection happens before any work is done or state touched.
///
/// ```ignore
/// async fn trigger(_auth: CronAuthorized, State(state): State<AppState>) -> AppResult<()> {
///     // only reached with a matching x-cron-secret header
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct CronAuthorized;

impl FromRequestParts<AppState> for CronAuthorized {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Fail closed: with no secret configured, nobody may trigger runs.
        let expected = state.config.cron_secret.as_deref().ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Cron trigger is disabled: CRON_SECRET is not set".into(),
            ))
        })?;

        let provided = parts
            .headers
            .get(CRON_SECRET_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(format!(
                    "Missing {CRON_SECRET_HEADER} header"
                )))
            })?;

        if provided != expected {
            return Err(AppError::Core(CoreError::Unauthorized(
                "Invalid cron secret".into(),
            )));
        }

        Ok(CronAuthorized)
    }
}
