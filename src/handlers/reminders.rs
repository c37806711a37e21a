use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;

use crate::errors::AppError;
use crate::services::reminders::{self, ReminderSummary};
use crate::state::AppState;

// POST /api/jobs/sms-reminders
//
// Trigger for the external periodic invoker. No payload; the job works from
// the current wall-clock time in the reference timezone.
pub async fn dispatch(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<ReminderSummary>, AppError> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    if auth.strip_prefix("Bearer ").unwrap_or("") != state.config.admin_token {
        return Err(AppError::Unauthorized);
    }

    let summary = reminders::run(
        &state.db,
        &state.cities,
        state.messaging.as_ref(),
        &state.config,
        state.config.local_now(),
    )
    .await?;

    Ok(Json(summary))
}
