use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::City;
use crate::services::availability;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct RemainingQuery {
    pub city: City,
    pub date: NaiveDate,
    pub time: String,
}

#[derive(Serialize)]
pub struct RemainingResponse {
    pub remaining: i64,
}

// GET /api/slots/remaining
//
// Advisory count for the slot picker. Date and time pass through unvalidated;
// the UI only offers valid combinations and the reservation path re-checks.
pub async fn remaining(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RemainingQuery>,
) -> Result<Json<RemainingResponse>, AppError> {
    let remaining = {
        let db = state.db.lock().unwrap();
        availability::remaining_seats(
            &db,
            state.config.slot_capacity,
            query.city,
            query.date,
            &query.time,
        )?
    };

    Ok(Json(RemainingResponse { remaining }))
}
