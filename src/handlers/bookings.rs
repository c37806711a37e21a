use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::models::{Booking, BookingRequest};
use crate::services::relay;
use crate::services::reservation::{self, ReservationError};
use crate::state::AppState;

/// Echoed booking details for the confirmation screen.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingView {
    pub id: String,
    pub city: String,
    pub booking_date: String,
    pub time_slot: String,
    pub full_name: String,
    pub mobile: String,
    pub sms_sent: bool,
    pub created_at: String,
}

impl From<&Booking> for BookingView {
    fn from(b: &Booking) -> Self {
        Self {
            id: b.id.clone(),
            city: b.city.as_str().to_string(),
            booking_date: b.booking_date.format("%Y-%m-%d").to_string(),
            time_slot: b.time_slot.clone(),
            full_name: b.full_name.clone(),
            mobile: b.mobile.clone(),
            sms_sent: b.sms_sent,
            created_at: b.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReserveResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking: Option<BookingView>,
}

// POST /api/bookings
pub async fn reserve(
    State(state): State<Arc<AppState>>,
    Json(request): Json<BookingRequest>,
) -> (StatusCode, Json<ReserveResponse>) {
    let now = state.config.local_now();

    let result = {
        let mut db = state.db.lock().unwrap();
        reservation::reserve(
            &mut db,
            state.config.slot_capacity,
            &request,
            now,
            state.config.excluded_weekday,
        )
    };

    match result {
        Ok(booking) => {
            tracing::info!(
                booking_id = %booking.id,
                city = booking.city.as_str(),
                date = %booking.booking_date,
                slot = %booking.time_slot,
                "booking reserved"
            );

            if let Some(url) = state.config.relay_url.clone() {
                relay::spawn_relay(url, booking.clone());
            }

            (
                StatusCode::OK,
                Json(ReserveResponse {
                    success: true,
                    error_code: None,
                    booking: Some(BookingView::from(&booking)),
                }),
            )
        }
        Err(e) => {
            let status = match &e {
                ReservationError::InvalidName
                | ReservationError::InvalidMobile
                | ReservationError::InvalidDate => StatusCode::BAD_REQUEST,
                ReservationError::SlotFull | ReservationError::DuplicateBooking => {
                    StatusCode::CONFLICT
                }
                ReservationError::Store(_) => StatusCode::SERVICE_UNAVAILABLE,
            };

            if let ReservationError::Store(source) = &e {
                tracing::error!(
                    error = %source,
                    city = request.city.as_str(),
                    date = %request.booking_date,
                    slot = %request.time_slot,
                    "reservation store failure"
                );
            }

            (
                status,
                Json(ReserveResponse {
                    success: false,
                    error_code: Some(e.code()),
                    booking: None,
                }),
            )
        }
    }
}
