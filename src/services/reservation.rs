use chrono::{DateTime, Datelike, FixedOffset, Weekday};
use rusqlite::Connection;

use crate::db::queries;
use crate::models::{Booking, BookingRequest};

#[derive(Debug, thiserror::Error)]
pub enum ReservationError {
    #[error("full name must contain at least two words")]
    InvalidName,

    #[error("mobile number must start with 05 and be 10 digits")]
    InvalidMobile,

    #[error("booking date must be a future working day")]
    InvalidDate,

    #[error("no seats left for this slot")]
    SlotFull,

    #[error("this mobile number already has a booking on that date")]
    DuplicateBooking,

    #[error("store error: {0}")]
    Store(#[source] anyhow::Error),
}

impl ReservationError {
    /// Stable code for the UI-facing data contract.
    pub fn code(&self) -> &'static str {
        match self {
            ReservationError::InvalidName => "InvalidName",
            ReservationError::InvalidMobile => "InvalidMobile",
            ReservationError::InvalidDate => "InvalidDate",
            ReservationError::SlotFull => "SlotFull",
            ReservationError::DuplicateBooking => "DuplicateBooking",
            ReservationError::Store(_) => "StoreError",
        }
    }
}

/// Validate and insert a booking. Fail fast; the first failing check wins.
///
/// The occupancy re-check and the insert run inside one transaction on the
/// shared connection, so two requests racing for the last seat serialize at
/// the store and exactly one wins. The (mobile, booking_date) uniqueness
/// constraint is enforced by the store itself rather than a pre-check, which
/// closes that race window entirely.
pub fn reserve(
    conn: &mut Connection,
    capacity: i64,
    request: &BookingRequest,
    now: DateTime<FixedOffset>,
    excluded_weekday: Weekday,
) -> Result<Booking, ReservationError> {
    if !valid_full_name(&request.full_name) {
        return Err(ReservationError::InvalidName);
    }
    if !valid_mobile(&request.mobile) {
        return Err(ReservationError::InvalidMobile);
    }
    if request.booking_date <= now.date_naive()
        || request.booking_date.weekday() == excluded_weekday
    {
        return Err(ReservationError::InvalidDate);
    }

    let booking = Booking {
        id: uuid::Uuid::new_v4().to_string(),
        city: request.city,
        booking_date: request.booking_date,
        time_slot: request.time_slot.clone(),
        full_name: request.full_name.trim().to_string(),
        mobile: request.mobile.trim().to_string(),
        sms_sent: false,
        created_at: now.naive_utc(),
    };

    let tx = conn
        .transaction()
        .map_err(|e| ReservationError::Store(e.into()))?;

    let occupancy =
        queries::count_slot_bookings(&tx, booking.city, booking.booking_date, &booking.time_slot)
            .map_err(ReservationError::Store)?;
    if occupancy >= capacity {
        return Err(ReservationError::SlotFull);
    }

    match queries::insert_booking(&tx, &booking) {
        Ok(()) => {}
        Err(e) if e.sqlite_error_code() == Some(rusqlite::ErrorCode::ConstraintViolation) => {
            return Err(ReservationError::DuplicateBooking);
        }
        Err(e) => return Err(ReservationError::Store(e.into())),
    }

    tx.commit().map_err(|e| ReservationError::Store(e.into()))?;
    Ok(booking)
}

fn valid_full_name(name: &str) -> bool {
    name.split_whitespace().count() >= 2
}

fn valid_mobile(mobile: &str) -> bool {
    let mobile = mobile.trim();
    mobile.len() == 10 && mobile.starts_with("05") && mobile.chars().all(|c| c.is_ascii_digit())
}
