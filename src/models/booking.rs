use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::City;

/// A confirmed reservation. Immutable after insert except for `sms_sent`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    pub city: City,
    pub booking_date: NaiveDate,
    pub time_slot: String,
    pub full_name: String,
    pub mobile: String,
    pub sms_sent: bool,
    pub created_at: NaiveDateTime,
}

/// What the booking form submits.
#[derive(Debug, Clone, Deserialize)]
pub struct BookingRequest {
    pub city: City,
    pub booking_date: NaiveDate,
    pub time_slot: String,
    pub full_name: String,
    pub mobile: String,
}
