use chrono::NaiveDate;
use rusqlite::Connection;

use crate::db::queries;
use crate::models::City;

/// Remaining seats for a (city, date, slot) triple: `max(0, capacity − count)`.
///
/// Advisory only; the reservation service re-checks occupancy at insert time.
/// A store failure propagates so callers can fail safe by disabling the slot
/// instead of guessing a count.
pub fn remaining_seats(
    conn: &Connection,
    capacity: i64,
    city: City,
    date: NaiveDate,
    time_slot: &str,
) -> anyhow::Result<i64> {
    let count = queries::count_slot_bookings(conn, city, date, time_slot)?;
    Ok((capacity - count).max(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::models::Booking;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn insert(conn: &Connection, id: &str, mobile: &str) {
        let booking = Booking {
            id: id.to_string(),
            city: City::Riyadh,
            booking_date: date("2025-07-01"),
            time_slot: "14:00".to_string(),
            full_name: "Ahmed Ali".to_string(),
            mobile: mobile.to_string(),
            sms_sent: false,
            created_at: chrono::Utc::now().naive_utc(),
        };
        queries::insert_booking(conn, &booking).unwrap();
    }

    #[test]
    fn test_empty_slot_has_full_capacity() {
        let conn = db::init_db(":memory:").unwrap();
        let remaining =
            remaining_seats(&conn, 30, City::Riyadh, date("2025-07-01"), "14:00").unwrap();
        assert_eq!(remaining, 30);
    }

    #[test]
    fn test_counts_only_matching_slot() {
        let conn = db::init_db(":memory:").unwrap();
        insert(&conn, "b1", "0511111111");
        insert(&conn, "b2", "0522222222");

        let remaining =
            remaining_seats(&conn, 30, City::Riyadh, date("2025-07-01"), "14:00").unwrap();
        assert_eq!(remaining, 28);

        let other_city =
            remaining_seats(&conn, 30, City::Jeddah, date("2025-07-01"), "14:00").unwrap();
        assert_eq!(other_city, 30);
    }

    #[test]
    fn test_never_negative() {
        let conn = db::init_db(":memory:").unwrap();
        insert(&conn, "b1", "0511111111");
        insert(&conn, "b2", "0522222222");

        // Capacity lowered below current occupancy, e.g. after a config change.
        let remaining =
            remaining_seats(&conn, 1, City::Riyadh, date("2025-07-01"), "14:00").unwrap();
        assert_eq!(remaining, 0);
    }
}
