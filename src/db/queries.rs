use chrono::{NaiveDate, NaiveDateTime, Utc};
use rusqlite::{params, Connection};

use crate::models::{Booking, City};

const DATE_FMT: &str = "%Y-%m-%d";
const DATETIME_FMT: &str = "%Y-%m-%d %H:%M:%S";

const BOOKING_COLUMNS: &str =
    "id, city, booking_date, time_slot, full_name, mobile, sms_sent, created_at";

/// Raw insert. Returns the bare rusqlite error so the reservation service can
/// distinguish a uniqueness-constraint rejection from other store failures.
pub fn insert_booking(conn: &Connection, booking: &Booking) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO bookings (id, city, booking_date, time_slot, full_name, mobile, sms_sent, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            booking.id,
            booking.city.as_str(),
            booking.booking_date.format(DATE_FMT).to_string(),
            booking.time_slot,
            booking.full_name,
            booking.mobile,
            booking.sms_sent as i32,
            booking.created_at.format(DATETIME_FMT).to_string(),
        ],
    )?;
    Ok(())
}

pub fn count_slot_bookings(
    conn: &Connection,
    city: City,
    date: NaiveDate,
    time_slot: &str,
) -> anyhow::Result<i64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM bookings WHERE city = ?1 AND booking_date = ?2 AND time_slot = ?3",
        params![city.as_str(), date.format(DATE_FMT).to_string(), time_slot],
        |row| row.get(0),
    )?;
    Ok(count)
}

/// Bookings on `date` in one of `time_slots` that have not been reminded yet.
pub fn reminder_candidates(
    conn: &Connection,
    date: NaiveDate,
    time_slots: &[String],
) -> anyhow::Result<Vec<Booking>> {
    if time_slots.is_empty() {
        return Ok(vec![]);
    }

    let placeholders = (0..time_slots.len())
        .map(|i| format!("?{}", i + 2))
        .collect::<Vec<_>>()
        .join(", ");
    let sql = format!(
        "SELECT {BOOKING_COLUMNS} FROM bookings
         WHERE booking_date = ?1 AND sms_sent = 0 AND time_slot IN ({placeholders})
         ORDER BY created_at ASC"
    );

    let mut params_vec: Vec<Box<dyn rusqlite::types::ToSql>> =
        vec![Box::new(date.format(DATE_FMT).to_string())];
    for slot in time_slots {
        params_vec.push(Box::new(slot.clone()));
    }
    let params_refs: Vec<&dyn rusqlite::types::ToSql> =
        params_vec.iter().map(|p| p.as_ref()).collect();

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_refs.as_slice(), |row| Ok(parse_booking_row(row)))?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row??);
    }
    Ok(bookings)
}

pub fn mark_sms_sent(conn: &Connection, id: &str) -> anyhow::Result<bool> {
    let count = conn.execute("UPDATE bookings SET sms_sent = 1 WHERE id = ?1", params![id])?;
    Ok(count > 0)
}

/// Admin listing, newest first. All filters optional; `search` matches name
/// or mobile as a substring.
pub fn list_bookings(
    conn: &Connection,
    city: Option<City>,
    date: Option<NaiveDate>,
    search: Option<&str>,
    limit: i64,
) -> anyhow::Result<Vec<Booking>> {
    let mut sql = format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE 1=1");
    let mut params_vec: Vec<Box<dyn rusqlite::types::ToSql>> = vec![];

    if let Some(city) = city {
        params_vec.push(Box::new(city.as_str().to_string()));
        sql.push_str(&format!(" AND city = ?{}", params_vec.len()));
    }
    if let Some(date) = date {
        params_vec.push(Box::new(date.format(DATE_FMT).to_string()));
        sql.push_str(&format!(" AND booking_date = ?{}", params_vec.len()));
    }
    if let Some(q) = search {
        let pattern = format!("%{}%", q.trim());
        params_vec.push(Box::new(pattern));
        let idx = params_vec.len();
        sql.push_str(&format!(
            " AND (full_name LIKE ?{idx} OR mobile LIKE ?{idx})"
        ));
    }

    params_vec.push(Box::new(limit));
    sql.push_str(&format!(
        " ORDER BY created_at DESC LIMIT ?{}",
        params_vec.len()
    ));

    let params_refs: Vec<&dyn rusqlite::types::ToSql> =
        params_vec.iter().map(|p| p.as_ref()).collect();

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_refs.as_slice(), |row| Ok(parse_booking_row(row)))?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row??);
    }
    Ok(bookings)
}

/// Booking counts grouped by (date, city) over an inclusive date range, for
/// the capacity summary.
pub fn summary_counts(
    conn: &Connection,
    start: NaiveDate,
    end: NaiveDate,
) -> anyhow::Result<Vec<(NaiveDate, City, i64)>> {
    let mut stmt = conn.prepare(
        "SELECT booking_date, city, COUNT(*) FROM bookings
         WHERE booking_date >= ?1 AND booking_date <= ?2
         GROUP BY booking_date, city",
    )?;

    let rows = stmt.query_map(
        params![
            start.format(DATE_FMT).to_string(),
            end.format(DATE_FMT).to_string()
        ],
        |row| {
            let date: String = row.get(0)?;
            let city: String = row.get(1)?;
            let count: i64 = row.get(2)?;
            Ok((date, city, count))
        },
    )?;

    let mut counts = vec![];
    for row in rows {
        let (date_str, city_str, count) = row?;
        let date = NaiveDate::parse_from_str(&date_str, DATE_FMT)
            .map_err(|e| anyhow::anyhow!("bad booking_date in store: {e}"))?;
        let city = City::parse(&city_str)
            .ok_or_else(|| anyhow::anyhow!("unknown city in store: {city_str}"))?;
        counts.push((date, city, count));
    }
    Ok(counts)
}

pub fn get_booking_by_id(conn: &Connection, id: &str) -> anyhow::Result<Option<Booking>> {
    let result = conn.query_row(
        &format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = ?1"),
        params![id],
        |row| Ok(parse_booking_row(row)),
    );

    match result {
        Ok(booking) => Ok(Some(booking?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn parse_booking_row(row: &rusqlite::Row) -> anyhow::Result<Booking> {
    let id: String = row.get(0)?;
    let city_str: String = row.get(1)?;
    let date_str: String = row.get(2)?;
    let time_slot: String = row.get(3)?;
    let full_name: String = row.get(4)?;
    let mobile: String = row.get(5)?;
    let sms_sent: bool = row.get::<_, i32>(6)? != 0;
    let created_at_str: String = row.get(7)?;

    let city = City::parse(&city_str)
        .ok_or_else(|| anyhow::anyhow!("unknown city in store: {city_str}"))?;
    let booking_date = NaiveDate::parse_from_str(&date_str, DATE_FMT)
        .map_err(|e| anyhow::anyhow!("bad booking_date in store: {e}"))?;
    let created_at = NaiveDateTime::parse_from_str(&created_at_str, DATETIME_FMT)
        .unwrap_or_else(|_| Utc::now().naive_utc());

    Ok(Booking {
        id,
        city,
        booking_date,
        time_slot,
        full_name,
        mobile,
        sms_sent,
        created_at,
    })
}
