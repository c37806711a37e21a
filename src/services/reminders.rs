use std::sync::Mutex;

use chrono::{DateTime, FixedOffset, Timelike};
use rusqlite::Connection;
use serde::Serialize;

use crate::config::AppConfig;
use crate::db::queries;
use crate::models::city::parse_time;
use crate::models::{Booking, CityDirectory, CityInfo};
use crate::services::messaging::{normalize_mobile, MessagingProvider};

/// Per-invocation outcome, returned to the scheduler trigger.
#[derive(Debug, Serialize)]
pub struct ReminderSummary {
    pub due_slots: Vec<String>,
    pub candidates: usize,
    pub sent: usize,
    pub failed: usize,
}

impl ReminderSummary {
    fn noop() -> Self {
        Self {
            due_slots: vec![],
            candidates: 0,
            sent: 0,
            failed: 0,
        }
    }
}

/// Slot times whose reminder instant (`slot − lead`) falls within
/// `[now, now − window)` looking backwards, i.e. `0 ≤ now − reminder < window`.
///
/// With the window equal to the scheduler period, each slot matches exactly
/// one invocation of a non-overlapping, non-skipping schedule.
pub fn due_slots(
    directory: &CityDirectory,
    now: DateTime<FixedOffset>,
    lead_minutes: i64,
    window_minutes: i64,
) -> Vec<String> {
    let now_minutes = (now.hour() * 60 + now.minute()) as i64;

    directory
        .all_slot_times()
        .into_iter()
        .filter(|slot| {
            let Ok(slot_minutes) = parse_time(slot) else {
                tracing::warn!(slot, "unparseable slot time in city directory");
                return false;
            };
            let reminder_minutes = slot_minutes - lead_minutes;
            let diff = now_minutes - reminder_minutes;
            diff >= 0 && diff < window_minutes
        })
        .collect()
}

/// One reminder pass: find due slots, message every unsent booking for today
/// in those slots, and flag each booking as processed.
///
/// The flag is set after the send attempt regardless of the gateway outcome,
/// so every booking gets at most one attempt. Gateway errors are counted and
/// logged per booking; a store failure aborts the invocation and the next
/// scheduled run picks up whatever is still unflagged.
pub async fn run(
    db: &Mutex<Connection>,
    directory: &CityDirectory,
    messaging: &dyn MessagingProvider,
    config: &AppConfig,
    now: DateTime<FixedOffset>,
) -> anyhow::Result<ReminderSummary> {
    let due = due_slots(
        directory,
        now,
        config.reminder_lead_minutes,
        config.reminder_window_minutes,
    );
    if due.is_empty() {
        tracing::debug!("no time slots due for reminders");
        return Ok(ReminderSummary::noop());
    }

    let today = now.date_naive();
    tracing::info!(date = %today, slots = ?due, "reminder slots due");

    let candidates = {
        let conn = db.lock().unwrap();
        queries::reminder_candidates(&conn, today, &due)?
    };

    let mut sent = 0;
    let mut failed = 0;

    for booking in &candidates {
        let info = directory.get(booking.city);
        let message = build_reminder_message(&config.business_name, booking, info);
        let to = normalize_mobile(&booking.mobile);

        match messaging.send_message(&to, &message).await {
            Ok(()) => sent += 1,
            Err(e) => {
                failed += 1;
                tracing::warn!(booking_id = %booking.id, error = %e, "reminder send failed");
            }
        }

        // Mark regardless of the gateway outcome: at most one attempt per
        // booking, no duplicate spam on the next run.
        let conn = db.lock().unwrap();
        queries::mark_sms_sent(&conn, &booking.id)?;
    }

    let summary = ReminderSummary {
        due_slots: due,
        candidates: candidates.len(),
        sent,
        failed,
    };
    tracing::info!(
        candidates = summary.candidates,
        sent = summary.sent,
        failed = summary.failed,
        "reminder pass complete"
    );
    Ok(summary)
}

fn build_reminder_message(business_name: &str, booking: &Booking, info: Option<&CityInfo>) -> String {
    let (address, map_link, phone) = match info {
        Some(info) => (
            info.address.as_str(),
            info.map_link.as_str(),
            info.contact_phone.as_str(),
        ),
        None => (booking.city.as_str(), "", ""),
    };

    format!(
        "اهلا {name}\n\nنود تذكيركم بجلسة التدريب اليوم في {business_name}\nاليوم: {date}\nالوقت: {time}\nالموقع: {address}\n{map_link}\nللاستفسارات: {phone}",
        name = booking.full_name,
        date = booking.booking_date.format("%Y-%m-%d"),
        time = booking.time_slot,
    )
}
