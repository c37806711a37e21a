use crate::models::Booking;

/// Best-effort dual-write to a secondary notification channel after the
/// authoritative insert succeeded. Fire-and-forget: a relay failure is logged
/// and never blocks or rolls back the reservation.
pub fn spawn_relay(url: String, booking: Booking) {
    tokio::spawn(async move {
        let payload = serde_json::json!({
            "id": booking.id,
            "city": booking.city.as_str(),
            "booking_date": booking.booking_date.format("%Y-%m-%d").to_string(),
            "time_slot": booking.time_slot,
            "full_name": booking.full_name,
            "mobile": booking.mobile,
        });

        let result = reqwest::Client::new()
            .post(&url)
            .json(&payload)
            .send()
            .await
            .and_then(|resp| resp.error_for_status());

        match result {
            Ok(_) => tracing::debug!(booking_id = %booking.id, "relayed booking"),
            Err(e) => {
                tracing::warn!(booking_id = %booking.id, error = %e, "booking relay failed")
            }
        }
    });
}
