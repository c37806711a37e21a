use std::env;

use chrono::{DateTime, FixedOffset, Utc, Weekday};

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub admin_token: String,
    pub business_name: String,
    pub slot_capacity: i64,
    pub excluded_weekday: Weekday,
    pub utc_offset_hours: i32,
    pub reminder_lead_minutes: i64,
    pub reminder_window_minutes: i64,
    pub reminder_interval_minutes: Option<u64>,
    pub city_config_path: Option<String>,
    pub relay_url: Option<String>,
    pub mora_api_key: String,
    pub mora_username: String,
    pub mora_sender: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "driverbook.db".to_string()),
            admin_token: env::var("ADMIN_TOKEN").unwrap_or_else(|_| "changeme".to_string()),
            business_name: env::var("BUSINESS_NAME").unwrap_or_else(|_| "PIESHIP".to_string()),
            slot_capacity: env::var("SLOT_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            excluded_weekday: env::var("EXCLUDED_WEEKDAY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(Weekday::Fri),
            utc_offset_hours: env::var("UTC_OFFSET_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3),
            reminder_lead_minutes: env::var("REMINDER_LEAD_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(300),
            reminder_window_minutes: env::var("REMINDER_WINDOW_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(15),
            reminder_interval_minutes: env::var("REMINDER_INTERVAL_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok()),
            city_config_path: env::var("CITY_CONFIG").ok(),
            relay_url: env::var("RELAY_URL").ok(),
            mora_api_key: env::var("MORA_API_KEY").unwrap_or_default(),
            mora_username: env::var("MORA_USERNAME").unwrap_or_default(),
            mora_sender: env::var("MORA_SENDER").unwrap_or_default(),
        }
    }

    /// Current wall-clock time in the deployment's reference timezone.
    pub fn local_now(&self) -> DateTime<FixedOffset> {
        let offset = FixedOffset::east_opt(self.utc_offset_hours * 3600)
            .unwrap_or_else(|| FixedOffset::east_opt(0).unwrap());
        Utc::now().with_timezone(&offset)
    }
}
