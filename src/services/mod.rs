pub mod availability;
pub mod messaging;
pub mod relay;
pub mod reminders;
pub mod reservation;
