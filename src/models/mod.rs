pub mod booking;
pub mod city;

pub use booking::{Booking, BookingRequest};
pub use city::{City, CityDirectory, CityInfo};
