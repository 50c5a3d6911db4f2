pub mod models;

pub use models::booking::{validate_stay, Booking, BookingStatus};
