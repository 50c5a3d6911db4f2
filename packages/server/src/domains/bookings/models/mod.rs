pub mod booking;

pub use booking::{validate_stay, Booking, BookingStatus};
