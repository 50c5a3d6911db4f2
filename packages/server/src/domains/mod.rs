pub mod auth;
pub mod bookings;
pub mod catalog;
pub mod content;
pub mod reviews;
pub mod wishlists;
