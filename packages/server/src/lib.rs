//! Roamstay server library.
//!
//! Booking marketplace backend: a local catalog of listings augmented on
//! demand from an external places provider, plus bookings, reviews,
//! wishlists and static travel content.

pub mod common;
pub mod domains;
pub mod kernel;
pub mod server;

pub use common::config::Config;
