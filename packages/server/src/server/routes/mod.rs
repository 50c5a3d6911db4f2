pub mod auth;
pub mod bookings;
pub mod content;
pub mod health;
pub mod listings;
pub mod reviews;
pub mod wishlist;

pub use auth::{login_handler, me_handler, register_handler};
pub use bookings::{cancel_booking_handler, create_booking_handler, list_bookings_handler};
pub use content::{
    get_destination_handler, get_experience_handler, get_guide_handler, get_package_handler,
    list_destinations_handler, list_experiences_handler, list_guides_handler,
    list_packages_handler,
};
pub use health::health_handler;
pub use listings::{get_listing_handler, search_listings_handler};
pub use reviews::{create_review_handler, list_reviews_handler};
pub use wishlist::{
    add_wishlist_handler, list_wishlist_handler, remove_wishlist_handler, wishlist_status_handler,
};
