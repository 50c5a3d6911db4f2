pub mod models;

pub use models::review::Review;
