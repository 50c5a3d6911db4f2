pub mod models;

pub use models::{Destination, Experience, Guide, TravelPackage};
