pub mod listing;

pub use listing::{Capacity, HostProfile, Listing, NewListing};
