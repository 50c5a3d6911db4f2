pub mod destination;
pub mod experience;
pub mod guide;
pub mod travel_package;

pub use destination::Destination;
pub use experience::Experience;
pub use guide::Guide;
pub use travel_package::TravelPackage;
