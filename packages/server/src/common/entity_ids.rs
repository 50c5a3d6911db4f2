//! Typed ID definitions for all domain entities.
//!
//! One marker type and alias per entity, providing compile-time type safety
//! for id usage throughout the application.

pub use super::id::RecordId;

// ============================================================================
// Entity marker types
// ============================================================================

/// Marker type for Listing entities (catalog records).
pub struct Listing;

/// Marker type for User entities.
pub struct User;

/// Marker type for Booking entities.
pub struct Booking;

/// Marker type for Review entities.
pub struct Review;

/// Marker type for WishlistItem entities.
pub struct WishlistItem;

/// Marker type for Destination entities.
pub struct Destination;

/// Marker type for Guide entities.
pub struct Guide;

/// Marker type for Experience entities.
pub struct Experience;

/// Marker type for TravelPackage entities.
pub struct TravelPackage;

// ============================================================================
// Type aliases - the primary API
// ============================================================================

/// Typed ID for Listing entities.
pub type ListingId = RecordId<Listing>;

/// Typed ID for User entities.
pub type UserId = RecordId<User>;

/// Typed ID for Booking entities.
pub type BookingId = RecordId<Booking>;

/// Typed ID for Review entities.
pub type ReviewId = RecordId<Review>;

/// Typed ID for WishlistItem entities.
pub type WishlistItemId = RecordId<WishlistItem>;

/// Typed ID for Destination entities.
pub type DestinationId = RecordId<Destination>;

/// Typed ID for Guide entities.
pub type GuideId = RecordId<Guide>;

/// Typed ID for Experience entities.
pub type ExperienceId = RecordId<Experience>;

/// Typed ID for TravelPackage entities.
pub type PackageId = RecordId<TravelPackage>;
