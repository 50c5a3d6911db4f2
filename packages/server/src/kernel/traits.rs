// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Business logic (like resolution and search blending) lives in kernel/domain
// functions that use these traits.
//
// Naming convention: Base* for trait names (e.g., BaseCatalogStore)

use async_trait::async_trait;
use std::collections::HashSet;
use thiserror::Error;

use crate::common::ListingId;
use crate::domains::catalog::models::{Listing, NewListing};

// =============================================================================
// Catalog Store Trait (Infrastructure)
// =============================================================================

/// Errors reported by catalog store implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Insert rejected by the sparse unique index on the provider id. Two
    /// concurrent resolutions of the same foreign id can both reach insert;
    /// the caller must re-run the lookup-by-foreign-id step instead of
    /// treating this as terminal.
    #[error("a listing with provider id {place_id} already exists")]
    DuplicateForeignId { place_id: String },

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Geographic bounding box (south-west / north-east corners).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBounds {
    pub sw_lat: f64,
    pub sw_lng: f64,
    pub ne_lat: f64,
    pub ne_lng: f64,
}

impl GeoBounds {
    /// Whether a point falls inside the box (inclusive).
    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        lat >= self.sw_lat && lat <= self.ne_lat && lng >= self.sw_lng && lng <= self.ne_lng
    }

    /// Center of the box.
    pub fn center(&self) -> (f64, f64) {
        (
            (self.sw_lat + self.ne_lat) / 2.0,
            (self.sw_lng + self.ne_lng) / 2.0,
        )
    }

    /// Radius in meters of a circle centered on the box that covers its
    /// corners. Haversine on the half-diagonal.
    pub fn cover_radius_m(&self) -> f64 {
        const EARTH_RADIUS_M: f64 = 6_371_000.0;

        let (clat, clng) = self.center();
        let dlat = (self.ne_lat - clat).to_radians();
        let dlng = (self.ne_lng - clng).to_radians();

        let a = (dlat / 2.0).sin().powi(2)
            + clat.to_radians().cos() * self.ne_lat.to_radians().cos() * (dlng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_M * c
    }
}

/// Store-level search constraints. Equality, range, set-membership and
/// case-insensitive substring, per the catalog store contract.
#[derive(Debug, Clone)]
pub struct CatalogFilter {
    /// Case-insensitive substring match on title and location.
    pub query: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    /// Minimum guest capacity.
    pub guests: Option<i32>,
    /// Every listed amenity must be present.
    pub amenities: Vec<String>,
    pub bounds: Option<GeoBounds>,
    pub limit: usize,
}

impl Default for CatalogFilter {
    fn default() -> Self {
        Self {
            query: None,
            category: None,
            min_price: None,
            max_price: None,
            guests: None,
            amenities: Vec::new(),
            bounds: None,
            limit: 20,
        }
    }
}

/// Document-store collaborator holding catalog records.
///
/// Implementations must enforce sparse uniqueness on the provider id field:
/// `insert` of a record whose `google_place_id` is already present fails with
/// [`StoreError::DuplicateForeignId`]; records without a provider id never
/// collide.
#[async_trait]
pub trait BaseCatalogStore: Send + Sync {
    /// Insert a new record. The store assigns the local id and timestamps.
    async fn insert(&self, record: NewListing) -> Result<Listing, StoreError>;

    async fn find_by_id(&self, id: ListingId) -> Result<Option<Listing>, StoreError>;

    /// Lookup by the provider-assigned foreign id.
    async fn find_by_foreign_id(&self, place_id: &str) -> Result<Option<Listing>, StoreError>;

    async fn search(&self, filter: &CatalogFilter) -> Result<Vec<Listing>, StoreError>;

    /// All foreign ids currently mapped to local records. Used to
    /// de-duplicate provider search results.
    async fn known_foreign_ids(&self) -> Result<HashSet<String>, StoreError>;
}

// =============================================================================
// Places Provider Trait (Infrastructure)
// =============================================================================

/// A place as reported by the external places provider.
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    /// Provider-assigned id, independent of this system.
    pub place_id: String,
    pub name: String,
    pub formatted_address: String,
    pub rating: Option<f64>,
    /// Coarse price tier, 0..=4.
    pub price_level: Option<i32>,
    /// Fully-built photo URLs (the client resolves photo references).
    pub photos: Vec<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Long-form editorial summary, details responses only.
    pub summary: Option<String>,
}

/// Outbound client for the external places provider.
///
/// Both operations report transport failures and non-success provider
/// statuses as errors; callers at the resolution boundary collapse those to
/// a not-found outcome rather than propagating them.
#[async_trait]
pub trait BasePlacesClient: Send + Sync {
    /// Free-text place search, optionally biased to a location/radius.
    async fn text_search(
        &self,
        query: &str,
        location: Option<(f64, f64)>,
        radius_m: Option<u32>,
    ) -> anyhow::Result<Vec<Place>>;

    /// Fetch a single place by provider id.
    async fn place_details(&self, place_id: &str) -> anyhow::Result<Place>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_contains() {
        let bounds = GeoBounds {
            sw_lat: 44.0,
            sw_lng: -94.0,
            ne_lat: 45.0,
            ne_lng: -93.0,
        };
        assert!(bounds.contains(44.5, -93.5));
        assert!(bounds.contains(44.0, -94.0)); // corner is inclusive
        assert!(!bounds.contains(45.5, -93.5));
        assert!(!bounds.contains(44.5, -92.5));
    }

    #[test]
    fn test_bounds_center() {
        let bounds = GeoBounds {
            sw_lat: 44.0,
            sw_lng: -94.0,
            ne_lat: 45.0,
            ne_lng: -93.0,
        };
        assert_eq!(bounds.center(), (44.5, -93.5));
    }

    #[test]
    fn test_cover_radius_reaches_corner() {
        // Roughly a 1°×1° box around Minneapolis: the half-diagonal is
        // ~68 km, so the covering radius must exceed the half-height (~55km).
        let bounds = GeoBounds {
            sw_lat: 44.0,
            sw_lng: -94.0,
            ne_lat: 45.0,
            ne_lng: -93.0,
        };
        let r = bounds.cover_radius_m();
        assert!(r > 55_000.0, "radius {} too small", r);
        assert!(r < 100_000.0, "radius {} too large", r);
    }
}
