use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;

use crate::common::ListingId;

/// Host descriptor embedded in a listing.
///
/// For provider-materialized records this is placeholder data, not derived
/// from provider fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostProfile {
    pub name: String,
    pub avatar: String,
    pub is_superhost: bool,
}

/// Capacity descriptor embedded in a listing.
///
/// Provider-materialized records carry randomized filler here; callers must
/// not rely on these being stable or accurate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Capacity {
    pub guests: i32,
    pub bedrooms: i32,
    pub beds: i32,
    pub baths: i32,
}

/// Catalog record: a bookable listing.
///
/// Identity is either the store-assigned 24-hex `id` or, for records
/// materialized from the places provider, the sparse-unique
/// `google_place_id` foreign id. Records are created by seeding/administration
/// or by the resolver; the resolver never deletes them.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Listing {
    pub id: ListingId,
    pub title: String,
    pub location: String,
    pub description: String,
    pub category: Option<String>,
    pub price_per_night: f64,
    pub rating: f64,
    pub images: Vec<String>,
    pub amenities: Vec<String>,
    pub host: Json<HostProfile>,
    pub capacity: Json<Capacity>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// True for records materialized from the places provider.
    pub is_external: bool,
    /// Provider-assigned foreign id. Sparse-unique across all records.
    pub google_place_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A record to insert. The store assigns the local id and timestamps.
#[derive(Debug, Clone)]
pub struct NewListing {
    pub title: String,
    pub location: String,
    pub description: String,
    pub category: Option<String>,
    pub price_per_night: f64,
    pub rating: f64,
    pub images: Vec<String>,
    pub amenities: Vec<String>,
    pub host: HostProfile,
    pub capacity: Capacity,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub is_external: bool,
    pub google_place_id: Option<String>,
}

impl NewListing {
    /// Materialize the full record with a freshly assigned id. Store
    /// implementations share this so both assign ids the same way.
    pub fn into_listing(self) -> Listing {
        let now = Utc::now();
        Listing {
            id: ListingId::new(),
            title: self.title,
            location: self.location,
            description: self.description,
            category: self.category,
            price_per_night: self.price_per_night,
            rating: self.rating,
            images: self.images,
            amenities: self.amenities,
            host: Json(self.host),
            capacity: Json(self.capacity),
            latitude: self.latitude,
            longitude: self.longitude,
            is_external: self.is_external,
            google_place_id: self.google_place_id,
            created_at: now,
            updated_at: now,
        }
    }
}
