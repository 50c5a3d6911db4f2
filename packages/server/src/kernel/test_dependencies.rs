// Mock implementations of the kernel collaborator traits for tests.
//
// Follows the builder-style mock convention: `with_*` methods script
// responses, call-recording accessors let tests assert interactions.

use anyhow::Result;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::{BaseCatalogStore, BasePlacesClient, CatalogFilter, Place, StoreError};
use crate::common::ListingId;
use crate::domains::catalog::models::{Listing, NewListing};

// =============================================================================
// Mock Places Client
// =============================================================================

pub struct MockPlacesClient {
    search_results: Arc<Mutex<Vec<Place>>>,
    details: Arc<Mutex<HashMap<String, Place>>>,
    fail_all: bool,
    /// Artificial latency before answering, to widen race windows in
    /// concurrency tests.
    delay: Option<Duration>,
    search_calls: Arc<Mutex<Vec<String>>>,
    details_calls: Arc<Mutex<Vec<String>>>,
}

impl MockPlacesClient {
    pub fn new() -> Self {
        Self {
            search_results: Arc::new(Mutex::new(Vec::new())),
            details: Arc::new(Mutex::new(HashMap::new())),
            fail_all: false,
            delay: None,
            search_calls: Arc::new(Mutex::new(Vec::new())),
            details_calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Register a place: returned by both `text_search` and `place_details`.
    pub fn with_place(self, place: Place) -> Self {
        self.search_results.lock().unwrap().push(place.clone());
        self.details
            .lock()
            .unwrap()
            .insert(place.place_id.clone(), place);
        self
    }

    /// Make every call fail, as an unreachable provider would.
    pub fn failing(mut self) -> Self {
        self.fail_all = true;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Queries passed to `text_search`.
    pub fn search_calls(&self) -> Vec<String> {
        self.search_calls.lock().unwrap().clone()
    }

    /// Place ids passed to `place_details`.
    pub fn details_calls(&self) -> Vec<String> {
        self.details_calls.lock().unwrap().clone()
    }

    /// Minimal place for tests.
    pub fn place(place_id: &str, name: &str) -> Place {
        Place {
            place_id: place_id.to_string(),
            name: name.to_string(),
            formatted_address: "123 Test St".to_string(),
            rating: None,
            price_level: None,
            photos: Vec::new(),
            latitude: None,
            longitude: None,
            summary: None,
        }
    }
}

impl Default for MockPlacesClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BasePlacesClient for MockPlacesClient {
    async fn text_search(
        &self,
        query: &str,
        _location: Option<(f64, f64)>,
        _radius_m: Option<u32>,
    ) -> Result<Vec<Place>> {
        self.search_calls.lock().unwrap().push(query.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_all {
            anyhow::bail!("mock provider unreachable");
        }
        Ok(self.search_results.lock().unwrap().clone())
    }

    async fn place_details(&self, place_id: &str) -> Result<Place> {
        self.details_calls.lock().unwrap().push(place_id.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_all {
            anyhow::bail!("mock provider unreachable");
        }
        let details = self.details.lock().unwrap();
        details
            .get(place_id)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("Places details returned NOT_FOUND"))
    }
}

// =============================================================================
// In-memory Catalog Store
// =============================================================================

/// Catalog store backed by a Vec, enforcing the same sparse uniqueness on
/// `google_place_id` as the Postgres index does.
pub struct InMemoryCatalogStore {
    records: Mutex<Vec<Listing>>,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
        }
    }

    /// Seed a record directly, as catalog seeding/administration would.
    pub async fn seed(&self, record: NewListing) -> Listing {
        self.insert(record).await.expect("seed insert failed")
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn records(&self) -> Vec<Listing> {
        self.records.lock().unwrap().clone()
    }
}

impl Default for InMemoryCatalogStore {
    fn default() -> Self {
        Self::new()
    }
}

fn matches(listing: &Listing, filter: &CatalogFilter) -> bool {
    if let Some(q) = &filter.query {
        let q = q.to_lowercase();
        if !listing.title.to_lowercase().contains(&q)
            && !listing.location.to_lowercase().contains(&q)
        {
            return false;
        }
    }
    if let Some(category) = &filter.category {
        if listing.category.as_deref() != Some(category.as_str()) {
            return false;
        }
    }
    if let Some(min) = filter.min_price {
        if listing.price_per_night < min {
            return false;
        }
    }
    if let Some(max) = filter.max_price {
        if listing.price_per_night > max {
            return false;
        }
    }
    if let Some(guests) = filter.guests {
        if listing.capacity.guests < guests {
            return false;
        }
    }
    if !filter
        .amenities
        .iter()
        .all(|a| listing.amenities.contains(a))
    {
        return false;
    }
    if let Some(bounds) = &filter.bounds {
        match (listing.latitude, listing.longitude) {
            (Some(lat), Some(lng)) => {
                if !bounds.contains(lat, lng) {
                    return false;
                }
            }
            _ => return false,
        }
    }
    true
}

#[async_trait]
impl BaseCatalogStore for InMemoryCatalogStore {
    async fn insert(&self, record: NewListing) -> Result<Listing, StoreError> {
        let mut records = self.records.lock().unwrap();
        if let Some(place_id) = &record.google_place_id {
            if records
                .iter()
                .any(|l| l.google_place_id.as_deref() == Some(place_id.as_str()))
            {
                return Err(StoreError::DuplicateForeignId {
                    place_id: place_id.clone(),
                });
            }
        }
        let listing = record.into_listing();
        records.push(listing.clone());
        Ok(listing)
    }

    async fn find_by_id(&self, id: ListingId) -> Result<Option<Listing>, StoreError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.id == id)
            .cloned())
    }

    async fn find_by_foreign_id(&self, place_id: &str) -> Result<Option<Listing>, StoreError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.google_place_id.as_deref() == Some(place_id))
            .cloned())
    }

    async fn search(&self, filter: &CatalogFilter) -> Result<Vec<Listing>, StoreError> {
        let records = self.records.lock().unwrap();
        Ok(records
            .iter()
            .filter(|l| matches(l, filter))
            .take(filter.limit)
            .cloned()
            .collect())
    }

    async fn known_foreign_ids(&self) -> Result<HashSet<String>, StoreError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter_map(|l| l.google_place_id.clone())
            .collect())
    }
}
