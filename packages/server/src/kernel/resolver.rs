//! External-record resolver.
//!
//! Callers hand the catalog an opaque identifier that is either a
//! store-assigned local id or a provider-assigned foreign id. The resolver
//! unifies both into a local id, fetching the place from the provider and
//! persisting it as a catalog record when no mapping exists yet.
//!
//! Concurrency: there is no per-identifier lock. Two concurrent resolutions
//! of the same unmapped foreign id can both miss the existence check and
//! both insert; the store's sparse unique index rejects the loser, which
//! then re-reads by foreign id and returns the winner's record.

use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

use super::{BaseCatalogStore, BasePlacesClient, Place, StoreError};
use crate::common::ListingId;
use crate::domains::catalog::models::{Capacity, HostProfile, Listing, NewListing};

/// Image used when the provider reports no photos.
pub const PLACEHOLDER_IMAGE: &str =
    "https://images.unsplash.com/photo-1566073771259-6a8506099945?w=800";

/// Rating used when the provider reports none.
pub const DEFAULT_RATING: f64 = 4.5;

/// Fixed amenity set for provider-materialized records.
pub const DEFAULT_AMENITIES: &[&str] =
    &["WiFi", "Kitchen", "Air conditioning", "Free parking", "TV"];

/// Nightly base price per provider price tier (0..=4).
const PRICE_TIER_BASE: [f64; 5] = [0.0, 12.0, 20.0, 30.0, 40.0];

const MAX_PHOTOS: usize = 5;
const HOST_NAME: &str = "Verified Host";
const HOST_AVATAR: &str = "https://i.pravatar.cc/150?img=32";

/// An identifier classified into exactly one of its two kinds.
///
/// One classification function, consumed uniformly by every resolver caller;
/// the format check is not re-derived at call sites.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaceIdentifier {
    /// Well-formed local id (24-hex token).
    Local(ListingId),
    /// Anything else is treated as a provider id.
    Foreign(String),
}

impl PlaceIdentifier {
    pub fn classify(raw: &str) -> Self {
        match ListingId::parse(raw) {
            Ok(id) => PlaceIdentifier::Local(id),
            Err(_) => PlaceIdentifier::Foreign(raw.to_string()),
        }
    }
}

/// Resolves opaque identifiers to local catalog records.
pub struct PlaceResolver {
    store: Arc<dyn BaseCatalogStore>,
    places: Arc<dyn BasePlacesClient>,
    /// Seedable source for filler attributes, so tests can assert shape and
    /// the generator can later be replaced by real provider data without
    /// touching call sites.
    rng: Mutex<StdRng>,
}

impl PlaceResolver {
    pub fn new(store: Arc<dyn BaseCatalogStore>, places: Arc<dyn BasePlacesClient>) -> Self {
        Self {
            store,
            places,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn with_seed(
        store: Arc<dyn BaseCatalogStore>,
        places: Arc<dyn BasePlacesClient>,
        seed: u64,
    ) -> Self {
        Self {
            store,
            places,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Resolve an identifier to a local id. `None` means not found.
    ///
    /// A well-formed local id is returned unchanged without an existence
    /// check; a caller-supplied but nonexistent local id fails downstream
    /// instead of here.
    pub async fn resolve(&self, identifier: &str) -> Result<Option<ListingId>> {
        match PlaceIdentifier::classify(identifier) {
            PlaceIdentifier::Local(id) => Ok(Some(id)),
            PlaceIdentifier::Foreign(place_id) => Ok(self
                .resolve_foreign(&place_id)
                .await?
                .map(|listing| listing.id)),
        }
    }

    /// Resolve an identifier to the full record. Unlike [`resolve`], the
    /// local-id path reads the store, so a nonexistent local id is `None`.
    ///
    /// [`resolve`]: PlaceResolver::resolve
    pub async fn resolve_record(&self, identifier: &str) -> Result<Option<Listing>> {
        match PlaceIdentifier::classify(identifier) {
            PlaceIdentifier::Local(id) => Ok(self.store.find_by_id(id).await?),
            PlaceIdentifier::Foreign(place_id) => self.resolve_foreign(&place_id).await,
        }
    }

    /// Foreign-id path: existing mapping, else fetch from the provider and
    /// persist. Provider failures of any kind degrade to `None`; they never
    /// raise past this boundary.
    async fn resolve_foreign(&self, place_id: &str) -> Result<Option<Listing>> {
        if let Some(existing) = self.store.find_by_foreign_id(place_id).await? {
            return Ok(Some(existing));
        }

        let place = match self.places.place_details(place_id).await {
            Ok(place) => place,
            Err(err) => {
                warn!(place_id = %place_id, error = %err, "Provider lookup failed, treating as not found");
                return Ok(None);
            }
        };

        self.materialize(&place).await
    }

    /// Insert a catalog record synthesized from provider data. A duplicate
    /// rejection means another request materialized the same place
    /// concurrently; re-read once and return that record.
    pub async fn materialize(&self, place: &Place) -> Result<Option<Listing>> {
        let record = self.synthesize(place);
        match self.store.insert(record).await {
            Ok(listing) => {
                debug!(place_id = %place.place_id, listing_id = %listing.id, "Materialized provider place");
                Ok(Some(listing))
            }
            Err(StoreError::DuplicateForeignId { .. }) => {
                debug!(place_id = %place.place_id, "Lost materialize race, re-reading");
                Ok(self.store.find_by_foreign_id(&place.place_id).await?)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Place → catalog record transformation. Deterministic except for the
    /// filler attributes drawn from the injected generator.
    fn synthesize(&self, place: &Place) -> NewListing {
        let mut rng = self.rng.lock().expect("resolver rng mutex poisoned");

        let guests = rng.gen_range(2..=7);
        let capacity = Capacity {
            guests,
            bedrooms: guests / 2 + 1,
            beds: (guests as f64 / 1.5).ceil() as i32,
            baths: rng.gen_range(1..=2),
        };

        let price_per_night = match place.price_level {
            Some(level @ 0..=4) => {
                PRICE_TIER_BASE[level as usize] + rng.gen_range(0..=15) as f64
            }
            _ => rng.gen_range(18..=60) as f64,
        };

        let images = if place.photos.is_empty() {
            vec![PLACEHOLDER_IMAGE.to_string()]
        } else {
            place.photos.iter().take(MAX_PHOTOS).cloned().collect()
        };

        let host = HostProfile {
            name: HOST_NAME.to_string(),
            avatar: HOST_AVATAR.to_string(),
            is_superhost: rng.gen_bool(0.3),
        };

        NewListing {
            title: place.name.clone(),
            location: place.formatted_address.clone(),
            description: place
                .summary
                .clone()
                .unwrap_or_else(|| format!("A comfortable stay at {}.", place.name)),
            category: None,
            price_per_night,
            rating: place.rating.unwrap_or(DEFAULT_RATING),
            images,
            amenities: DEFAULT_AMENITIES.iter().map(|a| a.to_string()).collect(),
            host,
            capacity,
            latitude: place.latitude,
            longitude: place.longitude,
            is_external: true,
            google_place_id: Some(place.place_id.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::test_dependencies::{InMemoryCatalogStore, MockPlacesClient};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn resolver(
        store: Arc<InMemoryCatalogStore>,
        places: Arc<MockPlacesClient>,
    ) -> PlaceResolver {
        PlaceResolver::with_seed(store, places, 42)
    }

    #[test]
    fn test_classify_local_id() {
        let id = PlaceIdentifier::classify("507f1f77bcf86cd799439011");
        assert_eq!(
            id,
            PlaceIdentifier::Local(ListingId::parse("507f1f77bcf86cd799439011").unwrap())
        );
    }

    #[test]
    fn test_classify_foreign_id() {
        assert_eq!(
            PlaceIdentifier::classify("ChIJ_abc"),
            PlaceIdentifier::Foreign("ChIJ_abc".to_string())
        );
        // 24 chars but not hex
        assert_eq!(
            PlaceIdentifier::classify("ChIJ_abcdefghijklmnopqrs"),
            PlaceIdentifier::Foreign("ChIJ_abcdefghijklmnopqrs".to_string())
        );
    }

    #[tokio::test]
    async fn test_local_id_returned_unchanged_without_any_calls() {
        let store = Arc::new(InMemoryCatalogStore::new());
        let places = Arc::new(MockPlacesClient::new());
        let resolver = resolver(store.clone(), places.clone());

        let resolved = resolver.resolve("507f1f77bcf86cd799439011").await.unwrap();
        assert_eq!(resolved.unwrap().to_string(), "507f1f77bcf86cd799439011");
        assert!(places.details_calls().is_empty());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_mapped_foreign_id_skips_provider() {
        let store = Arc::new(InMemoryCatalogStore::new());
        let places = Arc::new(MockPlacesClient::new());

        let mut seed = PlaceResolver::with_seed(store.clone(), places.clone(), 1)
            .synthesize(&MockPlacesClient::place("ChIJ_abc", "Known Place"));
        seed.is_external = true;
        let existing = store.seed(seed).await;

        let resolver = resolver(store.clone(), places.clone());
        let resolved = resolver.resolve("ChIJ_abc").await.unwrap();

        assert_eq!(resolved, Some(existing.id));
        assert!(places.details_calls().is_empty());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_unmapped_foreign_id_creates_one_record() {
        let store = Arc::new(InMemoryCatalogStore::new());
        let mut place = MockPlacesClient::place("ChIJ_xyz", "Hotel X");
        place.formatted_address = "Main St".to_string();
        place.rating = Some(4.2);
        let places = Arc::new(MockPlacesClient::new().with_place(place));
        let resolver = resolver(store.clone(), places.clone());

        let resolved = resolver.resolve("ChIJ_xyz").await.unwrap().unwrap();

        assert_eq!(store.len(), 1);
        let record = store.records().remove(0);
        assert_eq!(record.id, resolved);
        assert!(record.is_external);
        assert_eq!(record.google_place_id.as_deref(), Some("ChIJ_xyz"));
        assert_eq!(record.title, "Hotel X");
        assert_eq!(record.location, "Main St");
        assert_eq!(record.rating, 4.2);
        assert_eq!(places.details_calls(), vec!["ChIJ_xyz".to_string()]);
    }

    #[tokio::test]
    async fn test_provider_failure_degrades_to_not_found() {
        let store = Arc::new(InMemoryCatalogStore::new());
        let places = Arc::new(MockPlacesClient::new().failing());
        let resolver = resolver(store.clone(), places);

        let resolved = resolver.resolve("ChIJ_bad").await.unwrap();
        assert_eq!(resolved, None);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_provider_not_found_status_creates_nothing() {
        let store = Arc::new(InMemoryCatalogStore::new());
        // No place registered: the mock reports NOT_FOUND.
        let places = Arc::new(MockPlacesClient::new());
        let resolver = resolver(store.clone(), places);

        let resolved = resolver.resolve("ChIJ_missing").await.unwrap();
        assert_eq!(resolved, None);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_sequential_resolution_is_idempotent() {
        let store = Arc::new(InMemoryCatalogStore::new());
        let places = Arc::new(
            MockPlacesClient::new().with_place(MockPlacesClient::place("ChIJ_once", "Once")),
        );
        let resolver = resolver(store.clone(), places.clone());

        let first = resolver.resolve("ChIJ_once").await.unwrap();
        let second = resolver.resolve("ChIJ_once").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(store.len(), 1);
        // Second call resolved from the store, not the provider.
        assert_eq!(places.details_calls().len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_resolution_yields_one_record() {
        let store = Arc::new(InMemoryCatalogStore::new());
        // The delay keeps both resolutions inside the provider call long
        // enough that each misses the other's insert.
        let places = Arc::new(
            MockPlacesClient::new()
                .with_place(MockPlacesClient::place("ChIJ_race", "Contended"))
                .with_delay(Duration::from_millis(20)),
        );
        let resolver = Arc::new(resolver(store.clone(), places.clone()));

        let (a, b) = tokio::join!(resolver.resolve("ChIJ_race"), resolver.resolve("ChIJ_race"));

        let a = a.unwrap().unwrap();
        let b = b.unwrap().unwrap();
        assert_eq!(a, b);
        assert_eq!(store.len(), 1);
        // Both callers missed the existence check and hit the provider.
        assert_eq!(places.details_calls().len(), 2);
    }

    /// Store that reports a duplicate on every insert while the foreign id
    /// only becomes visible on the second lookup, mimicking the exact
    /// interleaving where a concurrent request wins the insert.
    struct RacyStore {
        inner: InMemoryCatalogStore,
        lookups: AtomicUsize,
        winner: Listing,
    }

    #[async_trait]
    impl BaseCatalogStore for RacyStore {
        async fn insert(&self, record: NewListing) -> Result<Listing, StoreError> {
            Err(StoreError::DuplicateForeignId {
                place_id: record.google_place_id.unwrap_or_default(),
            })
        }

        async fn find_by_id(&self, id: ListingId) -> Result<Option<Listing>, StoreError> {
            self.inner.find_by_id(id).await
        }

        async fn find_by_foreign_id(
            &self,
            place_id: &str,
        ) -> Result<Option<Listing>, StoreError> {
            if self.lookups.fetch_add(1, Ordering::SeqCst) == 0 {
                Ok(None)
            } else {
                assert_eq!(self.winner.google_place_id.as_deref(), Some(place_id));
                Ok(Some(self.winner.clone()))
            }
        }

        async fn search(
            &self,
            filter: &crate::kernel::CatalogFilter,
        ) -> Result<Vec<Listing>, StoreError> {
            self.inner.search(filter).await
        }

        async fn known_foreign_ids(
            &self,
        ) -> Result<std::collections::HashSet<String>, StoreError> {
            self.inner.known_foreign_ids().await
        }
    }

    #[tokio::test]
    async fn test_duplicate_insert_retries_lookup_once() {
        let template = InMemoryCatalogStore::new();
        let winner = template
            .seed(
                PlaceResolver::with_seed(
                    Arc::new(InMemoryCatalogStore::new()),
                    Arc::new(MockPlacesClient::new()),
                    7,
                )
                .synthesize(&MockPlacesClient::place("ChIJ_won", "Winner")),
            )
            .await;

        let store = Arc::new(RacyStore {
            inner: InMemoryCatalogStore::new(),
            lookups: AtomicUsize::new(0),
            winner: winner.clone(),
        });
        let places = Arc::new(
            MockPlacesClient::new().with_place(MockPlacesClient::place("ChIJ_won", "Winner")),
        );
        let resolver = PlaceResolver::with_seed(store.clone(), places, 9);

        let resolved = resolver.resolve("ChIJ_won").await.unwrap();
        assert_eq!(resolved, Some(winner.id));
        // One miss, one post-duplicate re-read.
        assert_eq!(store.lookups.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_resolve_record_reads_local_ids() {
        let store = Arc::new(InMemoryCatalogStore::new());
        let places = Arc::new(MockPlacesClient::new());
        let seeded = store
            .seed(
                PlaceResolver::with_seed(store.clone(), places.clone(), 3)
                    .synthesize(&MockPlacesClient::place("ChIJ_seeded", "Seeded")),
            )
            .await;
        let resolver = resolver(store.clone(), places);

        let found = resolver
            .resolve_record(&seeded.id.to_string())
            .await
            .unwrap();
        assert_eq!(found.map(|l| l.id), Some(seeded.id));

        let missing = resolver
            .resolve_record("507f1f77bcf86cd799439011")
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_filler_shape_without_price_tier() {
        let store = Arc::new(InMemoryCatalogStore::new());
        let places = Arc::new(MockPlacesClient::new());
        let resolver = resolver(store, places);

        let record = resolver.synthesize(&MockPlacesClient::place("ChIJ_f", "Filler"));

        let c = &record.capacity;
        assert!((2..=7).contains(&c.guests));
        assert_eq!(c.bedrooms, c.guests / 2 + 1);
        assert_eq!(c.beds, (c.guests as f64 / 1.5).ceil() as i32);
        assert!((1..=2).contains(&c.baths));
        assert!((18.0..=60.0).contains(&record.price_per_night));
        assert_eq!(record.rating, DEFAULT_RATING);
        assert_eq!(record.images, vec![PLACEHOLDER_IMAGE.to_string()]);
        assert_eq!(record.amenities.len(), DEFAULT_AMENITIES.len());
        assert!(record.is_external);
    }

    #[tokio::test]
    async fn test_filler_price_follows_tier() {
        let store = Arc::new(InMemoryCatalogStore::new());
        let places = Arc::new(MockPlacesClient::new());
        let resolver = resolver(store, places);

        let mut place = MockPlacesClient::place("ChIJ_t", "Tiered");
        place.price_level = Some(3);
        let record = resolver.synthesize(&place);
        assert!((30.0..=45.0).contains(&record.price_per_night));

        place.price_level = Some(0);
        let record = resolver.synthesize(&place);
        assert!((0.0..=15.0).contains(&record.price_per_night));
    }

    #[tokio::test]
    async fn test_photos_capped_at_five() {
        let store = Arc::new(InMemoryCatalogStore::new());
        let places = Arc::new(MockPlacesClient::new());
        let resolver = resolver(store, places);

        let mut place = MockPlacesClient::place("ChIJ_p", "Photogenic");
        place.photos = (0..7).map(|i| format!("https://photos.test/{}", i)).collect();
        let record = resolver.synthesize(&place);
        assert_eq!(record.images.len(), 5);
        assert_eq!(record.images[0], "https://photos.test/0");
    }
}
