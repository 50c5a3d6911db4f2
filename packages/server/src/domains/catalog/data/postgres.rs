//! Postgres-backed catalog store.
//!
//! The sparse unique index `listings_google_place_id_key` is the only
//! coordination mechanism for concurrent fetch-or-create: a second insert of
//! the same provider id surfaces as [`StoreError::DuplicateForeignId`] and
//! the resolver retries the lookup instead of failing.

use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashSet;

use crate::common::ListingId;
use crate::domains::catalog::models::{Listing, NewListing};
use crate::kernel::{BaseCatalogStore, CatalogFilter, StoreError};

pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_insert_err(err: sqlx::Error, place_id: Option<&str>) -> StoreError {
    if let (Some(pid), Some(db)) = (place_id, err.as_database_error()) {
        if db.is_unique_violation() && db.constraint() == Some("listings_google_place_id_key") {
            return StoreError::DuplicateForeignId {
                place_id: pid.to_string(),
            };
        }
    }
    StoreError::Database(err)
}

#[async_trait]
impl BaseCatalogStore for PgCatalogStore {
    async fn insert(&self, record: NewListing) -> Result<Listing, StoreError> {
        let listing = record.into_listing();

        sqlx::query(
            r#"
            INSERT INTO listings (
                id, title, location, description, category, price_per_night,
                rating, images, amenities, host, capacity, latitude, longitude,
                is_external, google_place_id, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            "#,
        )
        .bind(listing.id)
        .bind(&listing.title)
        .bind(&listing.location)
        .bind(&listing.description)
        .bind(&listing.category)
        .bind(listing.price_per_night)
        .bind(listing.rating)
        .bind(&listing.images)
        .bind(&listing.amenities)
        .bind(&listing.host)
        .bind(&listing.capacity)
        .bind(listing.latitude)
        .bind(listing.longitude)
        .bind(listing.is_external)
        .bind(&listing.google_place_id)
        .bind(listing.created_at)
        .bind(listing.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_insert_err(e, listing.google_place_id.as_deref()))?;

        Ok(listing)
    }

    async fn find_by_id(&self, id: ListingId) -> Result<Option<Listing>, StoreError> {
        let listing = sqlx::query_as::<_, Listing>("SELECT * FROM listings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(listing)
    }

    async fn find_by_foreign_id(&self, place_id: &str) -> Result<Option<Listing>, StoreError> {
        let listing =
            sqlx::query_as::<_, Listing>("SELECT * FROM listings WHERE google_place_id = $1")
                .bind(place_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(listing)
    }

    async fn search(&self, filter: &CatalogFilter) -> Result<Vec<Listing>, StoreError> {
        let pattern = filter.query.as_ref().map(|q| format!("%{}%", q));
        let (sw_lat, sw_lng, ne_lat, ne_lng) = match filter.bounds {
            Some(b) => (Some(b.sw_lat), Some(b.sw_lng), Some(b.ne_lat), Some(b.ne_lng)),
            None => (None, None, None, None),
        };

        let listings = sqlx::query_as::<_, Listing>(
            r#"
            SELECT * FROM listings
            WHERE ($1::text IS NULL OR title ILIKE $1 OR location ILIKE $1)
              AND ($2::text IS NULL OR category = $2)
              AND ($3::float8 IS NULL OR price_per_night >= $3)
              AND ($4::float8 IS NULL OR price_per_night <= $4)
              AND ($5::int4 IS NULL OR (capacity->>'guests')::int >= $5)
              AND (cardinality($6::text[]) = 0 OR amenities @> $6)
              AND ($7::float8 IS NULL OR (
                    latitude IS NOT NULL AND longitude IS NOT NULL
                    AND latitude BETWEEN $7 AND $9
                    AND longitude BETWEEN $8 AND $10))
            ORDER BY created_at DESC
            LIMIT $11
            "#,
        )
        .bind(&pattern)
        .bind(&filter.category)
        .bind(filter.min_price)
        .bind(filter.max_price)
        .bind(filter.guests)
        .bind(&filter.amenities)
        .bind(sw_lat)
        .bind(sw_lng)
        .bind(ne_lat)
        .bind(ne_lng)
        .bind(filter.limit as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(listings)
    }

    async fn known_foreign_ids(&self) -> Result<HashSet<String>, StoreError> {
        let ids: Vec<String> = sqlx::query_scalar(
            "SELECT google_place_id FROM listings WHERE google_place_id IS NOT NULL",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(ids.into_iter().collect())
    }
}
