use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::{ListingId, UserId, WishlistItemId};
use crate::domains::catalog::models::Listing;

/// A listing saved to a user's wishlist. (user, listing) is unique; adds are
/// idempotent.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct WishlistItem {
    pub id: WishlistItemId,
    pub user_id: UserId,
    pub listing_id: ListingId,
    pub created_at: DateTime<Utc>,
}

impl WishlistItem {
    /// Add a listing to the wishlist. A repeat add is a no-op.
    pub async fn add(user_id: UserId, listing_id: ListingId, pool: &PgPool) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO wishlist_items (id, user_id, listing_id)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, listing_id) DO NOTHING
            "#,
        )
        .bind(WishlistItemId::new())
        .bind(user_id)
        .bind(listing_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Remove a listing from the wishlist. Returns whether a row was removed.
    pub async fn remove(user_id: UserId, listing_id: ListingId, pool: &PgPool) -> Result<bool> {
        let result =
            sqlx::query("DELETE FROM wishlist_items WHERE user_id = $1 AND listing_id = $2")
                .bind(user_id)
                .bind(listing_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn contains(user_id: UserId, listing_id: ListingId, pool: &PgPool) -> Result<bool> {
        let found: Option<i32> = sqlx::query_scalar(
            "SELECT 1 FROM wishlist_items WHERE user_id = $1 AND listing_id = $2",
        )
        .bind(user_id)
        .bind(listing_id)
        .fetch_optional(pool)
        .await?;
        Ok(found.is_some())
    }

    /// The listings on a user's wishlist, most recently saved first.
    pub async fn listings_for_user(user_id: UserId, pool: &PgPool) -> Result<Vec<Listing>> {
        let listings = sqlx::query_as::<_, Listing>(
            r#"
            SELECT l.* FROM listings l
            JOIN wishlist_items w ON w.listing_id = l.id
            WHERE w.user_id = $1
            ORDER BY w.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;
        Ok(listings)
    }
}
