use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::{ListingId, ReviewId, UserId};

/// A review left by a user on a listing. One per (listing, user).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Review {
    pub id: ReviewId,
    pub listing_id: ListingId,
    pub user_id: UserId,
    pub rating: i32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

impl Review {
    pub async fn create(
        listing_id: ListingId,
        user_id: UserId,
        rating: i32,
        comment: &str,
        pool: &PgPool,
    ) -> Result<Self> {
        let review = sqlx::query_as::<_, Review>(
            r#"
            INSERT INTO reviews (id, listing_id, user_id, rating, comment)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(ReviewId::new())
        .bind(listing_id)
        .bind(user_id)
        .bind(rating)
        .bind(comment)
        .fetch_one(pool)
        .await?;
        Ok(review)
    }

    /// Reviews for a listing, newest first.
    pub async fn find_by_listing(listing_id: ListingId, pool: &PgPool) -> Result<Vec<Self>> {
        let reviews = sqlx::query_as::<_, Review>(
            "SELECT * FROM reviews WHERE listing_id = $1 ORDER BY created_at DESC",
        )
        .bind(listing_id)
        .fetch_all(pool)
        .await?;
        Ok(reviews)
    }

    pub async fn exists(listing_id: ListingId, user_id: UserId, pool: &PgPool) -> Result<bool> {
        let found: Option<i32> = sqlx::query_scalar(
            "SELECT 1 FROM reviews WHERE listing_id = $1 AND user_id = $2",
        )
        .bind(listing_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
        Ok(found.is_some())
    }
}
