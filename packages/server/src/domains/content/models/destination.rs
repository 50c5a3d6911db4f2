use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::DestinationId;

/// A featured destination.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Destination {
    pub id: DestinationId,
    pub name: String,
    pub country: String,
    pub description: String,
    pub image: String,
    pub rating: f64,
    pub created_at: DateTime<Utc>,
}

impl Destination {
    pub async fn list(limit: i64, pool: &PgPool) -> Result<Vec<Self>> {
        let rows = sqlx::query_as::<_, Destination>(
            "SELECT * FROM destinations ORDER BY rating DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }

    pub async fn find_by_id(id: DestinationId, pool: &PgPool) -> Result<Option<Self>> {
        let row = sqlx::query_as::<_, Destination>("SELECT * FROM destinations WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row)
    }
}
