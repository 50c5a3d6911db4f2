use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::PackageId;

/// A multi-destination travel package.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TravelPackage {
    pub id: PackageId,
    pub title: String,
    pub description: String,
    pub image: String,
    pub price: f64,
    pub duration_days: i32,
    pub destinations: Vec<String>,
    pub rating: f64,
    pub created_at: DateTime<Utc>,
}

impl TravelPackage {
    pub async fn list(limit: i64, pool: &PgPool) -> Result<Vec<Self>> {
        let rows = sqlx::query_as::<_, TravelPackage>(
            "SELECT * FROM packages ORDER BY rating DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }

    pub async fn find_by_id(id: PackageId, pool: &PgPool) -> Result<Option<Self>> {
        let row = sqlx::query_as::<_, TravelPackage>("SELECT * FROM packages WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row)
    }
}
