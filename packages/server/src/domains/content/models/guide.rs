use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::GuideId;

/// A local guide profile.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Guide {
    pub id: GuideId,
    pub name: String,
    pub location: String,
    pub bio: String,
    pub avatar: String,
    pub languages: Vec<String>,
    pub rating: f64,
    pub created_at: DateTime<Utc>,
}

impl Guide {
    pub async fn list(limit: i64, pool: &PgPool) -> Result<Vec<Self>> {
        let rows =
            sqlx::query_as::<_, Guide>("SELECT * FROM guides ORDER BY rating DESC LIMIT $1")
                .bind(limit)
                .fetch_all(pool)
                .await?;
        Ok(rows)
    }

    pub async fn find_by_id(id: GuideId, pool: &PgPool) -> Result<Option<Self>> {
        let row = sqlx::query_as::<_, Guide>("SELECT * FROM guides WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row)
    }
}
