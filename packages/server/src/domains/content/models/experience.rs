use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::ExperienceId;

/// A bookable experience (tour, activity).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Experience {
    pub id: ExperienceId,
    pub title: String,
    pub location: String,
    pub description: String,
    pub image: String,
    pub price: f64,
    pub duration: String,
    pub category: Option<String>,
    pub rating: f64,
    pub created_at: DateTime<Utc>,
}

impl Experience {
    pub async fn list(category: Option<&str>, limit: i64, pool: &PgPool) -> Result<Vec<Self>> {
        let rows = sqlx::query_as::<_, Experience>(
            r#"
            SELECT * FROM experiences
            WHERE ($1::text IS NULL OR category = $1)
            ORDER BY rating DESC
            LIMIT $2
            "#,
        )
        .bind(category)
        .bind(limit)
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }

    pub async fn find_by_id(id: ExperienceId, pool: &PgPool) -> Result<Option<Self>> {
        let row = sqlx::query_as::<_, Experience>("SELECT * FROM experiences WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row)
    }
}
