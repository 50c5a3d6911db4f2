use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::{BookingId, ListingId, UserId};

/// A stay booked against a catalog record. `listing_id` is always a local
/// id; identifier resolution happens before any booking is written.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Booking {
    pub id: BookingId,
    pub user_id: UserId,
    pub listing_id: ListingId,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: i32,
    pub total_price: f64,
    pub status: String, // 'pending', 'confirmed', 'cancelled'
    pub created_at: DateTime<Utc>,
}

/// Booking status enum
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BookingStatus::Pending => write!(f, "pending"),
            BookingStatus::Confirmed => write!(f, "confirmed"),
            BookingStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for BookingStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            _ => Err(anyhow::anyhow!("Invalid booking status: {}", s)),
        }
    }
}

impl Booking {
    pub async fn create(
        user_id: UserId,
        listing_id: ListingId,
        check_in: NaiveDate,
        check_out: NaiveDate,
        guests: i32,
        total_price: f64,
        pool: &PgPool,
    ) -> Result<Self> {
        let booking = sqlx::query_as::<_, Booking>(
            r#"
            INSERT INTO bookings (id, user_id, listing_id, check_in, check_out, guests, total_price, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(BookingId::new())
        .bind(user_id)
        .bind(listing_id)
        .bind(check_in)
        .bind(check_out)
        .bind(guests)
        .bind(total_price)
        .bind(BookingStatus::Confirmed.to_string())
        .fetch_one(pool)
        .await?;
        Ok(booking)
    }

    pub async fn find_by_id(id: BookingId, pool: &PgPool) -> Result<Option<Self>> {
        let booking = sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(booking)
    }

    /// A user's bookings, newest first.
    pub async fn find_by_user(user_id: UserId, pool: &PgPool) -> Result<Vec<Self>> {
        let bookings = sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;
        Ok(bookings)
    }

    pub async fn set_status(
        id: BookingId,
        status: BookingStatus,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        let booking = sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET status = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status.to_string())
        .fetch_optional(pool)
        .await?;
        Ok(booking)
    }
}

/// Semantic validation of a booking request. Runs before resolution and any
/// store access.
pub fn validate_stay(check_in: NaiveDate, check_out: NaiveDate, guests: i32) -> Result<i64, String> {
    if check_out <= check_in {
        return Err("check_out must be after check_in".to_string());
    }
    if guests < 1 {
        return Err("guests must be at least 1".to_string());
    }
    Ok((check_out - check_in).num_days())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_validate_stay_counts_nights() {
        assert_eq!(validate_stay(date("2026-09-01"), date("2026-09-04"), 2), Ok(3));
    }

    #[test]
    fn test_validate_stay_rejects_inverted_dates() {
        assert!(validate_stay(date("2026-09-04"), date("2026-09-01"), 2).is_err());
        assert!(validate_stay(date("2026-09-01"), date("2026-09-01"), 2).is_err());
    }

    #[test]
    fn test_validate_stay_rejects_zero_guests() {
        assert!(validate_stay(date("2026-09-01"), date("2026-09-04"), 0).is_err());
    }

    #[test]
    fn test_status_roundtrip() {
        for status in [
            BookingStatus::Pending,
            BookingStatus::Confirmed,
            BookingStatus::Cancelled,
        ] {
            let parsed: BookingStatus = status.to_string().parse().unwrap();
            assert_eq!(parsed, status);
        }
        assert!("unknown".parse::<BookingStatus>().is_err());
    }
}
