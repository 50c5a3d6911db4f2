use axum::{
    extract::{Extension, Path},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::common::{ApiError, BookingId};
use crate::domains::bookings::models::{validate_stay, Booking, BookingStatus};
use crate::server::app::AppState;
use crate::server::middleware::AuthUser;

#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    /// Local listing id or provider place id.
    pub listing_id: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: i32,
}

/// Create a booking. The listing identifier is resolved before anything is
/// written; a provider id gets its listing fetched and persisted here if this
/// is its first appearance.
pub async fn create_booking_handler(
    Extension(state): Extension<AppState>,
    auth_user: Option<Extension<AuthUser>>,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<Json<Booking>, ApiError> {
    let Extension(auth_user) = auth_user.ok_or(ApiError::Unauthorized)?;

    let nights = validate_stay(payload.check_in, payload.check_out, payload.guests)
        .map_err(ApiError::BadRequest)?;

    let listing_id = state
        .deps
        .resolver
        .resolve(&payload.listing_id)
        .await?
        .ok_or(ApiError::NotFound("listing"))?;

    // Price comes from the stored record, never the request.
    let listing = state
        .deps
        .catalog
        .find_by_id(listing_id)
        .await?
        .ok_or(ApiError::NotFound("listing"))?;

    let total_price = nights as f64 * listing.price_per_night;

    let booking = Booking::create(
        auth_user.user_id,
        listing_id,
        payload.check_in,
        payload.check_out,
        payload.guests,
        total_price,
        &state.db_pool,
    )
    .await?;

    Ok(Json(booking))
}

pub async fn list_bookings_handler(
    Extension(state): Extension<AppState>,
    auth_user: Option<Extension<AuthUser>>,
) -> Result<Json<Vec<Booking>>, ApiError> {
    let Extension(auth_user) = auth_user.ok_or(ApiError::Unauthorized)?;
    let bookings = Booking::find_by_user(auth_user.user_id, &state.db_pool).await?;
    Ok(Json(bookings))
}

pub async fn cancel_booking_handler(
    Extension(state): Extension<AppState>,
    auth_user: Option<Extension<AuthUser>>,
    Path(id): Path<String>,
) -> Result<Json<Booking>, ApiError> {
    let Extension(auth_user) = auth_user.ok_or(ApiError::Unauthorized)?;

    let booking_id: BookingId = id
        .parse()
        .map_err(|_| ApiError::NotFound("booking"))?;
    let booking = Booking::find_by_id(booking_id, &state.db_pool)
        .await?
        .ok_or(ApiError::NotFound("booking"))?;

    if booking.user_id != auth_user.user_id && !auth_user.is_admin {
        return Err(ApiError::Forbidden);
    }

    let cancelled = Booking::set_status(booking_id, BookingStatus::Cancelled, &state.db_pool)
        .await?
        .ok_or(ApiError::NotFound("booking"))?;

    Ok(Json(cancelled))
}
