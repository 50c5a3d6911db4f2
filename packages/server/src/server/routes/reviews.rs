use axum::{
    extract::{Extension, Path},
    Json,
};
use serde::Deserialize;

use crate::common::{ApiError, ListingId};
use crate::domains::reviews::models::Review;
use crate::server::app::AppState;
use crate::server::middleware::AuthUser;

#[derive(Debug, Deserialize)]
pub struct CreateReviewRequest {
    pub rating: i32,
    pub comment: String,
}

pub async fn create_review_handler(
    Extension(state): Extension<AppState>,
    auth_user: Option<Extension<AuthUser>>,
    Path(id): Path<String>,
    Json(payload): Json<CreateReviewRequest>,
) -> Result<Json<Review>, ApiError> {
    let Extension(auth_user) = auth_user.ok_or(ApiError::Unauthorized)?;

    if !(1..=5).contains(&payload.rating) {
        return Err(ApiError::BadRequest(
            "rating must be between 1 and 5".to_string(),
        ));
    }
    let comment = payload.comment.trim();
    if comment.is_empty() {
        return Err(ApiError::BadRequest("comment is required".to_string()));
    }

    // Reviews target already-materialized records only.
    let listing_id: ListingId = id.parse().map_err(|_| ApiError::NotFound("listing"))?;
    if state.deps.catalog.find_by_id(listing_id).await?.is_none() {
        return Err(ApiError::NotFound("listing"));
    }

    if Review::exists(listing_id, auth_user.user_id, &state.db_pool).await? {
        return Err(ApiError::Conflict(
            "you have already reviewed this listing".to_string(),
        ));
    }

    let review = Review::create(
        listing_id,
        auth_user.user_id,
        payload.rating,
        comment,
        &state.db_pool,
    )
    .await?;

    Ok(Json(review))
}

pub async fn list_reviews_handler(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Review>>, ApiError> {
    let listing_id: ListingId = id.parse().map_err(|_| ApiError::NotFound("listing"))?;
    let reviews = Review::find_by_listing(listing_id, &state.db_pool).await?;
    Ok(Json(reviews))
}
