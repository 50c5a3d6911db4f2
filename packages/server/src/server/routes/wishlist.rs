use axum::{
    extract::{Extension, Path},
    Json,
};
use serde::Serialize;

use crate::common::ApiError;
use crate::domains::catalog::models::Listing;
use crate::domains::wishlists::models::WishlistItem;
use crate::server::app::AppState;
use crate::server::middleware::AuthUser;

#[derive(Serialize)]
pub struct SavedResponse {
    pub saved: bool,
}

/// Save a listing. Accepts local ids and provider place ids; a first-seen
/// provider id is materialized before the wishlist row is written.
pub async fn add_wishlist_handler(
    Extension(state): Extension<AppState>,
    auth_user: Option<Extension<AuthUser>>,
    Path(id): Path<String>,
) -> Result<Json<SavedResponse>, ApiError> {
    let Extension(auth_user) = auth_user.ok_or(ApiError::Unauthorized)?;
    let listing_id = state
        .deps
        .resolver
        .resolve(&id)
        .await?
        .ok_or(ApiError::NotFound("listing"))?;

    WishlistItem::add(auth_user.user_id, listing_id, &state.db_pool).await?;
    Ok(Json(SavedResponse { saved: true }))
}

pub async fn remove_wishlist_handler(
    Extension(state): Extension<AppState>,
    auth_user: Option<Extension<AuthUser>>,
    Path(id): Path<String>,
) -> Result<Json<SavedResponse>, ApiError> {
    let Extension(auth_user) = auth_user.ok_or(ApiError::Unauthorized)?;
    let listing_id = state
        .deps
        .resolver
        .resolve(&id)
        .await?
        .ok_or(ApiError::NotFound("listing"))?;

    WishlistItem::remove(auth_user.user_id, listing_id, &state.db_pool).await?;
    Ok(Json(SavedResponse { saved: false }))
}

pub async fn wishlist_status_handler(
    Extension(state): Extension<AppState>,
    auth_user: Option<Extension<AuthUser>>,
    Path(id): Path<String>,
) -> Result<Json<SavedResponse>, ApiError> {
    let Extension(auth_user) = auth_user.ok_or(ApiError::Unauthorized)?;
    let listing_id = state
        .deps
        .resolver
        .resolve(&id)
        .await?
        .ok_or(ApiError::NotFound("listing"))?;

    let saved = WishlistItem::contains(auth_user.user_id, listing_id, &state.db_pool).await?;
    Ok(Json(SavedResponse { saved }))
}

pub async fn list_wishlist_handler(
    Extension(state): Extension<AppState>,
    auth_user: Option<Extension<AuthUser>>,
) -> Result<Json<Vec<Listing>>, ApiError> {
    let Extension(auth_user) = auth_user.ok_or(ApiError::Unauthorized)?;
    let listings = WishlistItem::listings_for_user(auth_user.user_id, &state.db_pool).await?;
    Ok(Json(listings))
}
