//! Read-only editorial content: destinations, guides, experiences, packages.

use axum::{
    extract::{Extension, Path, Query},
    Json,
};
use serde::Deserialize;

use crate::common::{ApiError, DestinationId, ExperienceId, GuideId, PackageId};
use crate::domains::content::{Destination, Experience, Guide, TravelPackage};
use crate::server::app::AppState;

const DEFAULT_LIMIT: i64 = 20;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub limit: Option<i64>,
    pub category: Option<String>,
}

fn limit(params: &ListParams) -> i64 {
    params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, 100)
}

pub async fn list_destinations_handler(
    Extension(state): Extension<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Destination>>, ApiError> {
    Ok(Json(Destination::list(limit(&params), &state.db_pool).await?))
}

pub async fn get_destination_handler(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Destination>, ApiError> {
    let id: DestinationId = id.parse().map_err(|_| ApiError::NotFound("destination"))?;
    let destination = Destination::find_by_id(id, &state.db_pool)
        .await?
        .ok_or(ApiError::NotFound("destination"))?;
    Ok(Json(destination))
}

pub async fn list_guides_handler(
    Extension(state): Extension<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Guide>>, ApiError> {
    Ok(Json(Guide::list(limit(&params), &state.db_pool).await?))
}

pub async fn get_guide_handler(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Guide>, ApiError> {
    let id: GuideId = id.parse().map_err(|_| ApiError::NotFound("guide"))?;
    let guide = Guide::find_by_id(id, &state.db_pool)
        .await?
        .ok_or(ApiError::NotFound("guide"))?;
    Ok(Json(guide))
}

pub async fn list_experiences_handler(
    Extension(state): Extension<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Experience>>, ApiError> {
    let experiences =
        Experience::list(params.category.as_deref(), limit(&params), &state.db_pool).await?;
    Ok(Json(experiences))
}

pub async fn get_experience_handler(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Experience>, ApiError> {
    let id: ExperienceId = id.parse().map_err(|_| ApiError::NotFound("experience"))?;
    let experience = Experience::find_by_id(id, &state.db_pool)
        .await?
        .ok_or(ApiError::NotFound("experience"))?;
    Ok(Json(experience))
}

pub async fn list_packages_handler(
    Extension(state): Extension<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<TravelPackage>>, ApiError> {
    Ok(Json(TravelPackage::list(limit(&params), &state.db_pool).await?))
}

pub async fn get_package_handler(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TravelPackage>, ApiError> {
    let id: PackageId = id.parse().map_err(|_| ApiError::NotFound("package"))?;
    let package = TravelPackage::find_by_id(id, &state.db_pool)
        .await?
        .ok_or(ApiError::NotFound("package"))?;
    Ok(Json(package))
}
