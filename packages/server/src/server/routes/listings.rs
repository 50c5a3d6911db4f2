use axum::{
    extract::{Extension, Path, Query},
    Json,
};
use serde::Deserialize;

use crate::common::ApiError;
use crate::domains::catalog::models::Listing;
use crate::domains::catalog::search::search_listings;
use crate::kernel::{CatalogFilter, GeoBounds};
use crate::server::app::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub guests: Option<i32>,
    /// Comma-separated amenity names.
    pub amenities: Option<String>,
    pub sw_lat: Option<f64>,
    pub sw_lng: Option<f64>,
    pub ne_lat: Option<f64>,
    pub ne_lng: Option<f64>,
    pub limit: Option<usize>,
}

impl SearchParams {
    fn into_filter(self) -> Result<CatalogFilter, ApiError> {
        let bounds = match (self.sw_lat, self.sw_lng, self.ne_lat, self.ne_lng) {
            (Some(sw_lat), Some(sw_lng), Some(ne_lat), Some(ne_lng)) => Some(GeoBounds {
                sw_lat,
                sw_lng,
                ne_lat,
                ne_lng,
            }),
            (None, None, None, None) => None,
            _ => {
                return Err(ApiError::BadRequest(
                    "bounds require all of sw_lat, sw_lng, ne_lat, ne_lng".to_string(),
                ))
            }
        };

        let amenities = self
            .amenities
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        let defaults = CatalogFilter::default();
        Ok(CatalogFilter {
            query: self.q.filter(|q| !q.trim().is_empty()),
            category: self.category.filter(|c| !c.trim().is_empty()),
            min_price: self.min_price,
            max_price: self.max_price,
            guests: self.guests,
            amenities,
            bounds,
            limit: self.limit.unwrap_or(defaults.limit).clamp(1, 100),
        })
    }
}

pub async fn search_listings_handler(
    Extension(state): Extension<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Listing>>, ApiError> {
    let filter = params.into_filter()?;
    let listings = search_listings(
        state.deps.catalog.as_ref(),
        state.deps.places.as_ref(),
        &state.deps.resolver,
        &filter,
    )
    .await?;
    Ok(Json(listings))
}

/// Listing detail. The path id may be a local id or a provider place id;
/// an unseen provider id is fetched and persisted before being served.
pub async fn get_listing_handler(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Listing>, ApiError> {
    let listing = state
        .deps
        .resolver
        .resolve_record(&id)
        .await?
        .ok_or(ApiError::NotFound("listing"))?;
    Ok(Json(listing))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> SearchParams {
        SearchParams {
            q: None,
            category: None,
            min_price: None,
            max_price: None,
            guests: None,
            amenities: None,
            sw_lat: None,
            sw_lng: None,
            ne_lat: None,
            ne_lng: None,
            limit: None,
        }
    }

    #[test]
    fn test_amenities_split_and_trimmed() {
        let filter = SearchParams {
            amenities: Some("wifi, pool ,,".to_string()),
            ..params()
        }
        .into_filter()
        .unwrap();
        assert_eq!(filter.amenities, vec!["wifi", "pool"]);
    }

    #[test]
    fn test_partial_bounds_rejected() {
        let result = SearchParams {
            sw_lat: Some(44.9),
            ..params()
        }
        .into_filter();
        assert!(matches!(result, Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn test_full_bounds_accepted() {
        let filter = SearchParams {
            sw_lat: Some(44.9),
            sw_lng: Some(-93.3),
            ne_lat: Some(45.0),
            ne_lng: Some(-93.2),
            ..params()
        }
        .into_filter()
        .unwrap();
        assert!(filter.bounds.is_some());
    }

    #[test]
    fn test_blank_query_dropped_and_limit_clamped() {
        let filter = SearchParams {
            q: Some("   ".to_string()),
            limit: Some(5000),
            ..params()
        }
        .into_filter()
        .unwrap();
        assert!(filter.query.is_none());
        assert_eq!(filter.limit, 100);
    }
}
