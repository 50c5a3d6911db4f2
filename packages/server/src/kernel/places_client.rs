use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::{BasePlacesClient, Place};

const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/place";

/// Google Places API client.
pub struct GooglePlacesClient {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

// =============================================================================
// Wire types
// =============================================================================

#[derive(Debug, Deserialize)]
struct TextSearchResponse {
    status: String,
    #[serde(default)]
    results: Vec<RawPlace>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DetailsResponse {
    status: String,
    result: Option<RawPlace>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawPlace {
    place_id: String,
    name: String,
    #[serde(default)]
    formatted_address: Option<String>,
    #[serde(default)]
    vicinity: Option<String>,
    #[serde(default)]
    rating: Option<f64>,
    #[serde(default)]
    price_level: Option<i32>,
    #[serde(default)]
    photos: Vec<RawPhoto>,
    #[serde(default)]
    geometry: Option<RawGeometry>,
    #[serde(default)]
    editorial_summary: Option<RawEditorialSummary>,
}

#[derive(Debug, Deserialize)]
struct RawPhoto {
    photo_reference: String,
}

#[derive(Debug, Deserialize)]
struct RawGeometry {
    location: RawLatLng,
}

#[derive(Debug, Deserialize)]
struct RawLatLng {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct RawEditorialSummary {
    #[serde(default)]
    overview: Option<String>,
}

impl GooglePlacesClient {
    pub fn new(api_key: String) -> Result<Self> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string())
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            api_key,
            base_url,
            client,
        })
    }

    fn photo_url(&self, reference: &str) -> String {
        format!(
            "{}/photo?maxwidth=800&photo_reference={}&key={}",
            self.base_url,
            urlencoding::encode(reference),
            self.api_key
        )
    }

    fn map_place(&self, raw: RawPlace) -> Place {
        let (latitude, longitude) = raw
            .geometry
            .map(|g| (Some(g.location.lat), Some(g.location.lng)))
            .unwrap_or((None, None));

        Place {
            photos: raw
                .photos
                .iter()
                .map(|p| self.photo_url(&p.photo_reference))
                .collect(),
            place_id: raw.place_id,
            name: raw.name,
            formatted_address: raw
                .formatted_address
                .or(raw.vicinity)
                .unwrap_or_default(),
            rating: raw.rating,
            price_level: raw.price_level,
            latitude,
            longitude,
            summary: raw.editorial_summary.and_then(|s| s.overview),
        }
    }
}

#[async_trait]
impl BasePlacesClient for GooglePlacesClient {
    async fn text_search(
        &self,
        query: &str,
        location: Option<(f64, f64)>,
        radius_m: Option<u32>,
    ) -> Result<Vec<Place>> {
        let mut url = format!(
            "{}/textsearch/json?query={}&key={}",
            self.base_url,
            urlencoding::encode(query),
            self.api_key
        );
        if let Some((lat, lng)) = location {
            url.push_str(&format!("&location={},{}", lat, lng));
        }
        if let Some(radius) = radius_m {
            url.push_str(&format!("&radius={}", radius));
        }

        debug!(query = %query, "Places text search");

        let response: TextSearchResponse = self
            .client
            .get(&url)
            .send()
            .await
            .context("Places text search request failed")?
            .json()
            .await
            .context("Failed to parse places text search response")?;

        match response.status.as_str() {
            "OK" | "ZERO_RESULTS" => Ok(response
                .results
                .into_iter()
                .map(|r| self.map_place(r))
                .collect()),
            status => anyhow::bail!(
                "Places text search returned {}: {}",
                status,
                response.error_message.unwrap_or_default()
            ),
        }
    }

    async fn place_details(&self, place_id: &str) -> Result<Place> {
        let url = format!(
            "{}/details/json?place_id={}&fields=place_id,name,formatted_address,rating,price_level,photos,geometry,editorial_summary&key={}",
            self.base_url,
            urlencoding::encode(place_id),
            self.api_key
        );

        debug!(place_id = %place_id, "Places details lookup");

        let response: DetailsResponse = self
            .client
            .get(&url)
            .send()
            .await
            .context("Places details request failed")?
            .json()
            .await
            .context("Failed to parse places details response")?;

        if response.status != "OK" {
            anyhow::bail!(
                "Places details returned {}: {}",
                response.status,
                response.error_message.unwrap_or_default()
            );
        }

        let raw = response
            .result
            .context("Places details response missing result")?;
        Ok(self.map_place(raw))
    }
}

/// No-op provider client for when no API key is configured. Searches return
/// nothing and details always fail, so foreign ids simply never resolve.
pub struct NoopPlacesClient;

#[async_trait]
impl BasePlacesClient for NoopPlacesClient {
    async fn text_search(
        &self,
        _query: &str,
        _location: Option<(f64, f64)>,
        _radius_m: Option<u32>,
    ) -> Result<Vec<Place>> {
        tracing::warn!("NoopPlacesClient: text_search called but no API key configured");
        Ok(vec![])
    }

    async fn place_details(&self, _place_id: &str) -> Result<Place> {
        anyhow::bail!("NoopPlacesClient: no API key configured")
    }
}
