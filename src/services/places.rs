use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::core::discovery::{Locatable, NearbySearch, PlacesProvider, RawPlace, SearchResponse};
use crate::models::Coordinate;

const NEARBY_SEARCH_PATH: &str = "/maps/api/place/nearbysearch/json";

/// Errors that can occur when talking to the Places API
#[derive(Debug, Error)]
pub enum PlacesError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Clone, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Clone, Deserialize)]
struct Geometry {
    location: LatLng,
}

/// Place as returned by the Nearby Search endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct GooglePlace {
    place_id: String,
    name: String,
    geometry: Geometry,
    #[serde(default)]
    pub vicinity: Option<String>,
}

impl GooglePlace {
    pub fn new(place_id: impl Into<String>, name: impl Into<String>, location: Coordinate) -> Self {
        Self {
            place_id: place_id.into(),
            name: name.into(),
            geometry: Geometry {
                location: LatLng {
                    lat: location.latitude,
                    lng: location.longitude,
                },
            },
            vicinity: None,
        }
    }
}

impl Locatable for GooglePlace {
    fn location(&self) -> Coordinate {
        Coordinate::new(self.geometry.location.lat, self.geometry.location.lng)
    }
}

impl RawPlace for GooglePlace {
    fn place_id(&self) -> &str {
        &self.place_id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Deserialize)]
struct NearbySearchBody {
    status: String,
    #[serde(default)]
    results: Vec<GooglePlace>,
    #[serde(default)]
    error_message: Option<String>,
}

/// Google Places Nearby Search client
pub struct GooglePlacesClient {
    base_url: String,
    api_key: String,
    client: Client,
}

impl GooglePlacesClient {
    pub fn new(base_url: String, api_key: String, timeout: Duration) -> Result<Self, PlacesError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url,
            api_key,
            client,
        })
    }

    /// Whether the client has what it needs to issue queries
    pub fn is_ready(&self) -> bool {
        !self.api_key.is_empty()
    }

    fn nearby_search_url(&self, request: &NearbySearch) -> String {
        // The endpoint takes a single type
        let place_type = request
            .categories
            .iter()
            .next()
            .map(String::as_str)
            .unwrap_or_default();

        if request.categories.len() > 1 {
            tracing::debug!(
                "Nearby search supports one type, using {:?} of {:?}",
                place_type,
                request.categories
            );
        }

        format!(
            "{}{}?location={},{}&radius={}&type={}&key={}",
            self.base_url.trim_end_matches('/'),
            NEARBY_SEARCH_PATH,
            request.anchor.latitude,
            request.anchor.longitude,
            request.radius_m,
            urlencoding::encode(place_type),
            urlencoding::encode(&self.api_key)
        )
    }
}

#[async_trait]
impl PlacesProvider for GooglePlacesClient {
    type Place = GooglePlace;
    type Error = PlacesError;

    async fn nearby_search(
        &self,
        request: &NearbySearch,
    ) -> Result<SearchResponse<GooglePlace>, PlacesError> {
        let url = self.nearby_search_url(request);

        tracing::debug!(
            "Nearby search around ({}, {}) within {}m",
            request.anchor.latitude,
            request.anchor.longitude,
            request.radius_m
        );

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(PlacesError::ApiError(format!(
                "Nearby search failed: {}",
                response.status()
            )));
        }

        let body: NearbySearchBody = response
            .json()
            .await
            .map_err(|e| PlacesError::InvalidResponse(e.to_string()))?;

        if body.status != "OK" {
            if let Some(message) = &body.error_message {
                tracing::warn!("Nearby search status {}: {}", body.status, message);
            }
            return Ok(SearchResponse::not_ok(body.status));
        }

        tracing::debug!("Nearby search returned {} places", body.results.len());

        Ok(SearchResponse::ok(body.results))
    }
}
