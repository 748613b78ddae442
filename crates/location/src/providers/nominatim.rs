//! HTTP geocoder for Nominatim-compatible search APIs
//!
//! Issues `GET {base_url}/search?q=<address>&format=jsonv2&limit=<n>` and reads
//! the `lat`/`lon` fields of each result. Nominatim returns them as strings;
//! plain numbers are accepted too.

use crate::capability::Geocoder;
use crate::config::GeocoderConfig;
use crate::error::{LocationError, ProviderError, Result};
use crate::retry::{retry_async, RetryConfig};
use async_trait::async_trait;
use dealzsta_geo::Coordinate;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client, Response};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

/// One search hit. Other fields of the payload are ignored.
#[derive(Debug, Deserialize)]
struct Place {
    lat: NumberOrString,
    lon: NumberOrString,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    Text(String),
}

impl NumberOrString {
    fn parse(&self, field: &str) -> std::result::Result<f64, ProviderError> {
        match self {
            Self::Number(n) => Ok(*n),
            Self::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| ProviderError::Parse(format!("{field} '{s}' is not a number"))),
        }
    }
}

/// [`Geocoder`] talking to a Nominatim-compatible HTTP endpoint.
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    inner: Client,
    search_url: String,
    max_results: u32,
    retry: RetryConfig,
}

impl NominatimGeocoder {
    /// Create a geocoder from configuration
    pub fn new(config: &GeocoderConfig) -> Result<Self> {
        config.validate()?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let agent = HeaderValue::from_str(&config.user_agent)
            .map_err(|_| LocationError::config("user_agent is not a valid header value"))?;
        default_headers.insert(USER_AGENT, agent);

        let inner = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(default_headers)
            .build()
            .map_err(|e| LocationError::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            inner,
            search_url: format!("{}/search", config.base_url.trim_end_matches('/')),
            max_results: config.max_results,
            retry: config.retry.clone(),
        })
    }

    /// The search endpoint this geocoder calls
    pub fn search_url(&self) -> &str {
        &self.search_url
    }

    async fn search_once(&self, address: &str) -> std::result::Result<Vec<Coordinate>, ProviderError> {
        let limit = self.max_results.to_string();
        let response = self
            .inner
            .get(&self.search_url)
            .query(&[("q", address), ("format", "jsonv2"), ("limit", limit.as_str())])
            .send()
            .await?;

        let places: Vec<Place> = handle_response(response).await?;
        let mut coordinates = Vec::with_capacity(places.len());

        for place in places {
            let coord = Coordinate::new(place.lat.parse("lat")?, place.lon.parse("lon")?);
            if coord.is_valid() {
                coordinates.push(coord);
            } else {
                debug!(%coord, "Dropping out-of-range geocode result");
            }
        }

        Ok(coordinates)
    }
}

async fn handle_response(response: Response) -> std::result::Result<Vec<Place>, ProviderError> {
    let status = response.status();

    if status.is_success() {
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    } else {
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        Err(ProviderError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    #[instrument(skip(self))]
    async fn geocode(&self, address: &str) -> std::result::Result<Vec<Coordinate>, ProviderError> {
        if address.trim().is_empty() {
            return Ok(Vec::new());
        }

        let coordinates = retry_async(&self.retry, "geocode", || self.search_once(address)).await?;
        debug!(results = coordinates.len(), "Geocode lookup finished");
        Ok(coordinates)
    }
}
