//! Nominatim HTTP adapter for place search.

use std::time::Duration;

use serde::Deserialize;

use crate::error::{LookupError, read_body};
use crate::geo::{GeoPoint, Region};
use crate::traits::Geocoder;

#[derive(Debug, Clone)]
pub struct NominatimConfig {
    pub base_url: String,
    /// Nominatim's usage policy requires an identifying agent.
    pub user_agent: String,
    /// Comma-separated ISO 3166-1 alpha-2 codes.
    pub country_codes: String,
    pub limit: u32,
    pub timeout_secs: u64,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org".to_string(),
            user_agent: concat!("incident-router/", env!("CARGO_PKG_VERSION")).to_string(),
            country_codes: "in".to_string(),
            limit: 1,
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NominatimClient {
    config: NominatimConfig,
    client: reqwest::Client,
}

impl NominatimClient {
    pub fn new(config: NominatimConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self { config, client })
    }

    fn search_url(&self) -> String {
        format!("{}/search", self.config.base_url.trim_end_matches('/'))
    }
}

impl Geocoder for NominatimClient {
    async fn search(
        &self,
        query: &str,
        filter: Option<&Region>,
    ) -> Result<Vec<GeoPoint>, LookupError> {
        let params = search_params(&self.config, query, filter);
        let response = self
            .client
            .get(self.search_url())
            .query(&params)
            .send()
            .await?;

        let body = read_body(response).await?;
        parse_places(&body)
    }
}

fn search_params(
    config: &NominatimConfig,
    query: &str,
    filter: Option<&Region>,
) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("format", "json".to_string()),
        ("q", query.to_string()),
        ("limit", config.limit.to_string()),
    ];
    if !config.country_codes.is_empty() {
        params.push(("countrycodes", config.country_codes.clone()));
    }
    if let Some(region) = filter {
        params.push(("viewbox", region.viewbox()));
        params.push(("bounded", "1".to_string()));
    }
    params
}

#[derive(Debug, Deserialize)]
struct Place {
    lat: String,
    lon: String,
}

/// Nominatim returns coordinates as strings; entries that do not parse are
/// skipped rather than failing the whole lookup.
fn parse_places(body: &str) -> Result<Vec<GeoPoint>, LookupError> {
    let places: Vec<Place> = serde_json::from_str(body)?;

    Ok(places
        .iter()
        .filter_map(|place| {
            let lat = place.lat.trim().parse::<f64>().ok()?;
            let lon = place.lon.trim().parse::<f64>().ok()?;
            Some(GeoPoint::new(lat, lon))
        })
        .collect())
}
