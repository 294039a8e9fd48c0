//! OSRM HTTP adapter for route geometry.

use std::time::Duration;

use serde::Deserialize;

use crate::error::{LookupError, read_body};
use crate::geo::LonLat;
use crate::traits::{RouteGeometry, RouteProvider};

#[derive(Debug, Clone)]
pub struct OsrmConfig {
    pub base_url: String,
    pub profile: String,
    pub timeout_secs: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://router.project-osrm.org".to_string(),
            profile: "driving".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OsrmClient {
    config: OsrmConfig,
    client: reqwest::Client,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    fn route_url(&self, from: LonLat, to: LonLat) -> String {
        format!(
            "{}/route/v1/{}/{:.6},{:.6};{:.6},{:.6}?overview=full&geometries=geojson",
            self.config.base_url.trim_end_matches('/'),
            self.config.profile,
            from.lon,
            from.lat,
            to.lon,
            to.lat
        )
    }
}

impl RouteProvider for OsrmClient {
    async fn route(&self, from: LonLat, to: LonLat) -> Result<RouteGeometry, LookupError> {
        let response = self.client.get(self.route_url(from, to)).send().await?;
        let body = read_body(response).await?;
        parse_route(&body)
    }
}

#[derive(Debug, Deserialize)]
struct OsrmRouteResponse {
    code: String,
    message: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    geometry: OsrmGeometry,
    distance: Option<f64>,
    duration: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OsrmGeometry {
    coordinates: Vec<[f64; 2]>,
}

fn parse_route(body: &str) -> Result<RouteGeometry, LookupError> {
    let response: OsrmRouteResponse = serde_json::from_str(body)?;
    if response.code != "Ok" {
        return Err(LookupError::Malformed(format!(
            "OSRM code {}: {}",
            response.code,
            response.message.unwrap_or_default()
        )));
    }

    let route = response
        .routes
        .into_iter()
        .next()
        .ok_or_else(|| LookupError::Malformed("OSRM returned no routes".to_string()))?;

    Ok(RouteGeometry {
        coordinates: route.geometry.coordinates,
        distance_m: route.distance,
        duration_s: route.duration,
    })
}
