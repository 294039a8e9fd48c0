//! OpenRouteService HTTP adapter for route geometry.

use std::fmt;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{LookupError, read_body};
use crate::geo::LonLat;
use crate::traits::{RouteGeometry, RouteProvider};

#[derive(Clone)]
pub struct OrsConfig {
    pub base_url: String,
    pub api_key: String,
    pub profile: String,
    pub timeout_secs: u64,
}

impl OrsConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: "https://api.openrouteservice.org".to_string(),
            api_key: api_key.into(),
            profile: "driving-car".to_string(),
            timeout_secs: 15,
        }
    }
}

impl fmt::Debug for OrsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrsConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("profile", &self.profile)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct OrsClient {
    config: OrsConfig,
    client: reqwest::Client,
}

impl OrsClient {
    pub fn new(config: OrsConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    fn directions_url(&self) -> String {
        format!(
            "{}/v2/directions/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.profile
        )
    }
}

impl RouteProvider for OrsClient {
    async fn route(&self, from: LonLat, to: LonLat) -> Result<RouteGeometry, LookupError> {
        let response = self
            .client
            .get(self.directions_url())
            .query(&[
                ("api_key", self.config.api_key.clone()),
                ("start", format!("{},{}", from.lon, from.lat)),
                ("end", format!("{},{}", to.lon, to.lat)),
            ])
            .send()
            .await?;

        let body = read_body(response).await.map_err(describe_ors_error)?;
        parse_directions(&body)
    }
}

#[derive(Debug, Deserialize)]
struct OrsErrorPayload {
    error: OrsErrorDetail,
}

#[derive(Debug, Deserialize)]
struct OrsErrorDetail {
    code: u32,
    message: String,
}

/// Replaces the raw body of a failed call with ORS's structured message,
/// when it sent one.
fn describe_ors_error(err: LookupError) -> LookupError {
    match err {
        LookupError::Status { code, body } => {
            match serde_json::from_str::<OrsErrorPayload>(&body) {
                Ok(payload) => LookupError::Status {
                    code,
                    body: format!("ORS error {}: {}", payload.error.code, payload.error.message),
                },
                Err(_) => LookupError::Status { code, body },
            }
        }
        other => other,
    }
}

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    geometry: LineString,
    properties: Option<Properties>,
}

#[derive(Debug, Deserialize)]
struct LineString {
    coordinates: Vec<[f64; 2]>,
}

#[derive(Debug, Deserialize)]
struct Properties {
    summary: Option<Summary>,
}

#[derive(Debug, Deserialize)]
struct Summary {
    distance: Option<f64>,
    duration: Option<f64>,
}

fn parse_directions(body: &str) -> Result<RouteGeometry, LookupError> {
    let collection: FeatureCollection = serde_json::from_str(body)?;
    let feature = collection
        .features
        .into_iter()
        .next()
        .ok_or_else(|| LookupError::Malformed("ORS returned no features".to_string()))?;

    let summary = feature.properties.and_then(|properties| properties.summary);

    Ok(RouteGeometry {
        coordinates: feature.geometry.coordinates,
        distance_m: summary.as_ref().and_then(|summary| summary.distance),
        duration_s: summary.as_ref().and_then(|summary| summary.duration),
    })
}
