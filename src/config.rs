//! Pipeline configuration.
//!
//! Everything the pipeline needs is carried in [`PipelineConfig`] and the
//! adapter configs collected by [`ServiceEndpoints`]. The environment is read
//! once, in [`ServiceEndpoints::from_env`], and nowhere else.

use std::env;

use serde::{Deserialize, Serialize};

use crate::error::LookupError;
use crate::geo::{LonLat, Region};
use crate::geocache::CachedGeocoder;
use crate::haversine::TrafficLevel;
use crate::nominatim::{NominatimClient, NominatimConfig};
use crate::ors::{OrsClient, OrsConfig};
use crate::osrm::{OsrmClient, OsrmConfig};
use crate::traits::{RouteGeometry, RouteProvider};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub region: Region,
    /// Maximum number of facilities that receive a computed route.
    pub route_limit: usize,
    pub traffic: TrafficLevel,
    /// Seed for fallback jitter. `None` draws a fresh seed per generation.
    pub jitter_seed: Option<u64>,
    /// Hold explicit incident coordinates to the region box as well.
    ///
    /// Off by default: caller-supplied incident points are trusted as-is,
    /// while facility points are always validated.
    pub validate_incident_point: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            region: Region::mumbai(),
            route_limit: 3,
            traffic: TrafficLevel::Normal,
            jitter_seed: None,
            validate_incident_point: false,
        }
    }
}

/// Which routing service to call.
#[derive(Debug, Clone)]
pub enum RoutingBackend {
    Osrm(OsrmConfig),
    Ors(OrsConfig),
}

#[derive(Debug, Clone)]
pub struct ServiceEndpoints {
    pub geocoding: NominatimConfig,
    pub routing: RoutingBackend,
}

impl ServiceEndpoints {
    /// Reads `NOMINATIM_URL`, `NOMINATIM_UA`, `OSRM_URL`, `OSRM_PROFILE`,
    /// `ORS_URL` and `ORS_API_KEY`.
    ///
    /// OpenRouteService is used when an API key is present, OSRM otherwise.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut geocoding = NominatimConfig::default();
        if let Some(url) = lookup("NOMINATIM_URL") {
            geocoding.base_url = url;
        }
        if let Some(agent) = lookup("NOMINATIM_UA") {
            geocoding.user_agent = agent;
        }

        let routing = match lookup("ORS_API_KEY").filter(|key| !key.trim().is_empty()) {
            Some(api_key) => {
                let mut ors = OrsConfig::new(api_key);
                if let Some(url) = lookup("ORS_URL") {
                    ors.base_url = url;
                }
                RoutingBackend::Ors(ors)
            }
            None => {
                let mut osrm = OsrmConfig::default();
                if let Some(url) = lookup("OSRM_URL") {
                    osrm.base_url = url;
                }
                if let Some(profile) = lookup("OSRM_PROFILE") {
                    osrm.profile = profile;
                }
                RoutingBackend::Osrm(osrm)
            }
        };

        Self { geocoding, routing }
    }

    /// Builds the HTTP clients, with geocoding memoised for the process
    /// lifetime.
    pub fn connect(&self) -> Result<(CachedGeocoder<NominatimClient>, BackendRouter), reqwest::Error> {
        let geocoder = CachedGeocoder::new(NominatimClient::new(self.geocoding.clone())?);
        let router = match &self.routing {
            RoutingBackend::Osrm(config) => BackendRouter::Osrm(OsrmClient::new(config.clone())?),
            RoutingBackend::Ors(config) => BackendRouter::Ors(OrsClient::new(config.clone())?),
        };
        Ok((geocoder, router))
    }
}

/// Router chosen at runtime from [`RoutingBackend`].
#[derive(Debug, Clone)]
pub enum BackendRouter {
    Osrm(OsrmClient),
    Ors(OrsClient),
}

impl RouteProvider for BackendRouter {
    async fn route(&self, from: LonLat, to: LonLat) -> Result<RouteGeometry, LookupError> {
        match self {
            BackendRouter::Osrm(client) => client.route(from, to).await,
            BackendRouter::Ors(client) => client.route(from, to).await,
        }
    }
}
