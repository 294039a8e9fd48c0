//! Seams to the external geocoding and routing services.
//!
//! The pipeline only talks to these traits. HTTP adapters live in
//! `nominatim`, `osrm` and `ors`; tests implement them directly.

use std::future::Future;

use crate::error::LookupError;
use crate::geo::{GeoPoint, LonLat, Region};

/// Free-text place search.
pub trait Geocoder {
    /// Matches for `query`, most relevant first.
    ///
    /// With a `filter`, the service is asked to restrict matches to that box.
    /// An empty list is a miss, not an error.
    fn search(
        &self,
        query: &str,
        filter: Option<&Region>,
    ) -> impl Future<Output = Result<Vec<GeoPoint>, LookupError>> + Send;
}

/// Raw route as returned by a routing service.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteGeometry {
    /// Ordered `[lon, lat]` pairs.
    pub coordinates: Vec<[f64; 2]>,
    pub distance_m: Option<f64>,
    pub duration_s: Option<f64>,
}

/// Driving directions between two points.
pub trait RouteProvider {
    fn route(
        &self,
        from: LonLat,
        to: LonLat,
    ) -> impl Future<Output = Result<RouteGeometry, LookupError>> + Send;
}

impl<G: Geocoder + Sync> Geocoder for &G {
    fn search(
        &self,
        query: &str,
        filter: Option<&Region>,
    ) -> impl Future<Output = Result<Vec<GeoPoint>, LookupError>> + Send {
        (**self).search(query, filter)
    }
}

impl<R: RouteProvider + Sync> RouteProvider for &R {
    fn route(
        &self,
        from: LonLat,
        to: LonLat,
    ) -> impl Future<Output = Result<RouteGeometry, LookupError>> + Send {
        (**self).route(from, to)
    }
}
