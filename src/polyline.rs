//! Polyline representation for route geometries.
//!
//! Routing services return `[lon, lat]` pairs. Conversion to internal
//! `(lat, lon)` points happens here, once, when a geometry enters the crate.

use serde::{Deserialize, Serialize};

use crate::geo::{GeoPoint, LonLat};

/// A route geometry as an ordered sequence of points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    points: Vec<GeoPoint>,
}

impl Polyline {
    pub fn new(points: Vec<GeoPoint>) -> Self {
        Self { points }
    }

    /// Builds a polyline from service-order `[lon, lat]` pairs.
    pub fn from_lon_lat_pairs(pairs: &[[f64; 2]]) -> Self {
        Self {
            points: pairs
                .iter()
                .map(|pair| LonLat::from_pair(*pair).to_point())
                .collect(),
        }
    }

    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    pub fn into_points(self) -> Vec<GeoPoint> {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// A drawable line needs two points that are well formed.
    pub fn is_drawable(&self) -> bool {
        self.points.len() >= 2 && self.points.iter().all(GeoPoint::is_well_formed)
    }
}
