//! Coordinate primitives and the validity region.
//!
//! Internally every point is `(lat, lon)`. External routing services speak
//! `[lon, lat]`; that order only exists as [`LonLat`] and is converted at the
//! adapter boundary.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// A WGS84 coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Finite and inside the WGS84 latitude/longitude ranges.
    ///
    /// This says nothing about the configured [`Region`]; it only rejects
    /// values no real place can have.
    pub fn is_well_formed(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }

    pub fn to_lon_lat(self) -> LonLat {
        LonLat {
            lon: self.lon,
            lat: self.lat,
        }
    }
}

/// A coordinate in the `[lon, lat]` order used by routing services.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LonLat {
    pub lon: f64,
    pub lat: f64,
}

impl LonLat {
    pub fn from_pair(pair: [f64; 2]) -> Self {
        Self {
            lon: pair[0],
            lat: pair[1],
        }
    }

    pub fn to_point(self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lon)
    }
}

/// Rectangular validity box plus the deterministic fallback used when a
/// location cannot be resolved inside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
    pub fallback_center: GeoPoint,
    /// Half-width of the uniform offset applied to fallback placements.
    pub fallback_jitter_degrees: f64,
    /// Appended to facility names before geocoding, e.g. "Mumbai, India".
    pub qualifier: String,
}

impl Region {
    /// Greater Mumbai.
    pub fn mumbai() -> Self {
        Self {
            min_lat: 18.85,
            max_lat: 19.30,
            min_lon: 72.77,
            max_lon: 72.99,
            fallback_center: GeoPoint::new(19.0760, 72.8777),
            fallback_jitter_degrees: 0.01,
            qualifier: "Mumbai, India".to_string(),
        }
    }

    pub fn contains(&self, point: GeoPoint) -> bool {
        point.is_well_formed()
            && (self.min_lat..=self.max_lat).contains(&point.lat)
            && (self.min_lon..=self.max_lon).contains(&point.lon)
    }

    /// Fallback center offset independently on each axis by a uniform draw
    /// from `[-fallback_jitter_degrees, +fallback_jitter_degrees]`.
    pub fn jittered_fallback<R: Rng>(&self, rng: &mut R) -> GeoPoint {
        let spread = self.fallback_jitter_degrees;
        if !spread.is_finite() || spread <= 0.0 {
            return self.fallback_center;
        }

        GeoPoint::new(
            self.fallback_center.lat + rng.gen_range(-spread..=spread),
            self.fallback_center.lon + rng.gen_range(-spread..=spread),
        )
    }

    /// Nominatim `viewbox` value: `left,top,right,bottom`.
    pub fn viewbox(&self) -> String {
        format!(
            "{},{},{},{}",
            self.min_lon, self.max_lat, self.max_lon, self.min_lat
        )
    }

    /// First comma-separated segment of the qualifier, lowercased.
    pub(crate) fn locality(&self) -> String {
        self.qualifier
            .split(',')
            .next()
            .unwrap_or_default()
            .trim()
            .to_lowercase()
    }
}

impl Default for Region {
    fn default() -> Self {
        Self::mumbai()
    }
}
