//! Great-circle distance and straight-line travel estimates.
//!
//! Every distance in the crate goes through [`haversine_km`]; nothing else
//! computes its own.

use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Pickup and turnaround time never goes below this.
const MIN_TRAVEL_MINUTES: f64 = 4.0;

/// Great-circle distance between two points in kilometers.
pub fn haversine_km(from: GeoPoint, to: GeoPoint) -> f64 {
    let lat1_rad = from.lat.to_radians();
    let lat2_rad = to.lat.to_radians();
    let delta_lat = (to.lat - from.lat).to_radians();
    let delta_lon = (to.lon - from.lon).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Road congestion assumed when turning distance into time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrafficLevel {
    Heavy,
    #[default]
    Normal,
    Light,
}

impl TrafficLevel {
    /// Average city driving speed in km/h.
    pub fn speed_kmh(self) -> f64 {
        match self {
            TrafficLevel::Heavy => 18.0,
            TrafficLevel::Normal => 24.0,
            TrafficLevel::Light => 32.0,
        }
    }

    /// Convert a straight-line distance into estimated minutes.
    pub fn travel_minutes(self, km: f64) -> f64 {
        let minutes = km / self.speed_kmh() * 60.0;
        minutes.max(MIN_TRAVEL_MINUTES)
    }
}
