//! Real Mumbai locations for test fixtures.
//!
//! Coordinates sourced from OpenStreetMap. All points except
//! `OUT_OF_REGION` fall inside `Region::mumbai()`.

use incident_router::geo::GeoPoint;

/// A named location with coordinates.
#[derive(Debug, Clone)]
pub struct Location {
    pub name: &'static str,
    pub lat: f64,
    pub lon: f64,
}

impl Location {
    pub const fn new(name: &'static str, lat: f64, lon: f64) -> Self {
        Self { name, lat, lon }
    }

    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lon)
    }
}

// ============================================================================
// Incident sites
// ============================================================================

pub const BANDRA: Location = Location::new("Bandra", 19.0760, 72.8777);
pub const KURLA: Location = Location::new("Kurla", 19.0726, 72.8845);
pub const DHARAVI: Location = Location::new("Dharavi", 19.0403, 72.8543);
pub const ANDHERI: Location = Location::new("Andheri East", 19.1136, 72.8697);

// ============================================================================
// Hospitals
// ============================================================================

pub const POWAI_HOSPITAL: Location = Location::new("Hiranandani Hospital Powai", 19.1197, 72.9050);
pub const SION_HOSPITAL: Location = Location::new("Lokmanya Tilak Hospital Sion", 19.0176, 72.8561);
pub const LILAVATI: Location = Location::new("Lilavati Hospital", 19.0511, 72.8290);
pub const HINDUJA: Location = Location::new("Hinduja Hospital", 19.0330, 72.8397);
pub const KEM: Location = Location::new("KEM Hospital", 19.0024, 72.8420);
pub const NANAVATI: Location = Location::new("Nanavati Hospital", 19.0968, 72.8400);
pub const KOKILABEN: Location = Location::new("Kokilaben Hospital", 19.1310, 72.8247);

pub const HOSPITALS: &[Location] = &[
    POWAI_HOSPITAL,
    SION_HOSPITAL,
    LILAVATI,
    HINDUJA,
    KEM,
    NANAVATI,
    KOKILABEN,
];

// ============================================================================
// Outside the region
// ============================================================================

pub const OUT_OF_REGION: Location = Location::new("Ruby Hall Clinic Pune", 18.5314, 73.8765);
