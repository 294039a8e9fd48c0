//! Incident and facility records as the dispatch backend serves them.
//!
//! Coordinates are optional and not trusted: a value that is not a real
//! WGS84 coordinate is treated exactly like a missing one.

use serde::{Deserialize, Deserializer};

use crate::geo::GeoPoint;
use crate::resolver::{Candidate, LocationQuery};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IncidentRecord {
    #[serde(deserialize_with = "flexible_id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, alias = "lat")]
    pub latitude: Option<f64>,
    #[serde(default, alias = "lon")]
    pub longitude: Option<f64>,
    #[serde(default, alias = "assigned_hospital_id", deserialize_with = "flexible_optional_id")]
    pub assigned_candidate_id: Option<String>,
}

impl IncidentRecord {
    pub fn location_query(&self) -> LocationQuery {
        LocationQuery {
            explicit_point: point_from(self.latitude, self.longitude),
            free_text: self
                .name
                .as_deref()
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string),
        }
    }
}

/// A facility with whatever extra fields the backend sends in `metrics`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FacilityRecord<M> {
    #[serde(alias = "hospital_id", deserialize_with = "flexible_id")]
    pub id: String,
    #[serde(default, alias = "hospital_name")]
    pub name: String,
    #[serde(default, alias = "lat")]
    pub latitude: Option<f64>,
    #[serde(default, alias = "lon")]
    pub longitude: Option<f64>,
    #[serde(flatten)]
    pub metrics: M,
}

impl<M> FacilityRecord<M> {
    pub fn into_candidate(self) -> Candidate<M> {
        Candidate {
            raw_point: point_from(self.latitude, self.longitude),
            id: self.id,
            name: self.name,
            metrics: self.metrics,
        }
    }
}

fn point_from(latitude: Option<f64>, longitude: Option<f64>) -> Option<GeoPoint> {
    let point = GeoPoint::new(latitude?, longitude?);
    point.is_well_formed().then_some(point)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Integer(i64),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(text) => text,
            RawId::Integer(number) => number.to_string(),
        }
    }
}

/// Accepts both `"h-12"` and `12`.
fn flexible_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    RawId::deserialize(deserializer).map(String::from)
}

fn flexible_optional_id<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(Option::<RawId>::deserialize(deserializer)?.map(String::from))
}
