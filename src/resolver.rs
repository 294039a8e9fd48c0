//! Location resolution for the incident and for every candidate facility.
//!
//! Both operations are infallible: a failed or empty lookup falls back to the
//! region's fallback center. Lookups are never retried, so the worst case is
//! one round trip per location.

use futures::future::join_all;
use rand::Rng;
use serde::Serialize;
use tracing::{debug, warn};

use crate::geo::{GeoPoint, Region};
use crate::traits::Geocoder;

/// What is known about a location before resolution.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationQuery {
    pub explicit_point: Option<GeoPoint>,
    pub free_text: Option<String>,
}

impl LocationQuery {
    pub fn point(point: GeoPoint) -> Self {
        Self {
            explicit_point: Some(point),
            free_text: None,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            explicit_point: None,
            free_text: Some(text.into()),
        }
    }
}

/// Where a resolved point came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PointSource {
    /// Coordinates supplied with the record.
    Supplied,
    /// First match of a geocoding lookup.
    Geocoded,
    /// Region fallback center, possibly jittered.
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResolvedPoint {
    pub point: GeoPoint,
    pub source: PointSource,
}

/// A facility that may receive a route.
///
/// `metrics` is carried through untouched for consumers outside the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate<M> {
    pub id: String,
    pub name: String,
    pub raw_point: Option<GeoPoint>,
    pub metrics: M,
}

/// A candidate whose point is guaranteed usable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedCandidate<M> {
    pub id: String,
    pub name: String,
    pub point: GeoPoint,
    pub source: PointSource,
    pub metrics: M,
}

/// Resolves one location.
///
/// An explicit point is used as-is, without checking it against `region`.
/// Otherwise free text gets a single lookup restricted to `region` and the
/// first match wins. Anything else yields `region.fallback_center` exactly.
pub async fn resolve<G: Geocoder>(
    geocoder: &G,
    query: &LocationQuery,
    region: &Region,
) -> ResolvedPoint {
    if let Some(point) = query.explicit_point.filter(GeoPoint::is_well_formed) {
        return ResolvedPoint {
            point,
            source: PointSource::Supplied,
        };
    }

    let text = query
        .free_text
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty());

    if let Some(text) = text {
        match geocoder.search(text, Some(region)).await {
            Ok(points) => {
                if let Some(point) = points.first().copied().filter(GeoPoint::is_well_formed) {
                    return ResolvedPoint {
                        point,
                        source: PointSource::Geocoded,
                    };
                }
                debug!(query = text, "geocoding returned no match");
            }
            Err(err) => warn!(query = text, error = %err, "geocoding failed"),
        }
    }

    ResolvedPoint {
        point: region.fallback_center,
        source: PointSource::Fallback,
    }
}

/// Resolves every candidate, preserving input order.
///
/// Lookups for all candidates are issued together and awaited together. A
/// candidate without an in-region point after its lookup is placed at the
/// fallback center plus jitter drawn from `rng`. Jitter is drawn in input
/// order after every lookup has settled, so a seeded `rng` gives the same
/// placements regardless of which lookup finished first.
pub async fn resolve_all<G, M, R>(
    geocoder: &G,
    candidates: Vec<Candidate<M>>,
    region: &Region,
    rng: &mut R,
) -> Vec<ResolvedCandidate<M>>
where
    G: Geocoder,
    R: Rng,
{
    let lookups = join_all(
        candidates
            .iter()
            .map(|candidate| locate_candidate(geocoder, candidate, region)),
    )
    .await;

    candidates
        .into_iter()
        .zip(lookups)
        .map(|(candidate, located)| {
            let (point, source) = match located {
                Some((point, source)) if region.contains(point) => (point, source),
                _ => {
                    warn!(candidate = %candidate.id, name = %candidate.name, "no in-region location, placing near fallback center");
                    (region.jittered_fallback(rng), PointSource::Fallback)
                }
            };

            ResolvedCandidate {
                id: candidate.id,
                name: candidate.name,
                point,
                source,
                metrics: candidate.metrics,
            }
        })
        .collect()
}

/// Supplied point if it is in region, otherwise the first geocoding match.
async fn locate_candidate<G: Geocoder, M>(
    geocoder: &G,
    candidate: &Candidate<M>,
    region: &Region,
) -> Option<(GeoPoint, PointSource)> {
    if let Some(point) = candidate.raw_point.filter(|point| region.contains(*point)) {
        return Some((point, PointSource::Supplied));
    }

    let name = candidate.name.trim();
    if name.is_empty() {
        return None;
    }

    let query = qualified_query(name, region);
    match geocoder.search(&query, None).await {
        Ok(points) => points
            .first()
            .map(|point| (*point, PointSource::Geocoded)),
        Err(err) => {
            warn!(candidate = %candidate.id, error = %err, "geocoding failed");
            None
        }
    }
}

/// `"<name>, <qualifier>"`, unless the name already names the locality.
fn qualified_query(name: &str, region: &Region) -> String {
    let locality = region.locality();
    let qualifier = region.qualifier.trim();
    if qualifier.is_empty() || (!locality.is_empty() && name.to_lowercase().contains(&locality)) {
        name.to_string()
    } else {
        format!("{}, {}", name, qualifier)
    }
}
