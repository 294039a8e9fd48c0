//! Distance ranking and route-target selection.

use serde::Serialize;

use crate::geo::GeoPoint;
use crate::haversine::{TrafficLevel, haversine_km};
use crate::resolver::ResolvedCandidate;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedCandidate<M> {
    pub candidate: ResolvedCandidate<M>,
    pub distance_km: f64,
    /// Straight-line travel estimate, not a routed duration.
    pub travel_minutes: f64,
    pub pinned: bool,
}

impl<M> RankedCandidate<M> {
    pub fn id(&self) -> &str {
        &self.candidate.id
    }

    pub fn point(&self) -> GeoPoint {
        self.candidate.point
    }
}

/// Orders candidates by distance from `incident` and keeps the first `limit`.
///
/// Ties keep input order. When `pinned_id` names one of the candidates it is
/// moved to the front before truncation, so it is always kept. An unknown
/// `pinned_id` is ignored.
pub fn rank<M>(
    incident: GeoPoint,
    candidates: Vec<ResolvedCandidate<M>>,
    pinned_id: Option<&str>,
    limit: usize,
    traffic: TrafficLevel,
) -> Vec<RankedCandidate<M>> {
    let mut ranked: Vec<RankedCandidate<M>> = candidates
        .into_iter()
        .map(|candidate| {
            let distance_km = haversine_km(incident, candidate.point);
            RankedCandidate {
                pinned: pinned_id == Some(candidate.id.as_str()),
                travel_minutes: traffic.travel_minutes(distance_km),
                distance_km,
                candidate,
            }
        })
        .collect();

    // sort_by is stable
    ranked.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));

    if let Some(position) = ranked.iter().position(|entry| entry.pinned) {
        let pinned = ranked.remove(position);
        ranked.insert(0, pinned);
    }

    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::PointSource;

    const INCIDENT: GeoPoint = GeoPoint::new(19.0760, 72.8777);

    fn resolved(id: &str, lat: f64, lon: f64) -> ResolvedCandidate<u32> {
        ResolvedCandidate {
            id: id.to_string(),
            name: format!("Hospital {}", id),
            point: GeoPoint::new(lat, lon),
            source: PointSource::Supplied,
            metrics: 0,
        }
    }

    fn ids<M>(ranked: &[RankedCandidate<M>]) -> Vec<&str> {
        ranked.iter().map(|entry| entry.id()).collect()
    }

    fn sample() -> Vec<ResolvedCandidate<u32>> {
        vec![
            resolved("far", 19.25, 72.95),
            resolved("near", 19.08, 72.88),
            resolved("mid", 19.12, 72.90),
        ]
    }

    #[test]
    fn test_sorted_ascending_by_distance() {
        let ranked = rank(INCIDENT, sample(), None, 10, TrafficLevel::Normal);
        assert_eq!(ids(&ranked), vec!["near", "mid", "far"]);
        assert!(ranked.windows(2).all(|w| w[0].distance_km <= w[1].distance_km));
        assert!(ranked.iter().all(|entry| !entry.pinned));
    }

    #[test]
    fn test_limit_truncates() {
        let ranked = rank(INCIDENT, sample(), None, 2, TrafficLevel::Normal);
        assert_eq!(ids(&ranked), vec!["near", "mid"]);
    }

    #[test]
    fn test_pinned_goes_first_even_outside_limit() {
        let ranked = rank(INCIDENT, sample(), Some("far"), 2, TrafficLevel::Normal);
        assert_eq!(ids(&ranked), vec!["far", "near"]);
        assert!(ranked[0].pinned);
        assert!(!ranked[1].pinned);
    }

    #[test]
    fn test_pinned_nearest_keeps_order() {
        let ranked = rank(INCIDENT, sample(), Some("near"), 3, TrafficLevel::Normal);
        assert_eq!(ids(&ranked), vec!["near", "mid", "far"]);
    }

    #[test]
    fn test_unknown_pin_is_ignored() {
        let ranked = rank(INCIDENT, sample(), Some("ghost"), 2, TrafficLevel::Normal);
        assert_eq!(ids(&ranked), vec!["near", "mid"]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let candidates = vec![
            resolved("first", 19.10, 72.90),
            resolved("second", 19.10, 72.90),
            resolved("third", 19.10, 72.90),
        ];
        let ranked = rank(INCIDENT, candidates, None, 3, TrafficLevel::Normal);
        assert_eq!(ids(&ranked), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_empty_and_zero_limit() {
        assert!(rank::<u32>(INCIDENT, Vec::new(), Some("x"), 3, TrafficLevel::Normal).is_empty());
        assert!(rank(INCIDENT, sample(), Some("far"), 0, TrafficLevel::Normal).is_empty());
    }

    #[test]
    fn test_travel_estimate_follows_traffic() {
        let heavy = rank(INCIDENT, sample(), None, 1, TrafficLevel::Heavy);
        let light = rank(INCIDENT, sample(), None, 1, TrafficLevel::Light);
        assert!(heavy[0].travel_minutes >= light[0].travel_minutes);
    }

    #[test]
    fn test_metrics_pass_through() {
        let mut candidates = sample();
        candidates[1].metrics = 42;
        let ranked = rank(INCIDENT, candidates, None, 1, TrafficLevel::Normal);
        assert_eq!(ranked[0].candidate.metrics, 42);
    }
}
