//! Route geometry for the selected candidates.

use futures::future::join_all;
use serde::Serialize;
use tracing::warn;

use crate::geo::GeoPoint;
use crate::polyline::Polyline;
use crate::ranker::RankedCandidate;
use crate::traits::{RouteGeometry, RouteProvider};

/// Outcome of routing to one candidate.
///
/// A failed route has no polyline; the renderer skips it and draws the rest.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteResult {
    pub candidate_id: String,
    pub polyline: Option<Polyline>,
    pub distance_km: Option<f64>,
    pub duration_minutes: Option<f64>,
}

impl RouteResult {
    fn failed(candidate_id: &str) -> Self {
        Self {
            candidate_id: candidate_id.to_string(),
            polyline: None,
            distance_km: None,
            duration_minutes: None,
        }
    }

    pub fn is_failed(&self) -> bool {
        self.polyline.is_none()
    }
}

/// Requests a route from `origin` to every target at once and waits for all
/// of them. Results are in target order; a failure only affects its own entry.
pub async fn fetch_routes<P, M>(
    router: &P,
    origin: GeoPoint,
    targets: &[RankedCandidate<M>],
) -> Vec<RouteResult>
where
    P: RouteProvider,
{
    join_all(
        targets
            .iter()
            .map(|target| fetch_route(router, origin, target.id(), target.point())),
    )
    .await
}

async fn fetch_route<P: RouteProvider>(
    router: &P,
    origin: GeoPoint,
    candidate_id: &str,
    destination: GeoPoint,
) -> RouteResult {
    match router.route(origin.to_lon_lat(), destination.to_lon_lat()).await {
        Ok(geometry) => into_result(candidate_id, geometry),
        Err(err) => {
            warn!(candidate = candidate_id, error = %err, "routing failed");
            RouteResult::failed(candidate_id)
        }
    }
}

fn into_result(candidate_id: &str, geometry: RouteGeometry) -> RouteResult {
    let polyline = Polyline::from_lon_lat_pairs(&geometry.coordinates);
    if !polyline.is_drawable() {
        warn!(candidate = candidate_id, points = polyline.len(), "route geometry unusable");
        return RouteResult::failed(candidate_id);
    }

    RouteResult {
        candidate_id: candidate_id.to_string(),
        polyline: Some(polyline),
        distance_km: geometry.distance_m.map(|m| m / 1000.0),
        duration_minutes: geometry.duration_s.map(|s| s / 60.0),
    }
}
