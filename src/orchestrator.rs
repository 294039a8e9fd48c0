//! Generation-scoped pipeline runner.
//!
//! Every [`ResolutionOrchestrator::submit`] starts a new generation. Only the
//! run whose generation is still current when it finishes may commit; runs
//! overtaken by a newer submit or by [`ResolutionOrchestrator::cancel`] are
//! dropped without touching the committed snapshot, regardless of the order
//! in which they complete.
//!
//! Within one generation the incident and the candidate set are resolved
//! together, then ranked, then routed. A generation found stale between
//! stages stops before issuing more lookups.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use tracing::debug;

use crate::config::PipelineConfig;
use crate::ranker::{RankedCandidate, rank};
use crate::records::{FacilityRecord, IncidentRecord};
use crate::resolver::{Candidate, LocationQuery, ResolvedPoint, resolve, resolve_all};
use crate::routes::{RouteResult, fetch_routes};
use crate::traits::{Geocoder, RouteProvider};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Resolving,
    Committed,
}

/// Identity of one pipeline run. Used for staleness checks only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolutionBatch {
    pub generation: u64,
    pub incident_key: String,
    pub candidate_set_key: u64,
}

#[derive(Debug, Clone)]
pub struct ResolutionRequest<M> {
    pub incident_key: String,
    pub incident: LocationQuery,
    pub candidates: Vec<Candidate<M>>,
    pub pinned_id: Option<String>,
}

impl<M> ResolutionRequest<M> {
    pub fn from_records(incident: &IncidentRecord, facilities: Vec<FacilityRecord<M>>) -> Self {
        Self {
            incident_key: incident.id.clone(),
            incident: incident.location_query(),
            candidates: facilities
                .into_iter()
                .map(FacilityRecord::into_candidate)
                .collect(),
            pinned_id: incident.assigned_candidate_id.clone(),
        }
    }

    fn candidate_set_key(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        for candidate in &self.candidates {
            candidate.id.hash(&mut hasher);
        }
        hasher.finish()
    }
}

/// Everything the map needs for one incident.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot<M> {
    pub batch: ResolutionBatch,
    pub incident: ResolvedPoint,
    pub ranked: Vec<RankedCandidate<M>>,
    pub routes: Vec<RouteResult>,
    pub pinned_id: Option<String>,
}

impl<M> Snapshot<M> {
    /// The pinned candidate, if it was found among the candidates.
    pub fn pinned(&self) -> Option<&RankedCandidate<M>> {
        self.ranked.first().filter(|entry| entry.pinned)
    }

    pub fn route_for(&self, candidate_id: &str) -> Option<&RouteResult> {
        self.routes
            .iter()
            .find(|route| route.candidate_id == candidate_id)
    }
}

struct State<M> {
    generation: u64,
    in_flight: bool,
    committed: Option<Arc<Snapshot<M>>>,
}

/// Clears `in_flight` when a run ends without committing, including when
/// the `submit` future is dropped mid-way. No-op once a newer generation
/// has started.
struct InFlight<'a, M> {
    state: &'a Mutex<State<M>>,
    generation: u64,
}

impl<M> Drop for InFlight<'_, M> {
    fn drop(&mut self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.generation == self.generation {
            state.in_flight = false;
        }
    }
}

pub struct ResolutionOrchestrator<G, P, M> {
    config: PipelineConfig,
    geocoder: G,
    router: P,
    state: Mutex<State<M>>,
}

impl<G, P, M> ResolutionOrchestrator<G, P, M>
where
    G: Geocoder,
    P: RouteProvider,
{
    pub fn new(config: PipelineConfig, geocoder: G, router: P) -> Self {
        Self {
            config,
            geocoder,
            router,
            state: Mutex::new(State {
                generation: 0,
                in_flight: false,
                committed: None,
            }),
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Runs the pipeline for `request` as a new generation.
    ///
    /// Returns the committed snapshot, or `None` if a newer submit or a
    /// cancel overtook this one.
    pub async fn submit(&self, request: ResolutionRequest<M>) -> Option<Arc<Snapshot<M>>> {
        let batch = self.begin(&request);
        let generation = batch.generation;
        let _in_flight = InFlight {
            state: &self.state,
            generation,
        };
        let region = &self.config.region;
        let mut rng = self.jitter_rng();

        let incident_query = self.incident_query(request.incident);
        let (incident, resolved) = futures::join!(
            resolve(&self.geocoder, &incident_query, region),
            resolve_all(&self.geocoder, request.candidates, region, &mut rng),
        );

        if !self.is_current(generation) {
            debug!(generation, "superseded during resolution");
            return None;
        }

        let ranked = rank(
            incident.point,
            resolved,
            request.pinned_id.as_deref(),
            self.config.route_limit,
            self.config.traffic,
        );
        let routes = fetch_routes(&self.router, incident.point, &ranked).await;

        self.commit(Snapshot {
            batch,
            incident,
            ranked,
            routes,
            pinned_id: request.pinned_id,
        })
    }

    /// Supersedes the in-flight generation without starting another.
    pub fn cancel(&self) {
        let mut state = self.lock();
        state.generation += 1;
        state.in_flight = false;
        debug!(generation = state.generation, "cancelled");
    }

    pub fn latest(&self) -> Option<Arc<Snapshot<M>>> {
        self.lock().committed.clone()
    }

    pub fn phase(&self) -> Phase {
        let state = self.lock();
        if state.in_flight {
            Phase::Resolving
        } else if state.committed.is_some() {
            Phase::Committed
        } else {
            Phase::Idle
        }
    }

    pub fn current_generation(&self) -> u64 {
        self.lock().generation
    }

    fn begin(&self, request: &ResolutionRequest<M>) -> ResolutionBatch {
        let mut state = self.lock();
        state.generation += 1;
        state.in_flight = true;

        let batch = ResolutionBatch {
            generation: state.generation,
            incident_key: request.incident_key.clone(),
            candidate_set_key: request.candidate_set_key(),
        };
        debug!(generation = batch.generation, incident = %batch.incident_key, candidates = request.candidates.len(), "resolution started");
        batch
    }

    fn is_current(&self, generation: u64) -> bool {
        self.lock().generation == generation
    }

    fn commit(&self, snapshot: Snapshot<M>) -> Option<Arc<Snapshot<M>>> {
        let mut state = self.lock();
        let generation = snapshot.batch.generation;
        if state.generation != generation {
            debug!(generation, current = state.generation, "discarding stale result");
            return None;
        }

        let snapshot = Arc::new(snapshot);
        state.committed = Some(Arc::clone(&snapshot));
        state.in_flight = false;
        debug!(generation, routes = snapshot.routes.len(), "resolution committed");
        Some(snapshot)
    }

    fn incident_query(&self, mut query: LocationQuery) -> LocationQuery {
        if self.config.validate_incident_point {
            let region = &self.config.region;
            query.explicit_point = query.explicit_point.filter(|point| region.contains(*point));
        }
        query
    }

    fn jitter_rng(&self) -> StdRng {
        match self.config.jitter_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State<M>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
