//! Test fixtures for incident-router.
//!
//! Provides:
//! - Real Mumbai locations
//! - Scripted geocoding and routing services with per-query delays and
//!   failures, for driving the pipeline under paused tokio time

#![allow(dead_code)]

pub mod mumbai_locations;

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use incident_router::error::LookupError;
use incident_router::geo::{GeoPoint, LonLat, Region};
use incident_router::resolver::Candidate;
use incident_router::traits::{Geocoder, RouteGeometry, RouteProvider};

pub use mumbai_locations::*;

enum Answer {
    Match(Vec<GeoPoint>),
    Fail,
}

/// Geocoder answering from a table. Unknown queries are misses.
#[derive(Default)]
pub struct ScriptedGeocoder {
    answers: HashMap<String, (Answer, Duration)>,
    calls: AtomicUsize,
}

impl ScriptedGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(self, query: &str, point: GeoPoint) -> Self {
        self.answer_after(query, point, Duration::ZERO)
    }

    pub fn answer_after(mut self, query: &str, point: GeoPoint, delay: Duration) -> Self {
        self.answers
            .insert(query.to_string(), (Answer::Match(vec![point]), delay));
        self
    }

    pub fn fail(mut self, query: &str) -> Self {
        self.answers
            .insert(query.to_string(), (Answer::Fail, Duration::ZERO));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Geocoder for ScriptedGeocoder {
    async fn search(
        &self,
        query: &str,
        _filter: Option<&Region>,
    ) -> Result<Vec<GeoPoint>, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.answers.get(query) {
            Some((answer, delay)) => {
                tokio::time::sleep(*delay).await;
                match answer {
                    Answer::Match(points) => Ok(points.clone()),
                    Answer::Fail => Err(LookupError::Status {
                        code: 503,
                        body: "Service Unavailable".to_string(),
                    }),
                }
            }
            None => Ok(Vec::new()),
        }
    }
}

/// Router returning a straight line after a fixed delay, failing for the
/// listed destinations.
#[derive(Default)]
pub struct ScriptedRouter {
    delay: Duration,
    failing: Vec<GeoPoint>,
    calls: AtomicUsize,
}

impl ScriptedRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn fail_to(mut self, destination: GeoPoint) -> Self {
        self.failing.push(destination);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RouteProvider for ScriptedRouter {
    async fn route(&self, from: LonLat, to: LonLat) -> Result<RouteGeometry, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;

        let destination = to.to_point();
        let fails = self.failing.iter().any(|point| {
            (point.lat - destination.lat).abs() < 1e-9 && (point.lon - destination.lon).abs() < 1e-9
        });
        if fails {
            return Err(LookupError::Malformed("no route".to_string()));
        }

        Ok(RouteGeometry {
            coordinates: vec![
                [from.lon, from.lat],
                [(from.lon + to.lon) / 2.0, (from.lat + to.lat) / 2.0],
                [to.lon, to.lat],
            ],
            distance_m: None,
            duration_s: None,
        })
    }
}

pub fn candidate(id: &str, location: &Location) -> Candidate<()> {
    Candidate {
        id: id.to_string(),
        name: location.name.to_string(),
        raw_point: Some(location.point()),
        metrics: (),
    }
}

pub fn unlocated(id: &str, name: &str) -> Candidate<()> {
    Candidate {
        id: id.to_string(),
        name: name.to_string(),
        raw_point: None,
        metrics: (),
    }
}
