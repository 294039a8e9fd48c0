//! incident-router: places an incident and candidate facilities on a shared
//! map frame and fetches driving routes between them.
//!
//! Location data arrives incomplete or wrong and the geocoding/routing
//! services may fail; every stage falls back instead of erroring, and only
//! the newest request is allowed to publish a result.

pub mod config;
pub mod error;
pub mod geo;
pub mod geocache;
pub mod haversine;
pub mod nominatim;
pub mod orchestrator;
pub mod ors;
pub mod osrm;
pub mod polyline;
pub mod ranker;
pub mod records;
pub mod resolver;
pub mod routes;
pub mod traits;
