//! In-memory memoisation of geocoding lookups.
//!
//! Only non-empty answers are kept. Misses and errors are retried on the next
//! call, since a later lookup may succeed. Nothing is written to disk.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use tracing::debug;

use crate::error::LookupError;
use crate::geo::{GeoPoint, Region};
use crate::traits::Geocoder;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    query: String,
    viewbox: Option<String>,
}

impl CacheKey {
    fn new(query: &str, filter: Option<&Region>) -> Self {
        Self {
            query: query.trim().to_lowercase(),
            viewbox: filter.map(Region::viewbox),
        }
    }
}

#[derive(Debug)]
pub struct CachedGeocoder<G> {
    inner: G,
    entries: Mutex<HashMap<CacheKey, Vec<GeoPoint>>>,
}

impl<G> CachedGeocoder<G> {
    pub fn new(inner: G) -> Self {
        Self {
            inner,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get(&self, key: &CacheKey) -> Option<Vec<GeoPoint>> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn insert(&self, key: CacheKey, points: Vec<GeoPoint>) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, points);
    }
}

impl<G: Geocoder + Sync> Geocoder for CachedGeocoder<G> {
    async fn search(
        &self,
        query: &str,
        filter: Option<&Region>,
    ) -> Result<Vec<GeoPoint>, LookupError> {
        let key = CacheKey::new(query, filter);
        if let Some(points) = self.get(&key) {
            debug!(query, "geocode cache hit");
            return Ok(points);
        }

        let points = self.inner.search(query, filter).await?;
        if !points.is_empty() {
            self.insert(key, points.clone());
        }
        Ok(points)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    struct CountingGeocoder {
        calls: AtomicUsize,
        answer: Vec<GeoPoint>,
    }

    impl CountingGeocoder {
        fn answering(answer: Vec<GeoPoint>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                answer,
            }
        }
    }

    impl Geocoder for CountingGeocoder {
        async fn search(
            &self,
            _query: &str,
            _filter: Option<&Region>,
        ) -> Result<Vec<GeoPoint>, LookupError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.answer.clone())
        }
    }

    #[tokio::test]
    async fn test_repeated_query_hits_cache() {
        let inner = CountingGeocoder::answering(vec![GeoPoint::new(19.0544, 72.8406)]);
        let cache = CachedGeocoder::new(&inner);

        let first = cache.search("Lilavati Hospital", None).await.unwrap();
        let second = cache.search("  lilavati hospital ", None).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(inner.calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_filter_is_part_of_key() {
        let inner = CountingGeocoder::answering(vec![GeoPoint::new(19.0544, 72.8406)]);
        let cache = CachedGeocoder::new(&inner);
        let region = Region::mumbai();

        cache.search("Bandra", None).await.unwrap();
        cache.search("Bandra", Some(&region)).await.unwrap();

        assert_eq!(inner.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_misses_are_not_cached() {
        let inner = CountingGeocoder::answering(Vec::new());
        let cache = CachedGeocoder::new(&inner);

        cache.search("Nowhere", None).await.unwrap();
        cache.search("Nowhere", None).await.unwrap();

        assert_eq!(inner.calls.load(Ordering::SeqCst), 2);
        assert!(cache.is_empty());
    }
}
