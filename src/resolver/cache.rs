//! resolver::cache
//!
//! Memoizing resolver wrapper.
//!
//! Wraps any [`Resolver`] and remembers successful lookups keyed by
//! `(address, expected type)`. Failures are never cached, so a transient
//! network error on one grow does not poison the next.
//!
//! The cache is scoped to the wrapper's lifetime; there is no eviction
//! and no persistence.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use super::traits::{ResolutionError, Resolver};
use crate::core::thing::Thing;
use crate::core::types::{Address, ThingType};

type CacheKey = (Address, ThingType);

/// Resolver that memoizes successful results of an inner resolver.
pub struct CachingResolver {
    inner: Arc<dyn Resolver>,
    entries: Mutex<HashMap<CacheKey, Thing>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl std::fmt::Debug for CachingResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachingResolver")
            .field("inner", &self.inner.name())
            .field("entries", &self.len())
            .field("hits", &self.hits())
            .field("misses", &self.misses())
            .finish()
    }
}

impl CachingResolver {
    /// Wrap a resolver.
    pub fn new(inner: Arc<dyn Resolver>) -> Self {
        Self {
            inner,
            entries: Mutex::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Number of lookups answered from the cache.
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Number of lookups forwarded to the inner resolver.
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Number of cached records.
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    /// Whether the cache holds no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every cached record. Counters are kept.
    pub fn clear(&self) {
        self.entries().clear();
    }

    // A poisoned lock only means another task panicked mid-insert; the map
    // itself is still consistent.
    fn entries(&self) -> MutexGuard<'_, HashMap<CacheKey, Thing>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl Resolver for CachingResolver {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    async fn resolve(
        &self,
        address: &Address,
        expected: ThingType,
    ) -> Result<Thing, ResolutionError> {
        let key = (address.clone(), expected);

        if let Some(thing) = self.entries().get(&key).cloned() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            tracing::trace!(%address, "cache hit");
            return Ok(thing);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let thing = self.inner.resolve(address, expected).await?;
        self.entries().insert(key, thing.clone());
        Ok(thing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::thing::Common;
    use crate::resolver::mock::MockResolver;

    fn addr(s: &str) -> Address {
        Address::new(s).unwrap()
    }

    #[tokio::test]
    async fn second_lookup_is_a_hit() {
        let mock = MockResolver::new().with_thing(Thing::text(Common::at(addr("a")), "hi"));
        let cache = CachingResolver::new(Arc::new(mock.clone()));

        let first = cache.resolve(&addr("a"), ThingType::Text).await.unwrap();
        let second = cache.resolve(&addr("a"), ThingType::Text).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.misses(), 1);
        assert_eq!(mock.calls().len(), 1);
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let mock = MockResolver::new();
        let cache = CachingResolver::new(Arc::new(mock.clone()));

        assert!(cache.resolve(&addr("a"), ThingType::Text).await.is_err());
        mock.insert(Thing::text(Common::at(addr("a")), "late"));
        let thing = cache.resolve(&addr("a"), ThingType::Text).await.unwrap();

        assert_eq!(thing.data_string(), "late");
        assert_eq!(cache.misses(), 2);
        assert_eq!(cache.hits(), 0);
    }

    #[tokio::test]
    async fn keyed_by_expected_type() {
        let mock = MockResolver::new().with_thing(Thing::text(Common::at(addr("a")), "hi"));
        let cache = CachingResolver::new(Arc::new(mock.clone()));

        cache.resolve(&addr("a"), ThingType::Text).await.unwrap();
        assert!(cache.resolve(&addr("a"), ThingType::Number).await.is_err());
        assert_eq!(cache.len(), 1);
        assert_eq!(mock.calls().len(), 2);
    }

    #[tokio::test]
    async fn clear_forces_refetch() {
        let mock = MockResolver::new().with_thing(Thing::text(Common::at(addr("a")), "hi"));
        let cache = CachingResolver::new(Arc::new(mock.clone()));

        cache.resolve(&addr("a"), ThingType::Text).await.unwrap();
        cache.clear();
        assert!(cache.is_empty());
        cache.resolve(&addr("a"), ThingType::Text).await.unwrap();

        assert_eq!(mock.calls().len(), 2);
    }

    #[test]
    fn name_is_inner_name() {
        let cache = CachingResolver::new(Arc::new(MockResolver::new()));
        assert_eq!(cache.name(), "mock");
    }
}
