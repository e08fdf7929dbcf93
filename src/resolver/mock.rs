//! resolver::mock
//!
//! In-memory resolver for deterministic testing.
//!
//! # Design
//!
//! The mock resolver holds records in memory keyed by address and lets a
//! test inject per-address failures and latency. Every call is recorded so
//! tests can assert on the order and number of lookups.
//!
//! The expected type is enforced the same way the real resolvers enforce
//! it: a stored record of another type comes back as `Malformed`.
//!
//! # Example
//!
//! ```
//! use seedtree::core::thing::{Common, Thing};
//! use seedtree::core::types::{Address, ThingType};
//! use seedtree::resolver::mock::MockResolver;
//! use seedtree::resolver::Resolver;
//!
//! # tokio_test::block_on(async {
//! let leaf = Address::new("leaf1").unwrap();
//! let resolver = MockResolver::new().with_thing(Thing::text(Common::at(leaf.clone()), "hello"));
//!
//! let thing = resolver.resolve(&leaf, ThingType::Text).await.unwrap();
//! assert_eq!(thing.data_string(), "hello");
//! assert_eq!(resolver.calls().len(), 1);
//! # });
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;

use super::traits::{ResolutionError, Resolver};
use crate::core::thing::Thing;
use crate::core::types::{Address, ThingType};

/// Mock resolver for testing.
///
/// Clones share state, so a test can keep a handle for assertions after
/// handing a clone to the tree builder.
#[derive(Debug, Clone, Default)]
pub struct MockResolver {
    inner: Arc<Mutex<MockResolverInner>>,
}

#[derive(Debug, Default)]
struct MockResolverInner {
    /// Stored records by address.
    things: HashMap<Address, Thing>,
    /// Forced failures by address.
    failures: HashMap<Address, ResolutionError>,
    /// Artificial latency by address.
    delays: HashMap<Address, Duration>,
    /// Recorded lookups, in call order.
    calls: Vec<MockCall>,
}

/// Recorded lookup for test verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockCall {
    pub address: Address,
    pub expected: ThingType,
}

impl MockResolver {
    /// Create an empty mock resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock resolver preloaded with records.
    pub fn with_things(things: impl IntoIterator<Item = Thing>) -> Self {
        let resolver = Self::new();
        for thing in things {
            resolver.insert(thing);
        }
        resolver
    }

    /// Add a record (builder style).
    pub fn with_thing(self, thing: Thing) -> Self {
        self.insert(thing);
        self
    }

    /// Make lookups of `address` fail with `error`.
    pub fn fail_on(self, address: Address, error: ResolutionError) -> Self {
        self.lock().failures.insert(address, error);
        self
    }

    /// Delay lookups of `address` by `delay` before answering.
    pub fn delay(self, address: Address, delay: Duration) -> Self {
        self.lock().delays.insert(address, delay);
        self
    }

    /// Add or replace a record.
    pub fn insert(&self, thing: Thing) {
        self.lock().things.insert(thing.address().clone(), thing);
    }

    /// Remove any forced failure for `address`.
    pub fn clear_failure(&self, address: &Address) {
        self.lock().failures.remove(address);
    }

    /// Get all recorded lookups.
    pub fn calls(&self) -> Vec<MockCall> {
        self.lock().calls.clone()
    }

    /// Number of lookups made for `address`.
    pub fn call_count(&self, address: &Address) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|c| &c.address == address)
            .count()
    }

    /// Clear recorded lookups.
    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    fn lock(&self) -> MutexGuard<'_, MockResolverInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl Resolver for MockResolver {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn resolve(
        &self,
        address: &Address,
        expected: ThingType,
    ) -> Result<Thing, ResolutionError> {
        let delay = {
            let mut inner = self.lock();
            inner.calls.push(MockCall {
                address: address.clone(),
                expected,
            });
            inner.delays.get(address).copied()
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let inner = self.lock();
        if let Some(error) = inner.failures.get(address) {
            return Err(error.clone());
        }

        let thing = inner
            .things
            .get(address)
            .cloned()
            .ok_or_else(|| ResolutionError::NotFound(address.clone()))?;

        if thing.thing_type() != expected {
            return Err(ResolutionError::Malformed {
                address: address.clone(),
                message: format!(
                    "expected {} but record is {}",
                    expected,
                    thing.thing_type()
                ),
            });
        }

        Ok(thing)
    }
}
