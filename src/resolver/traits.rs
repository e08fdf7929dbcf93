//! resolver::traits
//!
//! Resolver trait definition for mapping an address to a Thing.
//!
//! # Design
//!
//! The `Resolver` trait is async because resolution may involve network or
//! filesystem I/O. Every failure mode collapses into [`ResolutionError`]; the
//! tree builder treats any of them as "this reference could not be
//! resolved" and carries on with the siblings.
//!
//! Implementations must be safe to call repeatedly for the same address.
//! Timeout and retry policy belongs to the implementation, not the caller.
//!
//! # Example
//!
//! ```ignore
//! use seedtree::resolver::{Resolver, ResolutionError};
//! use seedtree::core::types::{Address, ThingType};
//!
//! async fn fetch_leaf(resolver: &dyn Resolver) -> Result<(), ResolutionError> {
//!     let address = Address::new("leaf1").unwrap();
//!     let thing = resolver.resolve(&address, ThingType::Text).await?;
//!     println!("{}", thing.data_string());
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::core::thing::Thing;
use crate::core::types::{Address, ThingType};

/// Errors from resolving an address.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    /// No record exists at the address.
    #[error("not found: {0}")]
    NotFound(Address),

    /// The address cannot be used by this resolver.
    #[error("invalid address '{address}': {reason}")]
    InvalidAddress { address: Address, reason: String },

    /// Local storage failed.
    #[error("i/o error for '{address}': {message}")]
    Io { address: Address, message: String },

    /// The fetched record did not decode as the expected type.
    #[error("malformed record at '{address}': {message}")]
    Malformed { address: Address, message: String },

    /// The remote answered with a non-success status.
    #[error("remote error for '{address}': {status} - {message}")]
    Status {
        address: Address,
        status: u16,
        message: String,
    },

    /// Network or connection error.
    #[error("network error: {0}")]
    Network(String),

    /// The per-call time bound elapsed.
    #[error("timed out after {after:?} resolving '{address}'")]
    Timeout { address: Address, after: Duration },
}

/// The Resolver trait for fetching Things by address.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so one resolver can serve
/// concurrent sibling expansions.
#[async_trait]
pub trait Resolver: Send + Sync {
    /// Get the resolver name (e.g., "file", "http").
    fn name(&self) -> &'static str;

    /// Resolve an address to a Thing of the expected type.
    ///
    /// # Errors
    ///
    /// - `NotFound` if nothing exists at the address
    /// - `Malformed` if the record does not decode as `expected`, or
    ///   describes a different address
    /// - transport specific variants otherwise
    async fn resolve(&self, address: &Address, expected: ThingType)
        -> Result<Thing, ResolutionError>;
}

/// Decode a fetched body as the expected type and check its identity.
///
/// Shared by the concrete resolvers so the decode contract is identical
/// regardless of transport.
pub(crate) fn decode_fetched(
    address: &Address,
    expected: ThingType,
    bytes: &[u8],
) -> Result<Thing, ResolutionError> {
    let thing = Thing::decode_as(expected, bytes).map_err(|e| ResolutionError::Malformed {
        address: address.clone(),
        message: e.to_string(),
    })?;

    if thing.address() != address {
        return Err(ResolutionError::Malformed {
            address: address.clone(),
            message: format!("record describes address '{}'", thing.address()),
        });
    }

    Ok(thing)
}
