//! resolver
//!
//! Mapping addresses to Things.
//!
//! # Architecture
//!
//! The [`Resolver`] trait is the only way the tree builder reaches records.
//! Concrete backends sit behind it and are chosen by [`create_resolver`]:
//!
//! - [`file`]: a directory of `<address>.json` records
//! - [`http`]: a remote lookup endpoint
//! - [`cache`]: memoizing wrapper around either
//! - [`mock`]: in-memory resolver for deterministic tests

pub mod cache;
mod factory;
pub mod file;
pub mod http;
pub mod mock;
mod traits;

pub use cache::CachingResolver;
pub use factory::{create_resolver, valid_resolver_names, ResolverKind, ResolverSettings};
pub use file::FileResolver;
pub use http::HttpResolver;
pub use traits::{ResolutionError, Resolver};
