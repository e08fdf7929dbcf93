//! resolver::factory
//!
//! Resolver selection and creation.
//!
//! Commands build their resolver through [`create_resolver`] rather than
//! naming a concrete backend, so the choice stays a configuration concern.
//!
//! # Example
//!
//! ```ignore
//! use seedtree::resolver::{create_resolver, ResolverKind, ResolverSettings};
//!
//! let resolver = create_resolver(&config.resolver_settings()?)?;
//! let seed = new_seed(origin, resolver).await?;
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use super::cache::CachingResolver;
use super::file::FileResolver;
use super::http::HttpResolver;
use super::traits::{ResolutionError, Resolver};

/// Supported resolver backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolverKind {
    /// Directory of `<address>.json` records
    File,
    /// Remote lookup endpoint
    Http,
}

impl ResolverKind {
    /// Get all backends.
    pub fn all() -> &'static [ResolverKind] {
        &[ResolverKind::File, ResolverKind::Http]
    }

    /// Get the backend name as used in configuration files.
    pub fn name(&self) -> &'static str {
        match self {
            ResolverKind::File => "file",
            ResolverKind::Http => "http",
        }
    }

    /// Parse a backend from a string.
    ///
    /// ```
    /// use seedtree::resolver::ResolverKind;
    ///
    /// assert_eq!(ResolverKind::parse("HTTP"), Some(ResolverKind::Http));
    /// assert_eq!(ResolverKind::parse("ipfs"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "file" => Some(ResolverKind::File),
            "http" => Some(ResolverKind::Http),
            _ => None,
        }
    }
}

impl std::fmt::Display for ResolverKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Names of every backend, for validation messages.
pub fn valid_resolver_names() -> Vec<&'static str> {
    ResolverKind::all().iter().map(|k| k.name()).collect()
}

/// Everything needed to build a resolver.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolverSettings {
    pub kind: ResolverKind,
    /// Store directory (file backend)
    pub store_dir: PathBuf,
    /// Lookup endpoint (http backend)
    pub endpoint: String,
    /// Per-call timeout (http backend)
    pub timeout: Duration,
    /// Wrap the backend in a memoizing cache
    pub cache: bool,
}

/// Create a resolver from settings.
///
/// # Errors
///
/// Returns `ResolutionError::Network` if the HTTP client cannot be built.
pub fn create_resolver(settings: &ResolverSettings) -> Result<Arc<dyn Resolver>, ResolutionError> {
    let backend: Arc<dyn Resolver> = match settings.kind {
        ResolverKind::File => Arc::new(FileResolver::new(&settings.store_dir)),
        ResolverKind::Http => Arc::new(HttpResolver::new(&settings.endpoint, settings.timeout)?),
    };

    tracing::debug!(
        kind = %settings.kind,
        cache = settings.cache,
        "created resolver"
    );

    if settings.cache {
        Ok(Arc::new(CachingResolver::new(backend)))
    } else {
        Ok(backend)
    }
}
