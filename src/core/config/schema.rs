//! core::config::schema
//!
//! Configuration schema types.
//!
//! Both the global and the project file use the same [`SeedConfig`] shape;
//! every value is optional so a project file only needs to name what it
//! overrides.
//!
//! # Validation
//!
//! Config values are validated after parsing (e.g., the resolver kind must
//! be a known backend and the endpoint must be a URL).

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::tree::MAX_DEPTH_CEILING;

/// Configuration file contents.
///
/// # Example
///
/// ```toml
/// [resolver]
/// kind = "http"
/// endpoint = "http://localhost:3000/api/thing"
/// timeout_secs = 10
/// cache = true
///
/// [tree]
/// max_depth = 32
/// on_limit = "prune"
/// fan_out = false
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SeedConfig {
    /// Resolver backend settings
    pub resolver: Option<ResolverConfig>,

    /// Tree expansion settings
    pub tree: Option<TreeConfig>,
}

impl SeedConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(resolver) = &self.resolver {
            resolver.validate()?;
        }
        if let Some(tree) = &self.tree {
            tree.validate()?;
        }
        Ok(())
    }
}

/// Resolver backend settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ResolverConfig {
    /// Backend to use ("file" or "http")
    pub kind: Option<String>,

    /// Record store directory for the file backend
    pub store_dir: Option<PathBuf>,

    /// Endpoint for the http backend
    pub endpoint: Option<String>,

    /// Per-request timeout for the http backend
    pub timeout_secs: Option<u64>,

    /// Memoize resolved records by address
    pub cache: Option<bool>,
}

impl ResolverConfig {
    /// Validate the resolver settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(kind) = &self.kind {
            let valid = crate::resolver::valid_resolver_names();
            if !valid.contains(&kind.as_str()) {
                return Err(ConfigError::InvalidValue(format!(
                    "invalid resolver '{}', must be one of: {}",
                    kind,
                    valid.join(", ")
                )));
            }
        }

        if let Some(endpoint) = &self.endpoint {
            reqwest::Url::parse(endpoint).map_err(|e| {
                ConfigError::InvalidValue(format!("invalid endpoint '{}': {}", endpoint, e))
            })?;
        }

        if self.timeout_secs == Some(0) {
            return Err(ConfigError::InvalidValue(
                "timeout_secs must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

/// Tree expansion settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct TreeConfig {
    /// Deepest level a reference may be expanded to (at most
    /// [`MAX_DEPTH_CEILING`])
    pub max_depth: Option<usize>,

    /// What to do when `max_depth` is exceeded ("fail" or "prune")
    pub on_limit: Option<String>,

    /// Expand sibling references concurrently
    pub fan_out: Option<bool>,
}

impl TreeConfig {
    /// Valid limit policies.
    pub const VALID_LIMIT_POLICIES: &'static [&'static str] = &["fail", "prune"];

    /// Validate the tree settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.max_depth {
            Some(0) => {
                return Err(ConfigError::InvalidValue(
                    "max_depth must be greater than zero".to_string(),
                ));
            }
            Some(depth) if depth > MAX_DEPTH_CEILING => {
                return Err(ConfigError::InvalidValue(format!(
                    "max_depth {} exceeds the maximum of {}",
                    depth, MAX_DEPTH_CEILING
                )));
            }
            _ => {}
        }

        if let Some(policy) = &self.on_limit {
            if !Self::VALID_LIMIT_POLICIES.contains(&policy.as_str()) {
                return Err(ConfigError::InvalidValue(format!(
                    "invalid on_limit '{}', must be one of: {}",
                    policy,
                    Self::VALID_LIMIT_POLICIES.join(", ")
                )));
            }
        }

        Ok(())
    }
}
