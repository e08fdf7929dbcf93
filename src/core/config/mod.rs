//! core::config
//!
//! Configuration schema and loading.
//!
//! # Overview
//!
//! Seed has two configuration scopes:
//! - **Global**: User-level settings
//! - **Project**: Overrides for one directory of records
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Global config file
//! 3. Project config file
//! 4. CLI flags (not handled here)
//!
//! # Global Config Locations
//!
//! Searched in order:
//! 1. `$SEED_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/seed/config.toml`
//! 3. `~/.seed/config.toml`
//!
//! # Project Config Location
//!
//! `<project>/.seed/config.toml`
//!
//! # Example
//!
//! ```no_run
//! use seedtree::core::config::Config;
//! use std::path::Path;
//!
//! let config = Config::load(Some(Path::new("/path/to/project"))).unwrap();
//!
//! println!("Resolver: {}", config.resolver_kind());
//! println!("Max depth: {}", config.max_depth());
//! ```

pub mod schema;

pub use schema::{ResolverConfig, SeedConfig, TreeConfig};

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

use crate::resolver::{ResolverKind, ResolverSettings};
use crate::tree::{GrowOptions, LimitPolicy};

/// Default resolver backend.
pub const DEFAULT_RESOLVER: &str = "file";

/// Default record store directory for the file backend.
pub const DEFAULT_STORE_DIR: &str = "records";

/// Default endpoint for the http backend.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:3000/api/thing";

/// Default per-request timeout for the http backend.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Default expansion depth bound.
pub const DEFAULT_MAX_DEPTH: usize = crate::tree::DEFAULT_MAX_DEPTH;

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),

    #[error("home directory not found")]
    NoHomeDir,
}

/// Merged configuration from all sources.
///
/// Accessor methods apply precedence rules automatically: project config
/// overrides global config, which overrides the defaults.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Global configuration
    pub global: SeedConfig,
    /// Project configuration (if a project file was found)
    pub project: Option<SeedConfig>,
    /// Directory relative paths in the project file resolve against
    project_dir: Option<PathBuf>,
    /// Path to the global config file (if loaded)
    global_path: Option<PathBuf>,
    /// Path to the project config file (if loaded)
    project_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// If `project_dir` is provided, also loads `<project_dir>/.seed/config.toml`.
    ///
    /// # Errors
    ///
    /// Returns an error if config files exist but cannot be parsed.
    /// Missing config files are not an error (defaults are used).
    pub fn load(project_dir: Option<&Path>) -> Result<Config, ConfigError> {
        let global_path = Self::find_global();
        Self::load_from(global_path.as_deref(), project_dir)
    }

    /// Load configuration from an explicit global file and project directory.
    ///
    /// Either may be `None` (or point at a missing file) to skip that scope.
    pub fn load_from(
        global_path: Option<&Path>,
        project_dir: Option<&Path>,
    ) -> Result<Config, ConfigError> {
        let (global, global_path) = match global_path {
            Some(path) if path.exists() => (Self::read_config(path)?, Some(path.to_path_buf())),
            _ => (SeedConfig::default(), None),
        };

        let (project, project_path) = match project_dir {
            Some(dir) => {
                let path = Self::project_config_path(dir);
                if path.exists() {
                    (Some(Self::read_config(&path)?), Some(path))
                } else {
                    (None, None)
                }
            }
            None => (None, None),
        };

        global.validate()?;
        if let Some(ref p) = project {
            p.validate()?;
        }

        tracing::debug!(
            global = ?global_path,
            project = ?project_path,
            "loaded configuration"
        );

        Ok(Config {
            global,
            project,
            project_dir: project_dir.map(Path::to_path_buf),
            global_path,
            project_path,
        })
    }

    /// Find the global config file in standard locations.
    fn find_global() -> Option<PathBuf> {
        // 1. Check $SEED_CONFIG
        if let Ok(path) = std::env::var("SEED_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        // 2. Check $XDG_CONFIG_HOME/seed/config.toml
        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("seed/config.toml");
            if path.exists() {
                return Some(path);
            }
        }

        // 3. Check ~/.seed/config.toml
        let path = Self::global_config_path().ok()?;
        path.exists().then_some(path)
    }

    /// Read and parse a config file.
    fn read_config(path: &Path) -> Result<SeedConfig, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Get the canonical path for global config.
    ///
    /// Returns `~/.seed/config.toml`.
    pub fn global_config_path() -> Result<PathBuf, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
        Ok(home.join(".seed/config.toml"))
    }

    /// Get the path for project config.
    pub fn project_config_path(project_dir: &Path) -> PathBuf {
        project_dir.join(".seed/config.toml")
    }

    fn resolver_value<T>(&self, get: impl Fn(&ResolverConfig) -> Option<T>) -> Option<T> {
        self.project
            .as_ref()
            .and_then(|p| p.resolver.as_ref())
            .and_then(&get)
            .or_else(|| self.global.resolver.as_ref().and_then(&get))
    }

    fn tree_value<T>(&self, get: impl Fn(&TreeConfig) -> Option<T>) -> Option<T> {
        self.project
            .as_ref()
            .and_then(|p| p.tree.as_ref())
            .and_then(&get)
            .or_else(|| self.global.tree.as_ref().and_then(&get))
    }

    // =========================================================================
    // Accessor methods with precedence
    // =========================================================================

    /// Get the resolver backend name.
    ///
    /// Defaults to "file" if not configured.
    pub fn resolver_kind(&self) -> String {
        self.resolver_value(|r| r.kind.clone())
            .unwrap_or_else(|| DEFAULT_RESOLVER.to_string())
    }

    /// Get the record store directory.
    ///
    /// Relative paths resolve against the project directory when one was
    /// given. Defaults to `records`.
    pub fn store_dir(&self) -> PathBuf {
        let dir = self
            .resolver_value(|r| r.store_dir.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_DIR));

        match &self.project_dir {
            Some(base) if dir.is_relative() => base.join(dir),
            _ => dir,
        }
    }

    /// Get the http endpoint.
    pub fn endpoint(&self) -> String {
        self.resolver_value(|r| r.endpoint.clone())
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string())
    }

    /// Get the per-request timeout.
    ///
    /// Defaults to 10 seconds.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(
            self.resolver_value(|r| r.timeout_secs)
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        )
    }

    /// Check if resolved records are memoized.
    ///
    /// Defaults to `false` if not configured.
    pub fn cache(&self) -> bool {
        self.resolver_value(|r| r.cache).unwrap_or(false)
    }

    /// Get the expansion depth bound.
    pub fn max_depth(&self) -> usize {
        self.tree_value(|t| t.max_depth).unwrap_or(DEFAULT_MAX_DEPTH)
    }

    /// Get the policy for exceeding the depth bound.
    ///
    /// Defaults to failing the whole expansion.
    pub fn on_limit(&self) -> LimitPolicy {
        self.tree_value(|t| t.on_limit.as_deref().and_then(LimitPolicy::parse))
            .unwrap_or_default()
    }

    /// Check if sibling references are expanded concurrently.
    pub fn fan_out(&self) -> bool {
        self.tree_value(|t| t.fan_out).unwrap_or(false)
    }

    /// Resolver settings with precedence applied.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the resolver kind is unknown.
    pub fn resolver_settings(&self) -> Result<ResolverSettings, ConfigError> {
        let kind_name = self.resolver_kind();
        let kind = ResolverKind::parse(&kind_name).ok_or_else(|| {
            ConfigError::InvalidValue(format!("invalid resolver '{}'", kind_name))
        })?;

        Ok(ResolverSettings {
            kind,
            store_dir: self.store_dir(),
            endpoint: self.endpoint(),
            timeout: self.timeout(),
            cache: self.cache(),
        })
    }

    /// Tree expansion options with precedence applied.
    pub fn grow_options(&self) -> GrowOptions {
        GrowOptions {
            max_depth: self.max_depth(),
            on_limit: self.on_limit(),
            fan_out: self.fan_out(),
        }
    }

    /// Get the path to the loaded global config file.
    pub fn global_config_loaded_from(&self) -> Option<&Path> {
        self.global_path.as_deref()
    }

    /// Get the path to the loaded project config file.
    pub fn project_config_loaded_from(&self) -> Option<&Path> {
        self.project_path.as_deref()
    }
}
