//! resolver::file
//!
//! Local record store resolver.
//!
//! # Layout
//!
//! A store is a directory holding one JSON file per record, named after the
//! record's address: `<store_dir>/<address>.json`.
//!
//! Addresses that could escape the store directory (separators, `..`,
//! leading dots) are refused with `ResolutionError::InvalidAddress` before
//! touching the filesystem.
//!
//! # Example
//!
//! ```ignore
//! use seedtree::resolver::{FileResolver, Resolver};
//! use seedtree::core::types::{Address, ThingType};
//!
//! let resolver = FileResolver::new("records");
//! let thing = resolver
//!     .resolve(&Address::new("seed").unwrap(), ThingType::Container)
//!     .await?;
//! ```

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::traits::{decode_fetched, ResolutionError, Resolver};
use crate::core::thing::Thing;
use crate::core::types::{Address, ThingType};

/// Resolver backed by a directory of `<address>.json` files.
#[derive(Debug, Clone)]
pub struct FileResolver {
    /// Root directory of the store
    root: PathBuf,
}

impl FileResolver {
    /// Create a resolver over the given store directory.
    ///
    /// The directory does not need to exist yet; lookups against a missing
    /// store simply report `NotFound`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Get the store directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the record file for an address.
    ///
    /// # Errors
    ///
    /// Returns `ResolutionError::InvalidAddress` if the address is not a
    /// safe file stem.
    pub fn record_path(&self, address: &Address) -> Result<PathBuf, ResolutionError> {
        if !address.is_path_safe() {
            return Err(ResolutionError::InvalidAddress {
                address: address.clone(),
                reason: "address cannot be used as a file name".to_string(),
            });
        }
        Ok(self.root.join(format!("{}.json", address)))
    }

    /// Write a record into the store atomically.
    ///
    /// Creates the store directory if needed. Writes to a temp file and
    /// renames it into place so readers never see a partial record.
    pub fn store(&self, thing: &Thing) -> Result<PathBuf, ResolutionError> {
        let address = thing.address();
        let path = self.record_path(address)?;
        let io_error = |e: std::io::Error| ResolutionError::Io {
            address: address.clone(),
            message: e.to_string(),
        };

        fs::create_dir_all(&self.root).map_err(io_error)?;

        let contents = thing.to_json_pretty().map_err(|e| ResolutionError::Malformed {
            address: address.clone(),
            message: e.to_string(),
        })?;

        let temp_path = path.with_extension("json.tmp");
        let mut file = fs::File::create(&temp_path).map_err(io_error)?;
        file.write_all(contents.as_bytes()).map_err(io_error)?;
        file.sync_all().map_err(io_error)?;
        fs::rename(&temp_path, &path).map_err(io_error)?;

        Ok(path)
    }
}

#[async_trait]
impl Resolver for FileResolver {
    fn name(&self) -> &'static str {
        "file"
    }

    async fn resolve(
        &self,
        address: &Address,
        expected: ThingType,
    ) -> Result<Thing, ResolutionError> {
        let path = self.record_path(address)?;
        tracing::debug!(%address, path = %path.display(), "reading record");

        let bytes = tokio::fs::read(&path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => ResolutionError::NotFound(address.clone()),
            _ => ResolutionError::Io {
                address: address.clone(),
                message: e.to_string(),
            },
        })?;

        decode_fetched(address, expected, &bytes)
    }
}
