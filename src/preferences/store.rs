//! Preference store: load with first-run bootstrap, whole-record save

use super::record::PreferenceRecord;
use super::resolver::resolve;
use super::storage::{Storage, StorageError};
use super::DEFAULT_STORAGE_KEY;
use crate::engines::{Catalog, Engine};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Default upper bound for a serialized record
pub const DEFAULT_MAX_RECORD_BYTES: usize = 64 * 1024;

/// Errors surfaced by the preference store
#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("preference storage failed: {0}")]
    Storage(#[from] StorageError),
    #[error("persisted preferences are malformed: {0}")]
    MalformedRecord(#[source] serde_json::Error),
    #[error("failed to serialize preferences: {0}")]
    Serialization(#[source] serde_json::Error),
    #[error("serialized preferences are {size} bytes, limit is {limit}")]
    RecordTooLarge { size: usize, limit: usize },
}

/// Loads and saves the preference record for a catalog
///
/// A store without a backend models a context where persistent storage is
/// unavailable: `load` yields an empty record and `save` does nothing.
#[derive(Clone)]
pub struct PreferenceStore {
    catalog: Arc<Catalog>,
    storage: Option<Arc<dyn Storage>>,
    key: String,
    max_record_bytes: usize,
}

impl PreferenceStore {
    /// Create a store backed by `storage`
    pub fn new(catalog: Arc<Catalog>, storage: Arc<dyn Storage>) -> Self {
        Self {
            catalog,
            storage: Some(storage),
            key: DEFAULT_STORAGE_KEY.to_string(),
            max_record_bytes: DEFAULT_MAX_RECORD_BYTES,
        }
    }

    /// Create a store with no storage available
    pub fn detached(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            storage: None,
            key: DEFAULT_STORAGE_KEY.to_string(),
            max_record_bytes: DEFAULT_MAX_RECORD_BYTES,
        }
    }

    /// Use a different storage key
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Limit the serialized size accepted by `save`
    pub fn with_max_record_bytes(mut self, limit: usize) -> Self {
        self.max_record_bytes = limit;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Shared handle to the catalog this store resolves against
    pub fn shared_catalog(&self) -> Arc<Catalog> {
        self.catalog.clone()
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn is_available(&self) -> bool {
        self.storage.is_some()
    }

    /// Return the persisted record, bootstrapping defaults on first access.
    ///
    /// A malformed persisted value is returned as `MalformedRecord`; it is
    /// never replaced by defaults here.
    pub fn load(&self) -> Result<PreferenceRecord, PreferenceError> {
        let Some(storage) = &self.storage else {
            return Ok(PreferenceRecord::new());
        };

        match storage.get(&self.key)? {
            Some(stored) => {
                debug!("Loaded preferences from key {}", self.key);
                PreferenceRecord::from_json(&stored).map_err(PreferenceError::MalformedRecord)
            }
            None => {
                let defaults = PreferenceRecord::defaults_for(&self.catalog);
                info!(
                    "No stored preferences, enabling all {} engines",
                    self.catalog.len()
                );
                if let Err(e) = self.write(storage.as_ref(), &defaults) {
                    warn!("Failed to persist default preferences: {}", e);
                }
                Ok(defaults)
            }
        }
    }

    /// Overwrite the persisted record wholesale.
    ///
    /// Nothing is written when serialization fails or the record is too large.
    pub fn save(&self, record: &PreferenceRecord) -> Result<(), PreferenceError> {
        let Some(storage) = &self.storage else {
            debug!("Preference storage unavailable, skipping save");
            return Ok(());
        };
        self.write(storage.as_ref(), record)
    }

    /// Load the record and resolve it against the catalog
    pub fn enabled_engines(&self) -> Result<Vec<&Engine>, PreferenceError> {
        let record = self.load()?;
        Ok(resolve(&self.catalog, &record))
    }

    fn write(&self, storage: &dyn Storage, record: &PreferenceRecord) -> Result<(), PreferenceError> {
        let json = record.to_json().map_err(PreferenceError::Serialization)?;
        if json.len() > self.max_record_bytes {
            return Err(PreferenceError::RecordTooLarge {
                size: json.len(),
                limit: self.max_record_bytes,
            });
        }
        storage.set(&self.key, &json)?;
        debug!("Saved {} preference entries", record.len());
        Ok(())
    }
}
