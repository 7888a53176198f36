//! Application state shared across handlers

use crate::config::Settings;
use crate::engines::Catalog;
use crate::preferences::PreferenceStore;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Global settings
    pub settings: Arc<Settings>,
    /// Engine catalog
    pub catalog: Arc<Catalog>,
    /// Preference store for the catalog
    pub store: Arc<PreferenceStore>,
    /// Template renderer
    pub templates: Arc<super::Templates>,
}

impl AppState {
    /// Create application state from settings
    pub fn new(settings: Settings) -> anyhow::Result<Self> {
        let catalog = Arc::new(settings.catalog()?);
        let store = settings.preference_store(catalog.clone());
        Self::with_store(settings, store)
    }

    /// Create application state around an existing store
    pub fn with_store(settings: Settings, store: PreferenceStore) -> anyhow::Result<Self> {
        let catalog = store.shared_catalog();
        let templates = Arc::new(super::Templates::new()?);

        Ok(Self {
            settings: Arc::new(settings),
            catalog,
            store: Arc::new(store),
            templates,
        })
    }

    /// Get instance name
    pub fn instance_name(&self) -> &str {
        &self.settings.general.instance_name
    }
}
