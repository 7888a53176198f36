//! Settings structures for SearchBar-RS configuration

use crate::engines::{builtin_engines, Catalog, CatalogError, Engine};
use crate::preferences::{
    FileStorage, MemoryStorage, PreferenceStore, DEFAULT_STORAGE_KEY,
};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Main settings structure (settings.yml)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub server: ServerSettings,
    pub storage: StorageSettings,
    /// Engine catalog, in display order
    pub engines: Vec<Engine>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            general: GeneralSettings::default(),
            server: ServerSettings::default(),
            storage: StorageSettings::default(),
            engines: builtin_engines(),
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = serde_yaml::from_str(&content)?;
        Ok(settings)
    }

    /// Merge with environment variables (SEARCHBAR_* prefix)
    pub fn merge_env(&mut self) {
        if let Ok(val) = std::env::var("SEARCHBAR_DEBUG") {
            self.general.debug = val.parse().unwrap_or(false);
        }
        if let Ok(val) = std::env::var("SEARCHBAR_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Ok(val) = std::env::var("SEARCHBAR_BIND_ADDRESS") {
            self.server.bind_address = val;
        }
        if let Ok(val) = std::env::var("SEARCHBAR_STORAGE_PATH") {
            self.storage.path = Some(PathBuf::from(val));
        }
        if let Ok(val) = std::env::var("SEARCHBAR_STORAGE_BACKEND") {
            if let Ok(backend) = serde_yaml::from_str(&val) {
                self.storage.backend = backend;
            }
        }
    }

    /// Validate the configured engines into a catalog
    pub fn catalog(&self) -> Result<Catalog, CatalogError> {
        Catalog::new(self.engines.clone())
    }

    /// Build the preference store described by the storage section
    pub fn preference_store(&self, catalog: Arc<Catalog>) -> PreferenceStore {
        let store = match self.storage.backend {
            StorageBackend::File => {
                PreferenceStore::new(catalog, Arc::new(FileStorage::new(self.storage.dir())))
            }
            StorageBackend::Memory => PreferenceStore::new(catalog, Arc::new(MemoryStorage::new())),
            StorageBackend::None => PreferenceStore::detached(catalog),
        };
        store
            .with_key(self.storage.key.clone())
            .with_max_record_bytes(self.storage.max_record_bytes)
    }
}

/// General settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Enable debug logging
    pub debug: bool,
    /// Instance name displayed in UI
    pub instance_name: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            debug: false,
            instance_name: "SearchBar".to_string(),
        }
    }
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Server port
    pub port: u16,
    /// Bind address
    pub bind_address: String,
    /// Directory with engine icons, served under /engines
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: 8080,
            bind_address: "127.0.0.1".to_string(),
            static_dir: Some(PathBuf::from("public/engines")),
        }
    }
}

/// Where preferences are persisted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// JSON files in `storage.path`
    #[default]
    File,
    /// Process memory, lost on restart
    Memory,
    /// No persistence; preferences are never bootstrapped or saved
    None,
}

/// Preference storage settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub backend: StorageBackend,
    /// Storage directory (defaults to the local data dir)
    pub path: Option<PathBuf>,
    /// Key the preference record is stored under
    pub key: String,
    /// Largest serialized record accepted on save
    pub max_record_bytes: usize,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            path: None,
            key: DEFAULT_STORAGE_KEY.to_string(),
            max_record_bytes: crate::preferences::DEFAULT_MAX_RECORD_BYTES,
        }
    }
}

impl StorageSettings {
    /// Effective storage directory
    pub fn dir(&self) -> PathBuf {
        self.path.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("searchbar-rs")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 8080);
        assert!(!settings.general.debug);
        assert_eq!(settings.storage.key, "engine-preferences");
        assert_eq!(settings.storage.backend, StorageBackend::File);
        assert!(settings.catalog().is_ok());
    }

    #[test]
    fn test_engine_lookup() {
        let settings = Settings::default();
        let catalog = settings.catalog().unwrap();
        let google = catalog.get("google");
        assert!(google.is_some());
        assert!(google.unwrap().url_template.contains("{searchTerm}"));
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
server:
  port: 9000
storage:
  backend: memory
engines:
  - id: kagi
    url_template: "https://kagi.com/search?q={searchTerm}"
  - id: startpage
    image: /engines/startpage.png
    url_template: "https://www.startpage.com/do/search?q={searchTerm}"
"#;
        let settings: Settings = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.server.bind_address, "127.0.0.1");
        assert_eq!(settings.storage.backend, StorageBackend::Memory);

        let catalog = settings.catalog().unwrap();
        assert_eq!(catalog.ids(), vec!["kagi", "startpage"]);
    }

    #[test]
    fn test_invalid_engine_list_is_rejected() {
        let yaml = r#"
engines:
  - id: a
    url_template: "https://a.example/search"
"#;
        let settings: Settings = serde_yaml::from_str(yaml).unwrap();
        assert!(matches!(
            settings.catalog(),
            Err(CatalogError::Placeholder { .. })
        ));
    }

    #[test]
    fn test_preference_store_backends() {
        let mut settings = Settings::default();
        let catalog = Arc::new(settings.catalog().unwrap());

        settings.storage.backend = StorageBackend::None;
        assert!(!settings.preference_store(catalog.clone()).is_available());

        settings.storage.backend = StorageBackend::Memory;
        settings.storage.key = "custom".to_string();
        let store = settings.preference_store(catalog);
        assert!(store.is_available());
        assert_eq!(store.key(), "custom");
    }

    #[test]
    fn test_storage_dir_override() {
        let settings = StorageSettings {
            path: Some(PathBuf::from("/tmp/prefs")),
            ..Default::default()
        };
        assert_eq!(settings.dir(), PathBuf::from("/tmp/prefs"));
    }
}
