//! Engine catalog types and validation

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;
use url::Url;

/// Substitution token for the query term in an engine URL template
pub const PLACEHOLDER: &str = "{searchTerm}";

/// A search destination known to the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Engine {
    /// Unique identifier (stable preference key)
    pub id: String,
    /// Path to the light mode icon
    #[serde(default)]
    pub image: String,
    /// Optional path to the dark mode icon
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dark_image: Option<String>,
    /// URL template containing exactly one `{searchTerm}` placeholder
    pub url_template: String,
    /// Free text shown next to the engine
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Engine {
    pub fn new(id: impl Into<String>, url_template: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            image: String::new(),
            dark_image: None,
            url_template: url_template.into(),
            notes: None,
        }
    }

    pub fn image(mut self, path: impl Into<String>) -> Self {
        self.image = path.into();
        self
    }

    pub fn dark_image(mut self, path: impl Into<String>) -> Self {
        self.dark_image = Some(path.into());
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Reasons a catalog is rejected
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("engine catalog is empty")]
    Empty,
    #[error("engine at position {0} has an empty id")]
    EmptyId(usize),
    #[error("duplicate engine id: {0}")]
    DuplicateId(String),
    #[error("url template of engine {id} must contain {{searchTerm}} exactly once (found {count})")]
    Placeholder { id: String, count: usize },
    #[error("url template of engine {id} is not a valid URL: {reason}")]
    InvalidTemplate { id: String, reason: String },
}

/// Ordered, immutable set of all known engines
///
/// Catalog order is the implicit default order and the tie-breaker when
/// resolving preferences.
#[derive(Debug, Clone)]
pub struct Catalog {
    engines: Vec<Engine>,
}

impl Catalog {
    /// Validate and wrap a list of engines
    pub fn new(engines: Vec<Engine>) -> Result<Self, CatalogError> {
        if engines.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = HashSet::new();
        for (index, engine) in engines.iter().enumerate() {
            if engine.id.trim().is_empty() {
                return Err(CatalogError::EmptyId(index));
            }
            if !seen.insert(engine.id.as_str()) {
                return Err(CatalogError::DuplicateId(engine.id.clone()));
            }
            validate_template(engine)?;
        }

        Ok(Self { engines })
    }

    /// Get an engine by id
    pub fn get(&self, id: &str) -> Option<&Engine> {
        self.engines.iter().find(|e| e.id == id)
    }

    /// Catalog index of an engine
    pub fn position(&self, id: &str) -> Option<usize> {
        self.engines.iter().position(|e| e.id == id)
    }

    /// Check if an engine exists
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Fallback engine when nothing is enabled (`catalog[0]`)
    pub fn default_engine(&self) -> &Engine {
        &self.engines[0]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Engine> {
        self.engines.iter()
    }

    /// All engine ids in catalog order
    pub fn ids(&self) -> Vec<&str> {
        self.engines.iter().map(|e| e.id.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.engines.len()
    }

    /// Always false for a validated catalog
    pub fn is_empty(&self) -> bool {
        self.engines.is_empty()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Engine;
    type IntoIter = std::slice::Iter<'a, Engine>;

    fn into_iter(self) -> Self::IntoIter {
        self.engines.iter()
    }
}

fn validate_template(engine: &Engine) -> Result<(), CatalogError> {
    let count = engine.url_template.matches(PLACEHOLDER).count();
    if count != 1 {
        return Err(CatalogError::Placeholder {
            id: engine.id.clone(),
            count,
        });
    }

    let sample = engine.url_template.replace(PLACEHOLDER, "test");
    Url::parse(&sample).map_err(|e| CatalogError::InvalidTemplate {
        id: engine.id.clone(),
        reason: e.to_string(),
    })?;

    Ok(())
}
