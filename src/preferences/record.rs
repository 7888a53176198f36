//! Preference record and its pure transforms

use crate::engines::Catalog;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-engine preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceEntry {
    /// Whether the engine is shown
    pub enabled: bool,
    /// Position among enabled engines (lower first); ties fall back to catalog order
    #[serde(default)]
    pub order: i64,
}

impl PreferenceEntry {
    pub fn new(enabled: bool, order: i64) -> Self {
        Self { enabled, order }
    }
}

/// Mapping from engine id to its preference
///
/// Ids that are no longer in the catalog are kept as-is and ignored by the
/// resolver. Catalog ids without an entry count as disabled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PreferenceRecord {
    entries: BTreeMap<String, PreferenceEntry>,
}

impl PreferenceRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every catalog engine enabled, ordered by catalog index
    pub fn defaults_for(catalog: &Catalog) -> Self {
        let entries = catalog
            .iter()
            .enumerate()
            .map(|(index, engine)| (engine.id.clone(), PreferenceEntry::new(true, index as i64)))
            .collect();
        Self { entries }
    }

    pub fn get(&self, id: &str) -> Option<&PreferenceEntry> {
        self.entries.get(id)
    }

    pub fn insert(&mut self, id: impl Into<String>, entry: PreferenceEntry) {
        self.entries.insert(id.into(), entry);
    }

    pub fn is_enabled(&self, id: &str) -> bool {
        self.entries.get(id).is_some_and(|e| e.enabled)
    }

    /// Number of enabled entries that refer to catalog engines
    pub fn enabled_count(&self, catalog: &Catalog) -> usize {
        catalog.iter().filter(|e| self.is_enabled(&e.id)).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Flip `enabled` for an engine; a missing entry becomes enabled with order 0.
    ///
    /// Unconditional: keeping at least one engine enabled is up to the caller.
    pub fn toggle(mut self, id: &str) -> Self {
        self.entries
            .entry(id.to_string())
            .and_modify(|e| e.enabled = !e.enabled)
            .or_insert(PreferenceEntry::new(true, 0));
        self
    }

    /// Set each listed id's `order` to its index in `ordered_ids`.
    ///
    /// Ids without an entry are skipped; all other fields stay untouched.
    pub fn reorder<S: AsRef<str>>(mut self, ordered_ids: &[S]) -> Self {
        for (index, id) in ordered_ids.iter().enumerate() {
            if let Some(entry) = self.entries.get_mut(id.as_ref()) {
                entry.order = index as i64;
            }
        }
        self
    }

    /// Serialize to the persisted JSON layout
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Parse the persisted JSON layout
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

impl FromIterator<(String, PreferenceEntry)> for PreferenceRecord {
    fn from_iter<T: IntoIterator<Item = (String, PreferenceEntry)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
