//! Settings editor: an in-memory draft of the preference record
//!
//! `Closed -> Open { view, draft } -> save | cancel -> Closed`. The persisted
//! record is untouched until `save`.

use super::record::PreferenceRecord;
use super::resolver::resolve;
use super::store::{PreferenceError, PreferenceStore};
use crate::engines::{Catalog, Engine};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Tab shown by the settings editor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditorView {
    #[default]
    Toggle,
    Reorder,
}

/// Edits refused by the settings editor
#[derive(Debug, Error)]
pub enum EditError {
    #[error("settings editor is not open")]
    NotOpen,
    #[error("at least one search engine must remain enabled")]
    LastEnabled,
    #[error("unknown engine: {0}")]
    UnknownEngine(String),
    #[error("position {index} is out of range for {len} enabled engines")]
    OutOfRange { index: usize, len: usize },
    #[error(transparent)]
    Store(#[from] PreferenceError),
}

#[derive(Debug, Clone, Default)]
enum EditorState {
    #[default]
    Closed,
    Open {
        view: EditorView,
        draft: PreferenceRecord,
    },
}

/// Settings dialog state machine
#[derive(Debug, Clone, Default)]
pub struct PreferenceEditor {
    state: EditorState,
}

impl PreferenceEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open on a fresh copy of the persisted record, discarding any open draft
    pub fn open(&mut self, store: &PreferenceStore) -> Result<(), EditError> {
        let draft = store.load()?;
        self.state = EditorState::Open {
            view: EditorView::default(),
            draft,
        };
        Ok(())
    }

    /// Open on catalog defaults (all enabled, catalog order) without reading
    /// the persisted record, so a corrupt record can be replaced
    pub fn open_defaults(&mut self, catalog: &Catalog) {
        self.state = EditorState::Open {
            view: EditorView::default(),
            draft: PreferenceRecord::defaults_for(catalog),
        };
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, EditorState::Open { .. })
    }

    pub fn view(&self) -> Option<EditorView> {
        match &self.state {
            EditorState::Open { view, .. } => Some(*view),
            EditorState::Closed => None,
        }
    }

    pub fn draft(&self) -> Option<&PreferenceRecord> {
        match &self.state {
            EditorState::Open { draft, .. } => Some(draft),
            EditorState::Closed => None,
        }
    }

    pub fn set_view(&mut self, new_view: EditorView) -> Result<(), EditError> {
        match &mut self.state {
            EditorState::Open { view, .. } => {
                *view = new_view;
                Ok(())
            }
            EditorState::Closed => Err(EditError::NotOpen),
        }
    }

    /// Enabled engines of the draft, in resolved order
    pub fn sorted_enabled<'a>(&self, catalog: &'a Catalog) -> Result<Vec<&'a Engine>, EditError> {
        let draft = self.draft().ok_or(EditError::NotOpen)?;
        Ok(resolve(catalog, draft))
    }

    /// Flip an engine, refusing to disable the last enabled one
    pub fn toggle(&mut self, catalog: &Catalog, id: &str) -> Result<(), EditError> {
        if !catalog.contains(id) {
            return Err(EditError::UnknownEngine(id.to_string()));
        }

        let draft = self.draft_mut()?;
        if draft.is_enabled(id) && draft.enabled_count(catalog) <= 1 {
            warn!("Refusing to disable {}: it is the last enabled engine", id);
            return Err(EditError::LastEnabled);
        }

        *draft = std::mem::take(draft).toggle(id);
        debug!("Toggled {} (enabled: {})", id, draft.is_enabled(id));
        Ok(())
    }

    /// Apply a full ordering of the enabled engines
    pub fn reorder<S: AsRef<str>>(&mut self, ordered_ids: &[S]) -> Result<(), EditError> {
        let draft = self.draft_mut()?;
        *draft = std::mem::take(draft).reorder(ordered_ids);
        Ok(())
    }

    /// Move the enabled engine at `from` to position `to` (drag and drop)
    pub fn move_engine(&mut self, catalog: &Catalog, from: usize, to: usize) -> Result<(), EditError> {
        let mut ids: Vec<String> = self
            .sorted_enabled(catalog)?
            .into_iter()
            .map(|e| e.id.clone())
            .collect();

        let len = ids.len();
        for index in [from, to] {
            if index >= len {
                return Err(EditError::OutOfRange { index, len });
            }
        }
        if from == to {
            return Ok(());
        }

        let id = ids.remove(from);
        ids.insert(to, id);
        self.reorder(&ids)
    }

    /// Persist the draft and close. On failure the editor stays open.
    pub fn save(&mut self, store: &PreferenceStore) -> Result<(), EditError> {
        let EditorState::Open { draft, .. } = &self.state else {
            return Err(EditError::NotOpen);
        };
        store.save(draft)?;
        self.state = EditorState::Closed;
        Ok(())
    }

    /// Discard the draft and close
    pub fn cancel(&mut self) {
        self.state = EditorState::Closed;
    }

    fn draft_mut(&mut self) -> Result<&mut PreferenceRecord, EditError> {
        match &mut self.state {
            EditorState::Open { draft, .. } => Ok(draft),
            EditorState::Closed => Err(EditError::NotOpen),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::PLACEHOLDER;
    use crate::preferences::{MemoryStorage, PreferenceEntry};
    use std::sync::Arc;

    fn store(ids: &[&str]) -> PreferenceStore {
        let catalog = Catalog::new(
            ids.iter()
                .map(|id| Engine::new(*id, format!("https://{}.example/?q={}", id, PLACEHOLDER)))
                .collect(),
        )
        .unwrap();
        PreferenceStore::new(Arc::new(catalog), Arc::new(MemoryStorage::new()))
    }

    fn enabled_ids(editor: &PreferenceEditor, catalog: &Catalog) -> Vec<String> {
        editor
            .sorted_enabled(catalog)
            .unwrap()
            .into_iter()
            .map(|e| e.id.clone())
            .collect()
    }

    #[test]
    fn test_closed_editor_rejects_edits() {
        let store = store(&["a"]);
        let mut editor = PreferenceEditor::new();
        assert!(!editor.is_open());
        assert!(matches!(editor.toggle(store.catalog(), "a"), Err(EditError::NotOpen)));
        assert!(matches!(editor.set_view(EditorView::Reorder), Err(EditError::NotOpen)));
        assert!(matches!(editor.save(&store), Err(EditError::NotOpen)));
    }

    #[test]
    fn test_cancel_discards_draft() {
        let store = store(&["a", "b"]);
        let mut editor = PreferenceEditor::new();
        editor.open(&store).unwrap();
        editor.toggle(store.catalog(), "a").unwrap();
        editor.cancel();

        assert!(!editor.is_open());
        assert!(store.load().unwrap().is_enabled("a"));
    }

    #[test]
    fn test_save_persists_and_closes() {
        let store = store(&["a", "b"]);
        let mut editor = PreferenceEditor::new();
        editor.open(&store).unwrap();
        assert_eq!(editor.view(), Some(EditorView::Toggle));

        editor.toggle(store.catalog(), "a").unwrap();
        assert!(store.load().unwrap().is_enabled("a"));

        editor.save(&store).unwrap();
        assert!(!editor.is_open());
        assert!(!store.load().unwrap().is_enabled("a"));
    }

    #[test]
    fn test_last_enabled_engine_stays_enabled() {
        let store = store(&["a", "b"]);
        let mut editor = PreferenceEditor::new();
        editor.open(&store).unwrap();

        editor.toggle(store.catalog(), "a").unwrap();
        assert!(matches!(
            editor.toggle(store.catalog(), "b"),
            Err(EditError::LastEnabled)
        ));
        assert!(editor.draft().unwrap().is_enabled("b"));

        // Re-enabling is always allowed
        editor.toggle(store.catalog(), "a").unwrap();
        editor.toggle(store.catalog(), "b").unwrap();
        assert_eq!(enabled_ids(&editor, store.catalog()), vec!["a"]);
    }

    #[test]
    fn test_toggle_unknown_engine() {
        let store = store(&["a"]);
        let mut editor = PreferenceEditor::new();
        editor.open(&store).unwrap();
        assert!(matches!(
            editor.toggle(store.catalog(), "nope"),
            Err(EditError::UnknownEngine(_))
        ));
    }

    #[test]
    fn test_move_engine() {
        let store = store(&["a", "b", "c", "d"]);
        let mut editor = PreferenceEditor::new();
        editor.open(&store).unwrap();
        editor.set_view(EditorView::Reorder).unwrap();
        editor.toggle(store.catalog(), "b").unwrap();

        // enabled: a, c, d -> drag d to the top
        editor.move_engine(store.catalog(), 2, 0).unwrap();
        assert_eq!(enabled_ids(&editor, store.catalog()), vec!["d", "a", "c"]);

        let draft = editor.draft().unwrap();
        assert_eq!(draft.get("b"), Some(&PreferenceEntry::new(false, 1)));

        assert!(matches!(
            editor.move_engine(store.catalog(), 0, 3),
            Err(EditError::OutOfRange { index: 3, len: 3 })
        ));
    }

    #[test]
    fn test_open_defaults_replaces_corrupt_record() {
        let catalog = Catalog::new(vec![
            Engine::new("a", format!("https://a.example/?q={}", PLACEHOLDER)),
            Engine::new("b", format!("https://b.example/?q={}", PLACEHOLDER)),
        ])
        .unwrap();
        let storage = Arc::new(MemoryStorage::with_value(
            crate::preferences::DEFAULT_STORAGE_KEY,
            "{broken",
        ));
        let store = PreferenceStore::new(Arc::new(catalog), storage);

        let mut editor = PreferenceEditor::new();
        assert!(matches!(
            editor.open(&store),
            Err(EditError::Store(PreferenceError::MalformedRecord(_)))
        ));

        editor.open_defaults(store.catalog());
        assert_eq!(editor.draft(), Some(&PreferenceRecord::defaults_for(store.catalog())));
        editor.save(&store).unwrap();
        assert_eq!(store.load().unwrap(), PreferenceRecord::defaults_for(store.catalog()));
    }
}
