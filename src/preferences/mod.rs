//! Engine preference module
//!
//! Loads, bootstraps, mutates and persists the per-engine enablement and
//! ordering record, and resolves it against the catalog.

mod editor;
mod record;
mod resolver;
mod storage;
mod store;

pub use editor::{EditError, EditorView, PreferenceEditor};
pub use record::{PreferenceEntry, PreferenceRecord};
pub use resolver::resolve;
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError};
pub use store::{PreferenceError, PreferenceStore, DEFAULT_MAX_RECORD_BYTES};

/// Default storage key for the persisted record
pub const DEFAULT_STORAGE_KEY: &str = "engine-preferences";
