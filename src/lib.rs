//! SearchBar-RS: a single-page search redirector
//!
//! A query is sent to one engine from a fixed catalog. Which engines are
//! offered, and in what order, is a per-user preference record persisted in
//! an injected key-value storage.

pub mod config;
pub mod engines;
pub mod preferences;
pub mod search;
pub mod web;

pub use config::Settings;
pub use engines::{Catalog, Engine};
pub use preferences::{resolve, PreferenceRecord, PreferenceStore};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
