//! Enabled-engine resolution

use super::record::PreferenceRecord;
use crate::engines::{Catalog, Engine};

/// Ordered list of enabled catalog engines.
///
/// Sorted ascending by `order`; equal orders keep catalog order. Entries for
/// ids outside the catalog are ignored. Returns an empty list when nothing is
/// enabled, in which case callers fall back to `catalog.default_engine()`.
pub fn resolve<'a>(catalog: &'a Catalog, record: &PreferenceRecord) -> Vec<&'a Engine> {
    let mut enabled: Vec<(i64, &Engine)> = catalog
        .iter()
        .filter_map(|engine| {
            record
                .get(&engine.id)
                .filter(|entry| entry.enabled)
                .map(|entry| (entry.order, engine))
        })
        .collect();

    // sort_by_key is stable
    enabled.sort_by_key(|(order, _)| *order);
    enabled.into_iter().map(|(_, engine)| engine).collect()
}
