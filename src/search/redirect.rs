//! Engine selection and target URL construction

use crate::engines::{Catalog, Engine, PLACEHOLDER};
use thiserror::Error;
use url::Url;

/// Errors building a redirect target
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RedirectError {
    #[error("search query is empty")]
    EmptyQuery,
    #[error("engine {id} produced an invalid URL: {reason}")]
    InvalidUrl { id: String, reason: String },
}

/// Choose the engine to search with.
///
/// The requested engine wins if it is enabled, otherwise the first enabled
/// engine. With nothing enabled, a requested catalog engine is kept and the
/// catalog's first engine is the last resort.
pub fn select_engine<'a>(
    catalog: &'a Catalog,
    enabled: &[&'a Engine],
    requested: Option<&str>,
) -> &'a Engine {
    if let Some(engine) = requested.and_then(|id| enabled.iter().copied().find(|e| e.id == id)) {
        return engine;
    }
    if let Some(first) = enabled.first().copied() {
        return first;
    }
    requested
        .and_then(|id| catalog.get(id))
        .unwrap_or_else(|| catalog.default_engine())
}

/// Substitute the percent-encoded query into the engine's URL template
pub fn build_search_url(engine: &Engine, query: &str) -> Result<Url, RedirectError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(RedirectError::EmptyQuery);
    }

    let target = engine
        .url_template
        .replacen(PLACEHOLDER, &urlencoding::encode(query), 1);

    Url::parse(&target).map_err(|e| RedirectError::InvalidUrl {
        id: engine.id.clone(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::new(vec![
            Engine::new("a", "https://a.example/search?q={searchTerm}"),
            Engine::new("b", "https://b.example/?query={searchTerm}&src=bar"),
            Engine::new("c", "https://c.example/s/{searchTerm}"),
        ])
        .unwrap()
    }

    #[test]
    fn test_select_requested_enabled_engine() {
        let catalog = catalog();
        let enabled = vec![catalog.get("c").unwrap(), catalog.get("b").unwrap()];
        assert_eq!(select_engine(&catalog, &enabled, Some("b")).id, "b");
    }

    #[test]
    fn test_select_falls_back_to_first_enabled() {
        let catalog = catalog();
        let enabled = vec![catalog.get("c").unwrap(), catalog.get("b").unwrap()];
        assert_eq!(select_engine(&catalog, &enabled, Some("a")).id, "c");
        assert_eq!(select_engine(&catalog, &enabled, Some("unknown")).id, "c");
        assert_eq!(select_engine(&catalog, &enabled, None).id, "c");
    }

    #[test]
    fn test_select_with_nothing_enabled() {
        let catalog = catalog();
        assert_eq!(select_engine(&catalog, &[], None).id, "a");
        assert_eq!(select_engine(&catalog, &[], Some("unknown")).id, "a");
        assert_eq!(select_engine(&catalog, &[], Some("b")).id, "b");
    }

    #[test]
    fn test_build_search_url_encodes_query() {
        let catalog = catalog();
        let url = build_search_url(catalog.get("a").unwrap(), "rust & \"serde\"").unwrap();
        assert_eq!(
            url.as_str(),
            "https://a.example/search?q=rust%20%26%20%22serde%22"
        );
        assert_eq!(
            url.query_pairs().next().map(|(_, v)| v.into_owned()),
            Some("rust & \"serde\"".to_string())
        );
    }

    #[test]
    fn test_build_search_url_keeps_template_parts() {
        let catalog = catalog();
        let url = build_search_url(catalog.get("b").unwrap(), " café ").unwrap();
        assert_eq!(url.as_str(), "https://b.example/?query=caf%C3%A9&src=bar");

        let url = build_search_url(catalog.get("c").unwrap(), "a/b").unwrap();
        assert_eq!(url.as_str(), "https://c.example/s/a%2Fb");
    }

    #[test]
    fn test_empty_query_is_rejected() {
        let catalog = catalog();
        assert_eq!(
            build_search_url(catalog.get("a").unwrap(), "   "),
            Err(RedirectError::EmptyQuery)
        );
    }
}
