//! Search submission
//!
//! Picks the engine for a query and builds the URL the browser is sent to.

mod redirect;

pub use redirect::{build_search_url, select_engine, RedirectError};
