//! Web server module
//!
//! Serves the search page, the redirect endpoint and the preference editor.

mod handlers;
mod routes;
mod state;
mod templates;

pub use routes::create_router;
pub use state::AppState;
pub use templates::Templates;
