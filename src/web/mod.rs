//! Web server module
//!
//! Serves the tabbed requirements analyzer and a JSON search API.

mod handlers;
mod routes;
mod state;
mod templates;

pub use routes::create_router;
pub use state::AppState;
pub use templates::Templates;
