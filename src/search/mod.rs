//! Search orchestration module
//!
//! Fans a use case out to every registered source, isolates failures and
//! merges the answers in registration order.

mod executor;
mod models;

pub use executor::SearchManager;
pub use models::*;
