//! Language model module
//!
//! Structured-output calls against an OpenAI-compatible API.

mod openai;
mod types;

pub use openai::OpenAiClient;
pub use types::*;
