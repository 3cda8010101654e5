// Rephrasing: style configuration, prompt templates, and backend dispatch.
// All model calls go through llm_client; no provider HTTP calls here.

pub mod dispatcher;
pub mod handlers;
pub mod prompts;
pub mod style;
