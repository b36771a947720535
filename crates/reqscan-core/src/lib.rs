//! reqscan-core: shared types, traits, errors, config, events and tracing
//! for the reqscan requirement analysis engine.

pub mod config;
pub mod errors;
pub mod events;
pub mod tracing;
pub mod traits;
pub mod types;
