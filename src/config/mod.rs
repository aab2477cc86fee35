//! Configuration and shared types
//!
//! Error taxonomy and harness configuration loading.

pub mod loader;
pub mod types;
