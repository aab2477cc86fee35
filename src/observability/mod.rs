//! Observability
//!
//! Measurement primitives (clock, heap samplers) and structured audit events.

pub mod audit;
pub mod clock;
pub mod memory;
