//! Aging Engine (spec.md §4.2): multi-model cognitive decay with adaptive
//! model selection.

mod engine;
mod models;

pub use engine::{AgingEngine, AgingResult, MemoryStrength};
