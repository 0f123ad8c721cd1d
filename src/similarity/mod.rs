//! Pure similarity kernels (spec.md §4.1).
//!
//! Every function here is total: malformed or missing input yields `0.0`
//! and a debug-level log line, never a panic or an error return (spec.md
//! §7, "Similarity kernels never raise").

mod causal;
mod contextual;
mod cosine;
mod hierarchy;
mod jaccard;
mod temporal;
mod tokens;

pub use causal::causal_cue;
pub use contextual::contextual_association;
pub use cosine::cosine_similarity;
pub use hierarchy::hierarchy_cue;
pub use jaccard::content_overlap;
pub use temporal::temporal_proximity;
pub use tokens::tokenize;
