//! Text preparation: normalization and sentence-aligned chunking.
//!
//! Both halves are pure and deterministic, which keeps the policy decisions
//! (what counts as a sentence, how big a chunk may grow) unit-testable
//! without any remote collaborator.

pub mod chunk;
pub mod normalize;

pub use chunk::{split_chunks, split_sentences};
pub use normalize::normalize;
