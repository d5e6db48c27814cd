//! Merkle forest generation on top of `merkle-trees`.
//!
//! This crate provides utilities for:
//! - Building independent dense branches in parallel and combining their roots
//! - Emitting forest summaries and SMT proofs as JSON

pub mod compose;
pub mod config;
pub mod error;
pub mod output;

pub use compose::{
    branch_roots, branched_root, build_forest, forest_root, Forest, DEFAULT_BRANCH_DEPTH,
};
pub use config::{ForestConfig, MAX_TOTAL_LEVEL};
pub use error::GeneratorError;
pub use output::{ForestOutput, SmtProofOutput};
