//! Error types shared by the tree builders.

use thiserror::Error;

use crate::smt::KeyError;

/// Errors produced while building trees or proving membership.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Tree depth must be between 1 and {max}, got {depth}")]
    InvalidDepth { depth: usize, max: usize },
    #[error("Malformed key {key:?}: {reason}")]
    MalformedKey { key: String, reason: KeyError },
    #[error("No leaf exists at key: {0}")]
    KeyNotFound(String),
    #[error("Leaf count must be a non-zero power of two, got {0}")]
    LeafCount(usize),
    #[error("Invalid field element: {0}")]
    FieldElement(String),
    #[error("Poseidon hash failed: {0}")]
    Hash(String),
}
