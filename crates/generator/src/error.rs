//! Errors raised while generating forests or proofs.

use thiserror::Error;

/// Errors that can occur during generation
#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("Tree error: {0}")]
    Tree(#[from] merkle_trees::Error),
    #[error("Invalid levels: {0}")]
    InvalidLevels(String),
    #[error("Leaf index overflow for branch {0}")]
    IndexOverflow(usize),
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Output is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
