//! Sparse Merkle Tree over fixed-length bit-string keys.
//!
//! This module provides:
//! - Memoized empty-subtree hashes
//! - Key parsing and validation
//! - Incremental insertion that only materializes the touched path
//! - Merkle path generation and stateless verification

mod empty;
mod key;
mod proof;
mod tree;


pub use empty::{empty_hash, EmptyHashes};
pub use key::{padded_binary_key, Key, KeyError};
pub use proof::{verify_merkle_path, MerklePath, MerklePathItem};
pub use tree::{SparseMerkleTree, MAX_DEPTH, MAX_DETERMINISTIC_DEPTH};
