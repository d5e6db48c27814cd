//! Poseidon commitment trees over the BN254 scalar field.
//!
//! This crate provides:
//! - `SparseMerkleTree`: fixed-depth tree addressed by bit-string keys, with
//!   Merkle path generation and stateless path verification
//! - `DenseMerkleTree`: complete tree built level by level from known leaves
//! - Circom-compatible Poseidon hashing and field element encodings

pub mod dense;
pub mod error;
pub mod field;
pub mod poseidon;
pub mod smt;

pub use dense::{DenseMerkleTree, MAX_DENSE_DEPTH};
pub use error::Error;
pub use poseidon::FieldHasher;
pub use smt::{
    empty_hash, padded_binary_key, verify_merkle_path, EmptyHashes, Key, KeyError, MerklePath,
    MerklePathItem, SparseMerkleTree, MAX_DEPTH, MAX_DETERMINISTIC_DEPTH,
};

use ark_bn254::Fr;

/// Field element type committed by every tree.
pub type FieldElement = Fr;
