//! Poseidon hash over the BN254 scalar field.
//!
//! Parameters follow circomlib (width `n + 1` for `n` inputs), so commitments
//! produced here match roots computed by circom circuits and iden3 tooling.

mod native;


pub use native::{poseidon_hash, poseidon_hash_many, poseidon_hash_two, FieldHasher};
