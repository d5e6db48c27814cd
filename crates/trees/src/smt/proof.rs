//! Merkle inclusion paths and their verification.

use ark_bn254::Fr;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Error;
use crate::poseidon::FieldHasher;

/// One level of a Merkle path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerklePathItem {
    /// Commitment of the node next to the authenticated path at this level.
    #[serde(with = "crate::field::serde_hex")]
    pub sibling_hash: Fr,
    /// True if the sibling sits to the right of the path node,
    /// so the parent is `H([current, sibling])`.
    pub is_right: bool,
}

impl MerklePathItem {
    pub fn new(sibling_hash: Fr, is_right: bool) -> Self {
        Self {
            sibling_hash,
            is_right,
        }
    }
}

/// A Merkle inclusion path, ordered from the leaf level up to the root level.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MerklePath {
    items: Vec<MerklePathItem>,
}

impl MerklePath {
    pub fn new(items: Vec<MerklePathItem>) -> Self {
        Self { items }
    }

    /// Path items, item 0 adjacent to the leaf.
    pub fn items(&self) -> &[MerklePathItem] {
        &self.items
    }

    pub fn items_mut(&mut self) -> &mut [MerklePathItem] {
        &mut self.items
    }

    /// Number of levels covered by the path.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MerklePathItem> {
        self.items.iter()
    }

    /// Fold the path over `leaf` to obtain the root it commits to.
    pub fn compute_root(&self, leaf: Fr, hasher: &mut FieldHasher) -> Result<Fr, Error> {
        self.items.iter().try_fold(leaf, |current, item| {
            if item.is_right {
                hasher.hash_two(current, item.sibling_hash)
            } else {
                hasher.hash_two(item.sibling_hash, current)
            }
        })
    }

    /// Check that `leaf` and this path recompute `expected_root`.
    pub fn verify(&self, leaf: Fr, expected_root: Fr) -> Result<bool, Error> {
        let mut hasher = FieldHasher::new()?;
        Ok(self.compute_root(leaf, &mut hasher)? == expected_root)
    }
}

impl<'a> IntoIterator for &'a MerklePath {
    type Item = &'a MerklePathItem;
    type IntoIter = std::slice::Iter<'a, MerklePathItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl From<Vec<MerklePathItem>> for MerklePath {
    fn from(items: Vec<MerklePathItem>) -> Self {
        Self::new(items)
    }
}

/// Verify a Merkle path against an expected root without access to the tree.
pub fn verify_merkle_path(leaf_value: Fr, path: &MerklePath, expected_root: Fr) -> bool {
    match path.verify(leaf_value, expected_root) {
        Ok(valid) => valid,
        Err(e) => {
            warn!(error = %e, "merkle path verification aborted");
            false
        }
    }
}
