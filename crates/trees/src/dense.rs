//! Dense Merkle tree built level by level from a complete set of leaves.

use ark_bn254::Fr;

use crate::error::Error;
use crate::poseidon::FieldHasher;

/// Largest depth accepted by [`DenseMerkleTree::deterministic`].
pub const MAX_DENSE_DEPTH: usize = 30;

/// A complete binary Merkle tree.
///
/// Leaves are committed as given; each parent is `H([left, right])`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DenseMerkleTree {
    /// levels[0] = leaves, last level = [root]
    levels: Vec<Vec<Fr>>,
}

impl DenseMerkleTree {
    /// Build a tree over `leaves`, whose count must be a non-zero power of two.
    pub fn from_leaves(leaves: Vec<Fr>) -> Result<Self, Error> {
        let mut hasher = FieldHasher::new()?;
        Self::from_leaves_with(leaves, &mut hasher)
    }

    /// Like [`DenseMerkleTree::from_leaves`], reusing an existing hasher.
    pub fn from_leaves_with(leaves: Vec<Fr>, hasher: &mut FieldHasher) -> Result<Self, Error> {
        if !leaves.len().is_power_of_two() {
            return Err(Error::LeafCount(leaves.len()));
        }

        let mut levels = vec![leaves];
        while let Some(level) = levels.last().filter(|level| level.len() > 1) {
            let parents = level
                .chunks_exact(2)
                .map(|pair| hasher.hash_two(pair[0], pair[1]))
                .collect::<Result<Vec<_>, _>>()?;
            levels.push(parents);
        }

        Ok(Self { levels })
    }

    /// Tree of depth `depth` whose leaf `i` is `H([start_index + i])`.
    pub fn deterministic(depth: usize, start_index: u64) -> Result<Self, Error> {
        if depth > MAX_DENSE_DEPTH {
            return Err(Error::InvalidDepth {
                depth,
                max: MAX_DENSE_DEPTH,
            });
        }

        let mut hasher = FieldHasher::new()?;
        let start = Fr::from(start_index);
        let leaves = (0..(1u64 << depth))
            .map(|i| hasher.hash_one(start + Fr::from(i)))
            .collect::<Result<Vec<_>, _>>()?;

        Self::from_leaves_with(leaves, &mut hasher)
    }

    /// Root commitment.
    pub fn root(&self) -> Fr {
        self.levels[self.levels.len() - 1][0]
    }

    /// Number of levels below the root.
    pub fn depth(&self) -> usize {
        self.levels.len() - 1
    }

    pub fn leaves(&self) -> &[Fr] {
        &self.levels[0]
    }

    /// Nodes at `level`, counted from the leaves (level 0) up.
    pub fn level(&self, level: usize) -> Option<&[Fr]> {
        self.levels.get(level).map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::from_decimal;
    use crate::poseidon::{poseidon_hash, poseidon_hash_two};

    #[test]
    fn test_single_leaf_is_root() {
        let tree = DenseMerkleTree::from_leaves(vec![Fr::from(1u64)]).unwrap();

        assert_eq!(tree.root(), Fr::from(1u64));
        assert_eq!(tree.depth(), 0);
    }

    #[test]
    fn test_two_leaves() {
        let tree = DenseMerkleTree::from_leaves(vec![Fr::from(1u64), Fr::from(2u64)]).unwrap();
        let expected = poseidon_hash_two(Fr::from(1u64), Fr::from(2u64)).unwrap();

        assert_eq!(tree.root(), expected);
        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.leaves(), &[Fr::from(1u64), Fr::from(2u64)]);
    }

    #[test]
    fn test_leaf_count_must_be_power_of_two() {
        assert_eq!(DenseMerkleTree::from_leaves(vec![]), Err(Error::LeafCount(0)));
        assert_eq!(
            DenseMerkleTree::from_leaves(vec![Fr::from(0u64); 3]),
            Err(Error::LeafCount(3))
        );
    }

    #[test]
    fn test_deterministic_fixture() {
        let tree = DenseMerkleTree::deterministic(4, 1).unwrap();
        let expected = from_decimal(
            "12849909573197439023386719626541092579807164430016488237755007164956786115756",
        )
        .unwrap();

        assert_eq!(tree.root(), expected);
        assert_eq!(tree.leaves().len(), 16);
        assert_eq!(tree.leaves()[0], poseidon_hash(Fr::from(1u64)).unwrap());
    }

    #[test]
    fn test_levels_shrink_by_half() {
        let tree = DenseMerkleTree::deterministic(3, 0).unwrap();

        for (level, expected_len) in [8usize, 4, 2, 1].into_iter().enumerate() {
            assert_eq!(tree.level(level).unwrap().len(), expected_len);
        }
        assert!(tree.level(4).is_none());
    }
}
